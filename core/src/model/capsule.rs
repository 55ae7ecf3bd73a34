use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A time-locked message, normalized from whichever wire shape carried it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capsule {
    pub id: String,
    pub sender: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub unlock_at: DateTime<Utc>,
    pub is_public: bool,
    /// Visibility as computed when the capsule was normalized.
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl Capsule {
    /// Whether `other` is the same submission, ignoring identifiers the server may
    /// only assign once the capsule is mined.
    pub fn same_submission(&self, other: &Capsule) -> bool {
        self.sender == other.sender
            && self.message == other.message
            && self.created_at == other.created_at
            && self.unlock_at == other.unlock_at
            && self.is_public == other.is_public
    }
}
