//! Local validation of a capsule before it is submitted.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{Field, ValidationErrors};
use crate::wire::parse_text_timestamp;

/// Raw form input for a new capsule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapsuleDraft {
    pub name: String,
    pub message: String,
    /// As typed by the user; parsed during validation.
    pub unlock_date: String,
    pub is_public: bool,
}

impl Default for CapsuleDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            message: String::new(),
            unlock_date: String::new(),
            is_public: true,
        }
    }
}

/// A draft that passed validation at a given instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDraft {
    pub name: String,
    pub message: String,
    pub unlock_at: DateTime<Utc>,
    pub is_public: bool,
}

impl CapsuleDraft {
    /// Checks every field and reports all failures at once.
    ///
    /// The unlock instant must be strictly after `now`. This is a client-side
    /// courtesy check; the service stays authoritative.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<ValidatedDraft, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.add(Field::Name, "Name is required");
        }

        let message = self.message.trim();
        if message.is_empty() {
            errors.add(Field::Message, "Message is required");
        }

        let unlock_at = if self.unlock_date.trim().is_empty() {
            errors.add(Field::UnlockDate, "Unlock date is required");
            None
        } else {
            match parse_text_timestamp(&self.unlock_date) {
                None => {
                    errors.add(Field::UnlockDate, "Unlock date is not a valid date");
                    None
                }
                Some(at) if at <= now => {
                    errors.add(Field::UnlockDate, "Unlock date must be in the future");
                    None
                }
                Some(at) => Some(at),
            }
        };

        match unlock_at {
            Some(unlock_at) if errors.is_empty() => Ok(ValidatedDraft {
                name: name.to_string(),
                message: message.to_string(),
                unlock_at,
                is_public: self.is_public,
            }),
            _ => Err(errors),
        }
    }
}

impl ValidatedDraft {
    /// Body for `POST /api/capsules`.
    pub fn payload(&self) -> Value {
        json!({
            "name": self.name,
            "message": self.message,
            "unlockDate": self.unlock_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            "isPublic": self.is_public,
        })
    }
}
