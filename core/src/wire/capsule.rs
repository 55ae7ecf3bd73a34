use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{WireError, WireTimestamp};
use crate::model::Capsule;
use crate::visibility;

/// Legacy capsule shape: camelCase keys, textual timestamps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyCapsule {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(alias = "sender_name")]
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<WireTimestamp>,
    pub unlock_date: WireTimestamp,
    pub is_public: bool,
    #[serde(default)]
    pub is_unlocked: Option<bool>,
    #[serde(default)]
    pub block_index: Option<u64>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub created_at: Option<WireTimestamp>,
}

/// Ledger capsule shape: snake_case keys, UNIX-second timestamps.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MinedCapsule {
    pub sender_name: String,
    pub message: String,
    pub is_public: bool,
    pub lock_until: WireTimestamp,
    pub created_at: WireTimestamp,
}

/// Either capsule dialect.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireCapsule {
    Legacy(LegacyCapsule),
    Mined(MinedCapsule),
}

impl WireCapsule {
    /// Normalizes into the canonical capsule.
    ///
    /// `position` is the capsule's index in its enclosing list and only feeds
    /// the fallback identifier; `now` decides the derived `unlocked` flag.
    pub fn into_canonical(self, position: usize, now: DateTime<Utc>) -> Result<Capsule, WireError> {
        let mut capsule = match self {
            WireCapsule::Legacy(legacy) => {
                let unlock_at = legacy.unlock_date.to_datetime("unlockDate")?;
                // `createdAt` is the authoring instant; `timestamp` is the older
                // name for the same thing.
                let created = legacy.created_at.as_ref().map(|ts| (ts, "createdAt"));
                let created = created.or(legacy.timestamp.as_ref().map(|ts| (ts, "timestamp")));
                let created_at = match created {
                    Some((ts, field)) => ts.to_datetime(field)?,
                    None => return Err(WireError::Missing { field: "createdAt" }),
                };
                let id = legacy
                    .id
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| fallback_id(&legacy.name, created_at, position));
                Capsule {
                    id,
                    sender: legacy.name,
                    message: legacy.message,
                    created_at,
                    unlock_at,
                    is_public: legacy.is_public,
                    unlocked: false,
                    block_index: legacy.block_index,
                    hash: legacy.hash,
                }
            }
            WireCapsule::Mined(mined) => {
                let created_at = mined.created_at.to_datetime("created_at")?;
                let unlock_at = mined.lock_until.to_datetime("lock_until")?;
                Capsule {
                    id: fallback_id(&mined.sender_name, created_at, position),
                    sender: mined.sender_name,
                    message: mined.message,
                    created_at,
                    unlock_at,
                    is_public: mined.is_public,
                    unlocked: false,
                    block_index: None,
                    hash: None,
                }
            }
        };
        capsule.unlocked = visibility::reveal(&capsule, now);
        Ok(capsule)
    }
}

fn fallback_id(sender: &str, created_at: DateTime<Utc>, position: usize) -> String {
    format!("{}-{}-{}", sender, created_at.timestamp(), position)
}

/// Normalizes a list of capsules, failing on the first unreadable entry.
pub fn normalize_capsules(
    wire: Vec<WireCapsule>,
    now: DateTime<Utc>,
) -> Result<Vec<Capsule>, WireError> {
    wire.into_iter()
        .enumerate()
        .map(|(position, capsule)| capsule.into_canonical(position, now))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_both_dialects_normalize_to_the_same_capsule() {
        let legacy: WireCapsule = serde_json::from_value(json!({
            "id": "",
            "name": "ada",
            "message": "hello future",
            "timestamp": "2030-01-01T00:00:00Z",
            "unlockDate": "2030-06-01T00:00:00Z",
            "isPublic": true,
            "isUnlocked": false,
            "createdAt": "2030-01-01T00:00:00Z"
        }))
        .unwrap();
        let mined: WireCapsule = serde_json::from_value(json!({
            "sender_name": "ada",
            "message": "hello future",
            "is_public": true,
            "lock_until": Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap().timestamp(),
            "created_at": Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap().timestamp()
        }))
        .unwrap();
        assert!(matches!(legacy, WireCapsule::Legacy(_)));
        assert!(matches!(mined, WireCapsule::Mined(_)));

        let a = legacy.into_canonical(3, now()).unwrap();
        let b = mined.into_canonical(3, now()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.id, format!("ada-{}-3", a.created_at.timestamp()));
        assert!(a.unlocked);
    }

    #[test]
    fn test_legacy_keeps_server_id_and_chain_position() {
        let wire: WireCapsule = serde_json::from_value(json!({
            "id": "cap-7",
            "name": "bob",
            "message": "m",
            "unlockDate": "2040-01-01",
            "isPublic": false,
            "blockIndex": 4,
            "hash": "00ab",
            "createdAt": "2030-01-01T00:00"
        }))
        .unwrap();
        let capsule = wire.into_canonical(0, now()).unwrap();
        assert_eq!(capsule.id, "cap-7");
        assert_eq!(capsule.block_index, Some(4));
        assert_eq!(capsule.hash.as_deref(), Some("00ab"));
        assert!(!capsule.unlocked);
    }

    #[test]
    fn test_legacy_with_snake_sender_name() {
        let wire: WireCapsule = serde_json::from_value(json!({
            "sender_name": "cy",
            "message": "m",
            "unlockDate": "2030-01-01T00:00:00Z",
            "isPublic": true,
            "createdAt": "2029-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(wire.into_canonical(0, now()).unwrap().sender, "cy");
    }

    #[test]
    fn test_missing_creation_instant_is_rejected() {
        let wire: WireCapsule = serde_json::from_value(json!({
            "name": "dee",
            "message": "m",
            "unlockDate": "2030-01-01T00:00:00Z",
            "isPublic": true
        }))
        .unwrap();
        assert!(wire.into_canonical(0, now()).is_err());
    }

    #[test]
    fn test_unreadable_entry_fails_the_list() {
        let wire: Vec<WireCapsule> = serde_json::from_value(json!([
            {"sender_name": "a", "message": "m", "is_public": true, "lock_until": 10, "created_at": 1},
            {"sender_name": "b", "message": "m", "is_public": true, "lock_until": "whenever", "created_at": 1}
        ]))
        .unwrap();
        let err = normalize_capsules(wire, now()).unwrap_err();
        assert!(err.to_string().contains("lock_until"));
    }
}
