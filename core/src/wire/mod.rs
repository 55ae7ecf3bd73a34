//! Boundary adapter between the service's wire schemas and the canonical model.
//!
//! The service has been observed speaking two capsule dialects:
//!
//! * legacy: camelCase fields, textual timestamps (`unlockDate`, `createdAt`);
//! * ledger: snake_case fields, UNIX-second timestamps (`lock_until`, `created_at`).
//!
//! Both are accepted wherever a capsule can appear and are normalized here into
//! [`crate::model::Capsule`]. Nothing outside this module sees a wire type.

mod block;
mod capsule;
mod time;

use thiserror::Error;

pub use block::{WireBlock, WireLedger, WireMiningResult};
pub use capsule::normalize_capsules;
pub use capsule::{LegacyCapsule, MinedCapsule, WireCapsule};
pub use time::{parse_text_timestamp, WireTimestamp};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("field {field}: unrecognized timestamp {value:?}")]
    Timestamp { field: &'static str, value: String },
    #[error("field {field}: missing")]
    Missing { field: &'static str },
}
