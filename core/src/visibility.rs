//! Decides whether a capsule's content may be shown.

use chrono::{DateTime, Utc};

use crate::model::Capsule;

pub const LOCKED_PLACEHOLDER: &str = "Message will be revealed when unlocked...";

/// `true` iff the capsule is public and `now` has reached its unlock instant.
///
/// Inclusive at the boundary and monotonic in `now`. Private capsules are
/// never revealed.
pub fn reveal(capsule: &Capsule, now: DateTime<Utc>) -> bool {
    capsule.is_public && now >= capsule.unlock_at
}

/// The text to display for `capsule` at `now`.
pub fn displayed_message(capsule: &Capsule, now: DateTime<Utc>) -> &str {
    if reveal(capsule, now) {
        &capsule.message
    } else {
        LOCKED_PLACEHOLDER
    }
}
