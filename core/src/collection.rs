//! Search, status filtering and ordering over a capsule collection.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Capsule;
use crate::visibility::{displayed_message, reveal};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusFilter {
    #[default]
    All,
    Unlocked,
    Locked,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Newest,
    Oldest,
    UnlockDate,
}

impl StatusFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Unlocked => "unlocked",
            StatusFilter::Locked => "locked",
        }
    }

    fn keeps(self, capsule: &Capsule, now: DateTime<Utc>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Unlocked => reveal(capsule, now),
            StatusFilter::Locked => !reveal(capsule, now),
        }
    }
}

impl SortKey {
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::UnlockDate => "unlock-date",
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "unlocked" => Ok(StatusFilter::Unlocked),
            "locked" => Ok(StatusFilter::Locked),
            other => Err(format!("unknown status filter {other:?} (all|unlocked|locked)")),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortKey::Newest),
            "oldest" => Ok(SortKey::Oldest),
            "unlock-date" | "unlock_date" => Ok(SortKey::UnlockDate),
            other => Err(format!("unknown sort key {other:?} (newest|oldest|unlock-date)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionQuery {
    pub search: String,
    pub status: StatusFilter,
    pub sort: SortKey,
}

impl CollectionQuery {
    fn matches_search(&self, needle: &str, capsule: &Capsule) -> bool {
        needle.is_empty()
            || capsule.sender.to_lowercase().contains(needle)
            || capsule.message.to_lowercase().contains(needle)
    }
}

/// Filters and orders `capsules` for display at `now`.
///
/// The sort is stable: capsules with equal keys keep their input order.
pub fn apply<'a>(
    capsules: &'a [Capsule],
    query: &CollectionQuery,
    now: DateTime<Utc>,
) -> Vec<&'a Capsule> {
    let needle = query.search.to_lowercase();
    let mut out: Vec<&Capsule> = capsules
        .iter()
        .filter(|c| query.matches_search(&needle, c) && query.status.keeps(c, now))
        .collect();

    match query.sort {
        SortKey::Newest => out.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Oldest => out.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortKey::UnlockDate => out.sort_by(|a, b| a.unlock_at.cmp(&b.unlock_at)),
    }
    out
}

/// A capsule paired with what may be shown of it right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapsuleView<'a> {
    pub capsule: &'a Capsule,
    pub revealed: bool,
    pub message: &'a str,
}

pub fn present<'a>(
    capsules: &'a [Capsule],
    query: &CollectionQuery,
    now: DateTime<Utc>,
) -> Vec<CapsuleView<'a>> {
    apply(capsules, query, now)
        .into_iter()
        .map(|capsule| CapsuleView {
            capsule,
            revealed: reveal(capsule, now),
            message: displayed_message(capsule, now),
        })
        .collect()
}
