//! Canonical data model. Wire shapes never reach past [`crate::wire`].

mod capsule;
mod ledger;
mod mining;

pub use capsule::Capsule;
pub use ledger::{Block, Ledger, LedgerStats, NetworkStatus};
pub use mining::MiningResult;
