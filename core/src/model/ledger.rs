use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Capsule;
use crate::remote::ApiState;

/// A committed batch of capsules. Order and hash linkage are taken from the
/// server as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub index: u64,
    pub timestamp: Option<DateTime<Utc>>,
    pub capsules: Vec<Capsule>,
    pub previous_hash: String,
    pub hash: String,
    pub nonce: u64,
    pub difficulty: u32,
}

impl Block {
    pub fn transaction_count(&self) -> usize {
        self.capsules.len()
    }
}

/// The `/chain` view of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ledger {
    pub chain: Vec<Block>,
    pub difficulty: u32,
    pub mining_reward: f64,
    pub pending: Vec<Capsule>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LedgerStats {
    pub total_blocks: usize,
    pub total_capsules: usize,
    pub pending_count: usize,
    pub difficulty: u32,
    pub mining_reward: f64,
}

impl Ledger {
    pub fn tip(&self) -> Option<&Block> {
        self.chain.last()
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            total_blocks: self.chain.len(),
            total_capsules: self.chain.iter().map(Block::transaction_count).sum(),
            pending_count: self.pending.len(),
            difficulty: self.difficulty,
            mining_reward: self.mining_reward,
        }
    }

    /// Folds a freshly mined block into this ledger.
    ///
    /// The block is appended only when it extends the current tip; pending
    /// capsules it committed are dropped either way. Returns `None` when
    /// nothing would change.
    pub fn with_mined_block(&self, block: &Block) -> Option<Ledger> {
        let extends_tip = self.tip().map_or(true, |tip| block.index > tip.index);
        let pending: Vec<Capsule> = self
            .pending
            .iter()
            .filter(|p| !block.capsules.iter().any(|c| c.same_submission(p)))
            .cloned()
            .collect();

        if !extends_tip && pending.len() == self.pending.len() {
            return None;
        }

        let mut next = Ledger {
            chain: self.chain.clone(),
            difficulty: self.difficulty,
            mining_reward: self.mining_reward,
            pending,
        };
        if extends_tip {
            next.chain.push(block.clone());
        }
        Some(next)
    }
}

/// Network health as last observed through the ledger snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkStatus {
    pub is_online: bool,
    pub last_sync: Option<DateTime<Utc>>,
    pub block_height: usize,
    pub pending_count: usize,
}

impl Default for NetworkStatus {
    fn default() -> Self {
        Self {
            is_online: true,
            last_sync: None,
            block_height: 0,
            pending_count: 0,
        }
    }
}

impl NetworkStatus {
    /// Derives a whole new status from a ledger snapshot; nothing carries over
    /// from a previous status.
    pub fn from_snapshot(snapshot: &ApiState<Ledger>) -> Self {
        match (&snapshot.data, &snapshot.error) {
            (Some(ledger), _) => NetworkStatus {
                is_online: true,
                last_sync: snapshot.updated_at,
                block_height: ledger.chain.len(),
                pending_count: ledger.pending.len(),
            },
            (None, Some(_)) => NetworkStatus {
                is_online: false,
                last_sync: snapshot.updated_at,
                block_height: 0,
                pending_count: 0,
            },
            (None, None) => NetworkStatus::default(),
        }
    }
}
