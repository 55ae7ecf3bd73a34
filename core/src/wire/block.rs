use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::capsule::normalize_capsules;
use super::{WireCapsule, WireError, WireTimestamp};
use crate::model::{Block, Ledger, MiningResult};

/// A block as served by `/chain` and `/api/mine`. Either key spelling is
/// accepted; fields the service leaves out take their zero value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireBlock {
    pub index: u64,
    #[serde(default)]
    pub timestamp: Option<WireTimestamp>,
    #[serde(default, alias = "transactions")]
    pub data: Vec<WireCapsule>,
    #[serde(default, rename = "previousHash", alias = "previous_hash")]
    pub previous_hash: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub nonce: u64,
    #[serde(default)]
    pub difficulty: u32,
}

impl WireBlock {
    pub fn into_canonical(self, now: DateTime<Utc>) -> Result<Block, WireError> {
        let timestamp = self
            .timestamp
            .map(|ts| ts.to_datetime("timestamp"))
            .transpose()?;
        let capsules = normalize_capsules(self.data, now)?;
        Ok(Block {
            index: self.index,
            timestamp,
            capsules,
            previous_hash: self.previous_hash,
            hash: self.hash,
            nonce: self.nonce,
            difficulty: self.difficulty,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireLedger {
    pub chain: Vec<WireBlock>,
    #[serde(default)]
    pub difficulty: u32,
    #[serde(default, rename = "miningReward", alias = "mining_reward")]
    pub mining_reward: f64,
    #[serde(default, rename = "pendingTransactions", alias = "pending_transactions")]
    pub pending_transactions: Vec<WireCapsule>,
}

impl WireLedger {
    pub fn into_canonical(self, now: DateTime<Utc>) -> Result<Ledger, WireError> {
        let chain = self
            .chain
            .into_iter()
            .map(|block| block.into_canonical(now))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Ledger {
            chain,
            difficulty: self.difficulty,
            mining_reward: self.mining_reward,
            pending: normalize_capsules(self.pending_transactions, now)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireMiningResult {
    pub block: WireBlock,
    #[serde(default, rename = "minedAt", alias = "mined_at")]
    pub mined_at: Option<WireTimestamp>,
    /// Milliseconds.
    #[serde(default, rename = "executionTime", alias = "execution_time")]
    pub execution_time: f64,
}

impl WireMiningResult {
    /// `received_at` stands in for `minedAt` when the service omits it.
    pub fn into_canonical(self, received_at: DateTime<Utc>) -> Result<MiningResult, WireError> {
        let mined_at = match self.mined_at {
            Some(ts) => ts.to_datetime("minedAt")?,
            None => received_at,
        };
        let micros = if self.execution_time.is_finite() {
            (self.execution_time.max(0.0) * 1000.0).round() as u64
        } else {
            0
        };
        Ok(MiningResult {
            block: self.block.into_canonical(received_at)?,
            mined_at,
            execution_time: Duration::from_micros(micros),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2031, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_ledger_with_both_key_spellings() {
        let camel: WireLedger = serde_json::from_value(json!({
            "chain": [
                {"index": 0, "timestamp": 1700000000, "data": [], "previousHash": "0", "hash": "a", "nonce": 0, "difficulty": 2},
                {"index": 1, "timestamp": 1700000100, "data": [
                    {"sender_name": "ada", "message": "hi", "is_public": true, "lock_until": 1700000500, "created_at": 1700000050}
                ], "previousHash": "a", "hash": "b", "nonce": 77, "difficulty": 2}
            ],
            "difficulty": 2,
            "miningReward": 50,
            "pendingTransactions": [
                {"sender_name": "bob", "message": "later", "is_public": false, "lock_until": 1800000000, "created_at": 1700000200}
            ]
        }))
        .unwrap();
        let snake: WireLedger = serde_json::from_value(json!({
            "chain": [
                {"index": 0, "timestamp": "2023-11-14T22:13:20Z", "transactions": [], "previous_hash": "0", "hash": "a"}
            ],
            "mining_reward": 12.5,
            "pending_transactions": []
        }))
        .unwrap();

        let ledger = camel.into_canonical(now()).unwrap();
        assert_eq!(ledger.chain.len(), 2);
        assert_eq!(ledger.chain[1].previous_hash, "a");
        assert_eq!(ledger.chain[1].nonce, 77);
        assert_eq!(ledger.chain[1].transaction_count(), 1);
        assert_eq!(ledger.mining_reward, 50.0);
        assert_eq!(ledger.pending.len(), 1);
        assert!(!ledger.pending[0].unlocked);

        let ledger = snake.into_canonical(now()).unwrap();
        assert_eq!(ledger.chain[0].previous_hash, "0");
        assert_eq!(
            ledger.chain[0].timestamp,
            Utc.timestamp_opt(1_700_000_000, 0).single()
        );
        assert_eq!(ledger.mining_reward, 12.5);
        assert_eq!(ledger.difficulty, 0);
    }

    #[test]
    fn test_sparse_mining_result() {
        let wire: WireMiningResult = serde_json::from_value(json!({
            "block": {"index": 5, "nonce": 123, "hash": "abc123...", "data": []},
            "executionTime": 42
        }))
        .unwrap();
        let result = wire.into_canonical(now()).unwrap();
        assert_eq!(result.block.index, 5);
        assert_eq!(result.block.nonce, 123);
        assert_eq!(result.block.hash, "abc123...");
        assert_eq!(result.block.timestamp, None);
        assert_eq!(result.block.transaction_count(), 0);
        assert_eq!(result.execution_time, Duration::from_millis(42));
        assert_eq!(result.mined_at, now());
    }

    #[test]
    fn test_mining_result_keeps_reported_instant() {
        let wire: WireMiningResult = serde_json::from_value(json!({
            "block": {"index": 1},
            "minedAt": "2030-05-05T05:05:05Z",
            "executionTime": 1.5
        }))
        .unwrap();
        let result = wire.into_canonical(now()).unwrap();
        assert_eq!(result.mined_at, Utc.with_ymd_and_hms(2030, 5, 5, 5, 5, 5).unwrap());
        assert_eq!(result.execution_time, Duration::from_micros(1500));
    }
}
