use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::Block;

/// Outcome of a successful mining command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MiningResult {
    pub block: Block,
    pub mined_at: DateTime<Utc>,
    pub execution_time: Duration,
}

impl MiningResult {
    pub fn execution_time_ms(&self) -> u128 {
        self.execution_time.as_millis()
    }
}
