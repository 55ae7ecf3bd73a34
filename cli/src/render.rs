//! Plain-text rendering shared by the commands.

use capsule_core::collection::CapsuleView;
use capsule_core::mining::MiningState;
use capsule_core::model::{Block, LedgerStats, NetworkStatus};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

pub fn when(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

pub fn capsule_line(view: &CapsuleView<'_>) -> String {
    let c = view.capsule;
    let lock = if view.revealed { "Unlocked" } else { "Locked" };
    format!(
        "[{lock}] {sender} (created {created}, unlocks {unlock})\n    {message}",
        sender = c.sender,
        created = when(c.created_at),
        unlock = when(c.unlock_at),
        message = view.message,
    )
}

pub fn capsule_json(view: &CapsuleView<'_>) -> Value {
    let c = view.capsule;
    json!({
        "id": c.id,
        "sender": c.sender,
        "message": view.message,
        "revealed": view.revealed,
        "isPublic": c.is_public,
        "createdAt": c.created_at.to_rfc3339(),
        "unlockDate": c.unlock_at.to_rfc3339(),
    })
}

pub fn stats_block(stats: &LedgerStats) -> String {
    format!(
        "Blocks: {}\nCapsules: {}\nPending: {}\nDifficulty: {}\nMining reward: {}",
        stats.total_blocks,
        stats.total_capsules,
        stats.pending_count,
        stats.difficulty,
        stats.mining_reward
    )
}

pub fn block_line(block: &Block, is_latest: bool) -> String {
    let mut line = format!(
        "#{} {} txs={} nonce={} difficulty={}\n    hash={}\n    prev={}",
        block.index,
        block.timestamp.map(when).unwrap_or_else(|| "-".to_string()),
        block.transaction_count(),
        block.nonce,
        block.difficulty,
        block.hash,
        block.previous_hash,
    );
    if is_latest {
        line.push_str("\n    (latest)");
    }
    line
}

pub fn status_block(status: &NetworkStatus) -> String {
    format!(
        "Network: {}\nBlock height: {}\nPending transactions: {}\nLast sync: {}",
        if status.is_online { "Online" } else { "Offline" },
        status.block_height,
        status.pending_count,
        status.last_sync.map(when).unwrap_or_else(|| "never".to_string()),
    )
}

pub fn mining_json(state: &MiningState) -> Value {
    match state {
        MiningState::Success(result) => json!({
            "state": state.label(),
            "block": {
                "index": result.block.index,
                "nonce": result.block.nonce,
                "hash": result.block.hash,
                "transactions": result.block.transaction_count(),
            },
            "minedAt": result.mined_at.to_rfc3339(),
            "executionTimeMs": result.execution_time_ms() as u64,
        }),
        MiningState::Failed(err) => json!({
            "state": state.label(),
            "notice": state.notice(),
            "error": err.to_string(),
        }),
        _ => json!({ "state": state.label() }),
    }
}
