use tokio::sync::watch;

use super::state::{MiningState, StartOutcome};
use crate::api::MINE_ENDPOINT;
use crate::command::CommandClient;
use crate::error::{ApiError, TransportErrorKind};
use crate::model::{Ledger, NetworkStatus};
use crate::remote::RemoteStateClient;

/// Drives the mining command through `Idle → Mining → Success | Failed`.
///
/// At most one mining command is in flight per workflow. On success the mined
/// block is folded into the local ledger snapshot straight away, then the
/// ledger is re-read once; that read only catches up with whatever else
/// happened on the service and is not needed for the result to show.
pub struct MiningWorkflow {
    commands: CommandClient,
    ledger: RemoteStateClient<Ledger>,
    state: watch::Sender<MiningState>,
}

impl MiningWorkflow {
    pub fn new(commands: CommandClient, ledger: RemoteStateClient<Ledger>) -> Self {
        let (state, _) = watch::channel(MiningState::Idle);
        Self {
            commands,
            ledger,
            state,
        }
    }

    pub fn state(&self) -> MiningState {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<MiningState> {
        self.state.subscribe()
    }

    pub fn ledger(&self) -> &RemoteStateClient<Ledger> {
        &self.ledger
    }

    pub fn network_status(&self) -> NetworkStatus {
        NetworkStatus::from_snapshot(&self.ledger.snapshot())
    }

    /// Whether the mining control should be enabled.
    pub fn can_mine(&self) -> bool {
        !self.state.borrow().is_mining() && self.network_status().pending_count > 0
    }

    /// Re-reads the ledger so `network_status` is current.
    pub async fn sync_status(&self) -> NetworkStatus {
        self.ledger.refresh().await;
        self.network_status()
    }

    pub async fn start_mining(&self) -> StartOutcome {
        if self.network_status().pending_count == 0 {
            tracing::debug!(
                target: "capsule.mining",
                stage = "mining.disabled",
                "nothing pending, mining not dispatched"
            );
            return StartOutcome::Disabled;
        }

        // Entering `Mining` is the lock: only the caller that flips the state
        // dispatches the command.
        let entered = self.state.send_if_modified(|state| {
            if state.is_mining() {
                return false;
            }
            *state = MiningState::Mining;
            true
        });
        if !entered {
            tracing::debug!(target: "capsule.mining", stage = "mining.busy");
            return StartOutcome::AlreadyMining;
        }
        tracing::info!(target: "capsule.mining", stage = "mining.start");
        let _attempt = AttemptGuard { state: &self.state };

        match self.commands.mine().await {
            Ok(result) => {
                tracing::info!(
                    target: "capsule.mining",
                    stage = "mining.success",
                    index = result.block.index,
                    nonce = result.block.nonce,
                    transactions = result.block.transaction_count(),
                    execution_ms = result.execution_time_ms() as u64
                );
                let block = result.block.clone();
                self.state.send_replace(MiningState::Success(result));
                self.ledger.replace_data(|ledger| ledger.with_mined_block(&block));
                self.ledger.refresh().await;
                StartOutcome::Succeeded
            }
            Err(err) => {
                tracing::warn!(
                    target: "capsule.mining",
                    stage = "mining.failed",
                    error = %err
                );
                self.state.send_replace(MiningState::Failed(err));
                StartOutcome::Failed
            }
        }
    }
}

/// Releases the `Mining` lock when an attempt is dropped before it settles.
struct AttemptGuard<'a> {
    state: &'a watch::Sender<MiningState>,
}

impl Drop for AttemptGuard<'_> {
    fn drop(&mut self) {
        let released = self.state.send_if_modified(|state| {
            if !state.is_mining() {
                return false;
            }
            *state = MiningState::Failed(ApiError::transport(
                TransportErrorKind::Unknown,
                MINE_ENDPOINT,
                "mining attempt abandoned before it settled",
            ));
            true
        });
        if released {
            tracing::warn!(target: "capsule.mining", stage = "mining.abandoned");
        }
    }
}
