use crate::error::ApiError;
use crate::model::MiningResult;

pub const FAILURE_NOTICE: &str = "Mining failed. Please try again.";

/// Where the mining workflow currently stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MiningState {
    #[default]
    Idle,
    Mining,
    Success(MiningResult),
    Failed(ApiError),
}

impl MiningState {
    pub fn is_mining(&self) -> bool {
        matches!(self, MiningState::Mining)
    }

    pub fn result(&self) -> Option<&MiningResult> {
        match self {
            MiningState::Success(result) => Some(result),
            _ => None,
        }
    }

    /// The notice to show the user, if any. Failures are reported generically.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            MiningState::Failed(_) => Some(FAILURE_NOTICE),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MiningState::Idle => "idle",
            MiningState::Mining => "mining",
            MiningState::Success(_) => "success",
            MiningState::Failed(_) => "failed",
        }
    }
}

/// What a call to `start_mining` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Nothing pending; no command was sent.
    Disabled,
    /// Another attempt is already in flight; no command was sent.
    AlreadyMining,
    Succeeded,
    Failed,
}
