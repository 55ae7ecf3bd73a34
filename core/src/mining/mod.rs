mod state;
mod workflow;

pub use state::{MiningState, StartOutcome, FAILURE_NOTICE};
pub use workflow::MiningWorkflow;
