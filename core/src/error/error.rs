use thiserror::Error;

use super::api::ApiError;
use super::validation::ValidationErrors;

/// Failure of a user-initiated command that validates locally before it reaches the network.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    Api(#[from] ApiError),
}

impl ClientError {
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            ClientError::Validation(errors) => Some(errors),
            ClientError::Api(_) => None,
        }
    }
}
