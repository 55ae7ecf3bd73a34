use capsule_core::error::{ApiError, ClientError, ValidationErrors};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("config error: {0}")]
    Config(String),
    #[error("invalid capsule: {0}")]
    Validation(ValidationErrors),
    #[error("request failed: {0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Command(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Validation(errors) => CliError::Validation(errors),
            ClientError::Api(err) => CliError::Api(err),
        }
    }
}

pub fn exit_code_for_error(e: &CliError) -> i32 {
    // 0: success
    // 11: config error
    // 12: local validation error
    // 20: transport / response error
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Validation(_) => 12,
        CliError::Api(_) => 20,
        CliError::Command(_) => 20,
        CliError::Internal(_) => 50,
        CliError::Anyhow(_) => 50,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capsule_core::error::{Field, TransportErrorKind};

    #[test]
    fn test_exit_codes_by_class() {
        let mut errors = ValidationErrors::new();
        errors.add(Field::Name, "Name is required");
        assert_eq!(exit_code_for_error(&ClientError::from(errors).into()), 12);

        let api = ApiError::transport(TransportErrorKind::Connect, "/chain", "refused");
        assert_eq!(exit_code_for_error(&CliError::from(api)), 20);
        assert_eq!(exit_code_for_error(&CliError::Config("bad".into())), 11);
        assert_eq!(exit_code_for_error(&CliError::Internal("no logger".into())), 50);
    }
}
