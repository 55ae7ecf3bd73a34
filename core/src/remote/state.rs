use chrono::{DateTime, Utc};

use crate::error::ApiError;

/// The latest settled view of one remote resource.
///
/// Replaced wholesale on every settlement; never patched field by field.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<ApiError>,
    /// When the current `data`/`error` settled.
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for ApiState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            updated_at: None,
        }
    }
}

impl<T> ApiState<T> {
    pub(crate) fn settled(result: Result<T, ApiError>, at: DateTime<Utc>) -> Self {
        match result {
            Ok(data) => Self {
                data: Some(data),
                loading: false,
                error: None,
                updated_at: Some(at),
            },
            Err(err) => Self {
                data: None,
                loading: false,
                error: Some(err),
                updated_at: Some(at),
            },
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}
