pub mod api;
#[allow(clippy::module_inception)]
pub mod error;
pub mod validation;

pub use api::{ApiError, TransportErrorKind};
pub use error::ClientError;
pub use validation::{Field, ValidationErrors};
