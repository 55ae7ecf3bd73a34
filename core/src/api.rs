//! Remote service paths and stable re-exports for consumers (`cli`, `plugins`).

pub const CHAIN_ENDPOINT: &str = "/chain";
pub const CAPSULES_ENDPOINT: &str = "/api/capsules";
pub const MINE_ENDPOINT: &str = "/api/mine";

pub use crate::collection::{apply, present, CapsuleView, CollectionQuery, SortKey, StatusFilter};
pub use crate::command::CommandClient;
pub use crate::config::{load_default, ApiConfig, AppConfig, LoggingConfig};
pub use crate::context::AppContext;
pub use crate::draft::{CapsuleDraft, ValidatedDraft};
pub use crate::error::{ApiError, ClientError, Field, TransportErrorKind, ValidationErrors};
pub use crate::mining::{MiningState, MiningWorkflow, StartOutcome};
pub use crate::model::{Block, Capsule, Ledger, LedgerStats, MiningResult, NetworkStatus};
pub use crate::remote::{capsules_resource, ledger_resource, ApiState, RemoteStateClient};
pub use crate::transport::{ApiRequest, Method, RequestOptions, Transport};
pub use crate::visibility::{displayed_message, reveal, LOCKED_PLACEHOLDER};
