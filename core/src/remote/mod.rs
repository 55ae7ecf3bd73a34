mod client;
mod resources;
mod state;

pub use client::{Decoder, RemoteStateClient};
pub use resources::{capsules_resource, decode_json, ledger_resource};
pub use state::ApiState;
