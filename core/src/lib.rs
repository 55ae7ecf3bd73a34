//! Client-side synchronization and workflow core for the Capsule Ledger.
//!
//! Everything that talks to the remote service goes through [`transport::Transport`];
//! the reqwest-backed implementation lives in `capsule-plugins`.

pub mod api;
pub mod collection;
pub mod command;
pub mod config;
pub mod context;
pub mod draft;
pub mod error;
pub mod mining;
pub mod model;
pub mod remote;
pub mod transport;
pub mod visibility;
pub mod wire;

#[cfg(test)]
pub(crate) mod testing;
