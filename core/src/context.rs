use std::sync::Arc;

use crate::command::CommandClient;
use crate::config::AppConfig;
use crate::mining::MiningWorkflow;
use crate::model::{Capsule, Ledger};
use crate::remote::{capsules_resource, ledger_resource, RemoteStateClient};
use crate::transport::Transport;

/// Startup-resolved configuration plus the transport every client shares.
///
/// Each `*_client` call opens an independent subscription; views that need
/// their own snapshot should each take one.
#[derive(Clone)]
pub struct AppContext {
    cfg: AppConfig,
    transport: Arc<dyn Transport>,
}

impl AppContext {
    pub fn new(cfg: AppConfig, transport: Arc<dyn Transport>) -> Self {
        Self { cfg, transport }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn transport(&self) -> Arc<dyn Transport> {
        Arc::clone(&self.transport)
    }

    pub fn commands(&self) -> CommandClient {
        CommandClient::new(self.transport())
    }

    pub fn capsules_client(&self) -> RemoteStateClient<Vec<Capsule>> {
        capsules_resource(self.transport())
    }

    pub fn ledger_client(&self) -> RemoteStateClient<Ledger> {
        ledger_resource(self.transport())
    }

    pub fn mining_workflow(&self) -> MiningWorkflow {
        MiningWorkflow::new(self.commands(), self.ledger_client())
    }
}
