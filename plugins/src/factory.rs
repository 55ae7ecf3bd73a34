use std::sync::Arc;

use anyhow::Result;

use capsule_core::config::AppConfig;
use capsule_core::context::AppContext;
use capsule_core::transport::Transport;

use crate::http::HttpTransport;

pub fn build_transport(cfg: &AppConfig) -> Result<Arc<dyn Transport>> {
    Ok(Arc::new(HttpTransport::new(&cfg.api)?))
}

pub fn build_context(cfg: AppConfig) -> Result<AppContext> {
    let transport = build_transport(&cfg)?;
    Ok(AppContext::new(cfg, transport))
}
