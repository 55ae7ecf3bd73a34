use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the remote ledger service lives and how to talk to it.
///
/// Resolved once at startup and handed to every client; nothing in the core
/// reads the environment on its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Optional transport timeout. Unset means requests may hang until the
    /// caller moves on.
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Extra headers sent with every request (after the JSON content type).
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: None,
            headers: BTreeMap::new(),
        }
    }
}

impl ApiConfig {
    /// Base URL without a trailing slash, ready to have an endpoint path appended.
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    pub fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.normalized_base_url(), endpoint)
        } else {
            format!("{}/{}", self.normalized_base_url(), endpoint)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "capsule_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_joins_without_double_slash() {
        let cfg = ApiConfig {
            base_url: "https://ledger.example.com/".to_string(),
            ..ApiConfig::default()
        };
        assert_eq!(cfg.url_for("/chain"), "https://ledger.example.com/chain");
        assert_eq!(cfg.url_for("api/mine"), "https://ledger.example.com/api/mine");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [api]
            timeout_ms = 2500
            "#,
        )
        .unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:5000");
        assert_eq!(cfg.api.timeout_ms, Some(2500));
        assert!(cfg.logging.enabled);
        assert!(!cfg.logging.file);
    }
}
