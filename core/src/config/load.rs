use std::path::{Path, PathBuf};

use super::types::AppConfig;

pub const ENV_API_BASE_URL: &str = "CAPSULE_API_BASE_URL";
pub const ENV_API_TIMEOUT_MS: &str = "CAPSULE_API_TIMEOUT_MS";

/// Get the default capsule data directory: ~/.capsule
pub fn get_capsule_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".capsule"))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    let cfg = toml::from_str::<AppConfig>(&s)
        .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
    Ok(cfg)
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.capsule/config.toml
    let user_config = get_capsule_data_dir()?.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let cfg = if user_config.exists() {
        load_from_path(&user_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    // Environment variable overrides (Priority 0: highest)
    apply_env_overrides(cfg, |key| std::env::var(key).ok())
}

/// Applies `CAPSULE_*` overrides using `lookup` as the environment.
pub fn apply_env_overrides<F>(mut cfg: AppConfig, lookup: F) -> anyhow::Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_API_BASE_URL) {
        if !v.trim().is_empty() {
            cfg.api.base_url = v.trim().to_string();
        }
    }
    if let Some(v) = lookup(ENV_API_TIMEOUT_MS) {
        if !v.trim().is_empty() {
            let ms = v
                .trim()
                .parse::<u64>()
                .map_err(|e| anyhow::anyhow!("{ENV_API_TIMEOUT_MS}={v:?}: {e}"))?;
            cfg.api.timeout_ms = Some(ms);
        }
    }
    Ok(cfg)
}
