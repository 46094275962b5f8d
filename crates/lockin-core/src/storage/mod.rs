mod cache;
mod config;
pub mod credentials;

pub use cache::{CacheEntry, DevSession, GoalCache, GOALS_ENTRY};
pub use config::{ApiConfig, Config, ExportConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/lockin[-dev]/` based on LOCKIN_ENV.
///
/// Set LOCKIN_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let dir = if is_dev_env() {
        base_dir.join("lockin-dev")
    } else {
        base_dir.join("lockin")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Whether LOCKIN_ENV selects the development environment.
pub fn is_dev_env() -> bool {
    std::env::var("LOCKIN_ENV").is_ok_and(|env| env == "dev")
}
