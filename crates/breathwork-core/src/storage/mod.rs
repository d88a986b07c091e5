mod config;
pub mod database;
mod tracker;

pub use config::{Config, CuesConfig, SessionConfig};
pub use database::Database;
pub use tracker::{SessionTracker, CUSTOM_PATTERNS_KEY, SESSIONS_KEY};

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Returns the data directory, creating it if needed.
///
/// `BREATHWORK_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/breathwork[-dev]/`, with `BREATHWORK_ENV=dev` selecting the
/// development directory.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("BREATHWORK_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("BREATHWORK_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("breathwork-dev")
            } else {
                base_dir.join("breathwork")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
