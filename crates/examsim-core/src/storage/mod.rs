mod config;

pub use config::{BankConfig, Config, TimingConfig};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/examsim[-dev]/` based on EXAMSIM_ENV.
///
/// Set EXAMSIM_ENV=dev to use the development config directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("EXAMSIM_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("examsim-dev")
    } else {
        base_dir.join("examsim")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
