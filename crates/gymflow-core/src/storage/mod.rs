pub mod config;
pub mod database;

pub use config::Config;
pub use database::Database;

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/gymflow[-dev]/` based on GYMFLOW_ENV.
///
/// Set GYMFLOW_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("GYMFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("gymflow-dev")
    } else {
        base_dir.join("gymflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
