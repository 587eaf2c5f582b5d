use std::path::Path;

use anyhow::{Context, Result};
use retropom_core::Config;

use crate::get_retropom_dir;

pub const CONFIG_FILE: &str = "config.json";

/// Load `.retropom/config.json`, or the default configuration when the file does not exist
///
/// # Errors
/// Returns error if the file exists but cannot be read or is not valid JSON.
pub async fn get_retropom_config(current_dir: &Path) -> Result<Config> {
    let config_file = get_retropom_dir(current_dir).join(CONFIG_FILE);
    if !config_file.is_file() {
        return Ok(Config::default());
    }
    let content = tokio::fs::read_to_string(&config_file)
        .await
        .with_context(|| format!("Failed to read {}", config_file.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", config_file.display()))
}
