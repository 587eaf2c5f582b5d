use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs::{create_dir_all, write};

/// Write a descriptor to `path`, creating missing parent directories
///
/// # Errors
/// Returns error if the directory or the file cannot be written.
pub async fn write_descriptor(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    write(path, content)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}
