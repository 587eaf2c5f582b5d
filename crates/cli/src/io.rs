use std::path::Path;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

/// Read a descriptor from `input`, or from stdin when it is absent or `-`
pub(crate) async fn read_descriptor(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut content = String::new();
            tokio::io::stdin()
                .read_to_string(&mut content)
                .await
                .context("Failed to read descriptor from stdin")?;
            Ok(content)
        }
    }
}
