use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use retropom_pom::count_licenses_blocks;
use retropom_utils::{get_project_root, get_relative_path, get_retropom_config};

use crate::io::read_descriptor;
use crate::options::FormatOptions;

#[derive(Args, Debug)]
#[command(about = "Check that a project descriptor carries a licenses block")]
pub struct CheckArgs {
    /// Descriptor to check; defaults to the configured output, `-` reads stdin
    pub input: Option<PathBuf>,

    #[arg(long, default_value = "stdout")]
    pub format: FormatOptions,
}

/// Report how many `<licenses>` blocks a descriptor has
///
/// # Errors
/// Returns error if the descriptor cannot be read or parsed, or has no licenses block.
pub async fn handle_check(args: &CheckArgs) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let (label, content) = match &args.input {
        Some(path) => (
            path.display().to_string(),
            read_descriptor(Some(path.as_path())).await?,
        ),
        None => {
            let config = get_retropom_config(&current_dir).await?;
            let project_root = get_project_root(&current_dir);
            let output = project_root.join(&config.output);
            let content = tokio::fs::read_to_string(&output)
                .await
                .with_context(|| format!("Descriptor not found: {}", output.display()))?;
            (get_relative_path(&project_root, &output), content)
        }
    };

    let licenses = count_licenses_blocks(&content)?;
    args.format.print(
        &match licenses {
            0 => format!("{} {label}", "No licenses block in".red()),
            1 => format!("{} {label}", "License block present in".green()),
            n => format!("{} {label}", format!("{n} licenses blocks in").yellow()),
        },
        &serde_json::json!({ "descriptor": label, "licenses": licenses }).to_string(),
    );

    if licenses == 0 {
        anyhow::bail!("no licenses block found in {label}");
    }
    Ok(())
}
