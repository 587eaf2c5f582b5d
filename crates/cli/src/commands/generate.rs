use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use retropom_pom::generate_pom;
use retropom_utils::{get_retropom_config, write_descriptor};

#[derive(Args, Debug)]
#[command(about = "Generate a base project descriptor from the configured coordinates")]
pub struct GenerateArgs {
    /// Write the descriptor here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Generate the base descriptor, without licenses
///
/// # Errors
/// Returns error if the configuration cannot be loaded or the output cannot be written.
pub async fn handle_generate(args: &GenerateArgs) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let config = get_retropom_config(&current_dir).await?;
    let pom = generate_pom(&config.coordinates)?;
    match &args.output {
        Some(path) => write_descriptor(path, &pom).await?,
        None => print!("{pom}"),
    }
    Ok(())
}
