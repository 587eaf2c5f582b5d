use anyhow::Result;
use clap::Args;
use retropom_utils::get_retropom_config;

#[derive(Args, Debug)]
#[command(about = "Show retropom configuration")]
pub struct ConfigArgs {}

/// Display retropom configuration
///
/// # Errors
/// Returns error if reading the configuration fails.
pub async fn handle_config(_args: &ConfigArgs) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let config = get_retropom_config(&current_dir).await?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
