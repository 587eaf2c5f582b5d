use tokio::fs::{create_dir_all, write};

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use retropom_core::Config;
use retropom_utils::{CONFIG_FILE, get_retropom_dir};

#[derive(Args, Debug)]
#[command(about = "Initialize a new retropom project")]
pub struct InitArgs {
    /// If true, do not make any filesystem changes.
    #[arg(short, long, default_value = "false")]
    pub dry_run: bool,
}

/// Create `.retropom/config.json` holding the default configuration
///
/// # Errors
/// Returns error if the project is already initialized or the file cannot be written.
pub async fn handle_init(args: &InitArgs) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let retropom_dir = get_retropom_dir(&current_dir);
    let config_file = retropom_dir.join(CONFIG_FILE);
    if config_file.exists() {
        anyhow::bail!("retropom project already initialized");
    }
    if !args.dry_run {
        create_dir_all(&retropom_dir).await?;
        write(
            &config_file,
            format!("{}\n", serde_json::to_string_pretty(&Config::default())?),
        )
        .await?;
    }

    println!(
        "{} {}",
        "retropom project initialized in".green(),
        retropom_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        init: InitArgs,
    }

    #[test]
    fn test_init_args_default() {
        let cli = TestCli::parse_from(["test"]);
        assert!(!cli.init.dry_run);
    }

    #[test]
    fn test_init_args_dry_run() {
        let cli = TestCli::parse_from(["test", "--dry-run"]);
        assert!(cli.init.dry_run);
    }
}
