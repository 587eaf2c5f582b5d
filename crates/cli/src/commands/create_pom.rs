use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use retropom_pom::{count_licenses_blocks, generate_pom, inject_license};
use retropom_utils::{get_project_root, get_relative_path, get_retropom_config, write_descriptor};

use crate::io::read_descriptor;
use crate::options::FormatOptions;
use crate::prompter::{InquirePrompter, Prompter};

#[derive(Args, Debug, Default)]
#[command(about = "Build the licensed project descriptor and write it to the configured output")]
pub struct CreatePomArgs {
    /// Base descriptor to inject into instead of generating one from the configuration
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Print the descriptor instead of writing it
    #[arg(short, long)]
    pub dry_run: bool,

    /// Overwrite an existing output without asking
    #[arg(short, long)]
    pub yes: bool,

    #[arg(long, default_value = "stdout")]
    pub format: FormatOptions,
}

/// Build and write the licensed descriptor
///
/// # Errors
/// Returns error if the base descriptor is malformed, the configuration cannot be loaded, or
/// the output cannot be written.
pub async fn handle_create_pom(args: &CreatePomArgs) -> Result<()> {
    handle_create_pom_with_prompter(args, &InquirePrompter).await
}

/// # Errors
/// Same as [`handle_create_pom`]; also fails when the prompt is cancelled.
pub async fn handle_create_pom_with_prompter(
    args: &CreatePomArgs,
    prompter: &dyn Prompter,
) -> Result<()> {
    let current_dir = std::env::current_dir()?;
    let config = get_retropom_config(&current_dir).await?;
    let project_root = get_project_root(&current_dir);

    let base = match &args.input {
        Some(path) => read_descriptor(Some(path.as_path())).await?,
        None => generate_pom(&config.coordinates)?,
    };
    let pom = inject_license(&base)?;

    let output = project_root.join(&config.output);
    let relative_output = get_relative_path(&project_root, &output);

    if args.dry_run {
        args.format.print(
            &pom,
            &serde_json::json!({ "output": relative_output, "descriptor": pom }).to_string(),
        );
        return Ok(());
    }

    if output.exists()
        && !args.yes
        && !prompter.confirm(&format!("{relative_output} already exists. Overwrite it?"))?
    {
        args.format.print(
            "Create pom cancelled",
            &serde_json::json!({ "output": relative_output, "written": false }).to_string(),
        );
        return Ok(());
    }

    write_descriptor(&output, &pom).await?;

    let licenses = count_licenses_blocks(&pom)?;
    args.format.print(
        &format!(
            "{} {} {}",
            "Wrote".green().bold(),
            config.coordinates,
            format!("→ {relative_output}").bright_black()
        ),
        &serde_json::json!({
            "output": relative_output,
            "written": true,
            "licenses": licenses,
        })
        .to_string(),
    );
    Ok(())
}
