use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::{
    commands::{
        CheckArgs, ConfigArgs, CreatePomArgs, GenerateArgs, InitArgs, InjectArgs, handle_check,
        handle_config, handle_create_pom, handle_generate, handle_init, handle_inject,
    },
    options::FormatOptions,
};
pub mod commands;
mod io;
pub mod options;
pub mod prompter;

pub use prompter::UserCancelled;

#[derive(Parser, Debug)]
#[command(
    name = "retropom",
    author,
    version,
    about = "Add the Apache 2.0 license block to a Maven project descriptor",
    help_template = "{name} {version}\n{about}\n\n{usage-heading} {usage}\n\n{all-args}"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long, default_value = "false")]
    dry_run: bool,

    #[arg(short, long, default_value = "false")]
    yes: bool,

    #[arg(long, default_value = "stdout")]
    format: FormatOptions,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Init(InitArgs),
    Config(ConfigArgs),
    Inject(InjectArgs),
    Generate(GenerateArgs),
    CreatePom(CreatePomArgs),
    Check(CheckArgs),
}

/// Run the CLI with the given arguments (including the program name)
///
/// # Errors
/// Returns the error of the command that ran.
pub async fn main(args: &[String]) -> Result<()> {
    let cli = Cli::parse_from(args);
    if let Some(command) = cli.command {
        match command {
            Commands::Init(args) => handle_init(&args).await?,
            Commands::Config(args) => handle_config(&args).await?,
            Commands::Inject(args) => handle_inject(&args).await?,
            Commands::Generate(args) => handle_generate(&args).await?,
            Commands::CreatePom(args) => handle_create_pom(&args).await?,
            Commands::Check(args) => handle_check(&args).await?,
        }
    } else {
        handle_create_pom(&CreatePomArgs {
            input: None,
            dry_run: cli.dry_run,
            yes: cli.yes,
            format: cli.format,
        })
        .await?;
    }
    Ok(())
}
