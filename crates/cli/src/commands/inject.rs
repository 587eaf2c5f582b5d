use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use retropom_pom::inject_license;
use retropom_utils::write_descriptor;

use crate::io::read_descriptor;

#[derive(Args, Debug)]
#[command(about = "Append the Apache 2.0 license block to a project descriptor")]
pub struct InjectArgs {
    /// Descriptor to read; stdin when omitted or `-`
    pub input: Option<PathBuf>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Inject the license block into a descriptor
///
/// # Errors
/// Returns error if the input cannot be read, is not well-formed XML, or the output cannot be written.
pub async fn handle_inject(args: &InjectArgs) -> Result<()> {
    let content = read_descriptor(args.input.as_deref()).await?;
    let pom = inject_license(&content)?;
    match &args.output {
        Some(path) => write_descriptor(path, &pom).await?,
        None => print!("{pom}"),
    }
    Ok(())
}
