//! Template command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::output::print_success;

const TWO_CURVE: &str = include_str!("../../../../demos/two_curve.toml");

/// Arguments for the template command.
#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Write the template to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute the template command.
pub fn execute(args: &TemplateArgs) -> Result<()> {
    match &args.output {
        Some(path) => {
            std::fs::write(path, TWO_CURVE)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            print_success(&format!("Wrote {}", path.display()));
        }
        None => print!("{TWO_CURVE}"),
    }
    Ok(())
}
