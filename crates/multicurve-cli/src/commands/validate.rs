//! Validate command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde_json::json;
use tracing::debug;

use multicurve_config::{ConfigError, Validate, ValidationError};

use crate::cli::OutputFormat;
use crate::commands::load;
use crate::error::CliError;
use crate::output::{print_error, print_json, print_success};

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Problem file (.toml or .json)
    pub file: PathBuf,
}

/// Execute the validate command.
pub fn execute(args: &ValidateArgs, format: OutputFormat) -> Result<()> {
    let definition = load(&args.file)?;

    // Field checks first; building the problem catches what they cannot see.
    let mut errors = definition.validate();
    if errors.is_empty() {
        if let Err(err) = definition.to_problem() {
            debug!(error = %err, "problem assembly failed");
            errors.push(assembly_error(&err));
        }
    }

    let path = args.file.display().to_string();
    match format {
        OutputFormat::Table if errors.is_empty() => print_success(&format!(
            "{path}: {} curve(s), {} known curve(s), {} instrument(s)",
            definition.curves.len(),
            definition.known_curves.len(),
            definition.instruments.len()
        )),
        OutputFormat::Table => {
            for error in &errors {
                print_error(&error.to_string());
            }
        }
        OutputFormat::Json => print_json(&json!({
            "file": path,
            "valid": errors.is_empty(),
            "nodes": definition.node_count(),
            "instruments": definition.instruments.len(),
            "errors": errors
                .iter()
                .map(|e| json!({ "field": e.field, "message": e.message }))
                .collect::<Vec<_>>(),
        }))?,
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CliError::InvalidProblem {
            path,
            errors: errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
        }
        .into())
    }
}

fn assembly_error(err: &ConfigError) -> ValidationError {
    let field = match err {
        ConfigError::Curve(_) => "curves",
        ConfigError::Instrument(_) => "instruments",
        _ => "problem",
    };
    ValidationError::new(field, err.to_string())
}
