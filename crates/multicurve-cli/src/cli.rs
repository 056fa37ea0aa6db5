//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{CalibrateArgs, TemplateArgs, ValidateArgs};

/// Multicurve - multi-curve yield curve calibration
#[derive(Parser)]
#[command(name = "multicurve")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// More log output (-v for every iteration, -vv for Jacobian assembly)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check a problem file for errors without calibrating
    Validate(ValidateArgs),

    /// Calibrate the curves of a problem file
    Calibrate(CalibrateArgs),

    /// Print a sample two-curve problem file
    Template(TemplateArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
}
