//! Multicurve CLI - calibrate discounting and projection curves from a
//! problem file.
//!
//! # Usage
//!
//! ```bash
//! # Check a problem file without solving it
//! multicurve validate demos/two_curve.toml
//!
//! # Calibrate and print the curves and repricing errors
//! multicurve calibrate demos/two_curve.toml
//!
//! # Override solver settings, emit JSON
//! multicurve --format json calibrate problem.json --tolerance 1e-12 --jacobian finite-difference
//!
//! # Print a starting problem file
//! multicurve template > problem.toml
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Validate(args) => commands::validate::execute(&args, cli.format)?,
        Commands::Calibrate(args) => commands::calibrate::execute(&args, cli.format)?,
        Commands::Template(args) => commands::template::execute(&args)?,
    }

    Ok(())
}

/// Logs go to stderr so JSON on stdout stays parseable.
fn init_logging(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
