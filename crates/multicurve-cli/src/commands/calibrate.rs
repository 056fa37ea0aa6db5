//! Calibrate command implementation.
//!
//! Solves every curve of a problem file at once and prints the node rates,
//! discount factors and how well each instrument reprices.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use serde_json::json;
use tabled::Tabled;
use tracing::info;

use multicurve_calibration::{
    CalibratedCurves, CalibrationProblem, CalibrationTarget, JacobianMethod, RepricingReport,
};
use multicurve_config::CalibrationSettings;

use crate::cli::OutputFormat;
use crate::commands::load;
use crate::error::CliError;
use crate::output::{format_bps, format_percent, print_header, print_json, print_table};

/// Arguments for the calibrate command.
#[derive(Args, Debug)]
pub struct CalibrateArgs {
    /// Problem file (.toml or .json)
    pub file: PathBuf,

    /// Convergence tolerance on the largest residual
    #[arg(short, long)]
    pub tolerance: Option<f64>,

    /// Maximum Newton iterations
    #[arg(short, long)]
    pub max_iterations: Option<usize>,

    /// Jacobian source
    #[arg(short, long, value_enum)]
    pub jacobian: Option<JacobianChoice>,

    /// What the quotes mean
    #[arg(long, value_enum)]
    pub target: Option<TargetChoice>,

    /// Value instruments in parallel
    #[arg(long)]
    pub parallel: bool,
}

impl CalibrateArgs {
    /// Applies command-line overrides to the file's settings.
    fn apply(&self, settings: &mut CalibrationSettings) {
        if let Some(tolerance) = self.tolerance {
            settings.tolerance = tolerance;
        }
        if let Some(max_iterations) = self.max_iterations {
            settings.max_iterations = max_iterations;
        }
        if let Some(jacobian) = self.jacobian {
            settings.jacobian = jacobian.into();
        }
        if let Some(target) = self.target {
            settings.target = target.into();
        }
        if self.parallel {
            settings.parallel = true;
        }
    }
}

/// Jacobian choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum JacobianChoice {
    /// Chain rule through the curve interpolation
    Analytic,
    /// Central differences on each node
    FiniteDifference,
}

impl From<JacobianChoice> for JacobianMethod {
    fn from(choice: JacobianChoice) -> Self {
        match choice {
            JacobianChoice::Analytic => JacobianMethod::Analytic,
            JacobianChoice::FiniteDifference => JacobianMethod::FiniteDifference,
        }
    }
}

/// Calibration target choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TargetChoice {
    /// Quotes are par rates and spreads
    ParRate,
    /// Instruments are priced to par
    PresentValue,
}

impl From<TargetChoice> for CalibrationTarget {
    fn from(choice: TargetChoice) -> Self {
        match choice {
            TargetChoice::ParRate => CalibrationTarget::ParRate,
            TargetChoice::PresentValue => CalibrationTarget::PresentValue,
        }
    }
}

#[derive(Tabled, Serialize)]
struct NodeRow {
    #[tabled(rename = "Curve")]
    curve: String,
    #[tabled(rename = "Time")]
    time: f64,
    #[tabled(rename = "Zero Rate (%)")]
    zero_rate: String,
    #[tabled(rename = "Discount Factor")]
    discount_factor: String,
}

#[derive(Tabled)]
struct RepricingRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Instrument")]
    instrument: &'static str,
    #[tabled(rename = "Quote")]
    target: String,
    #[tabled(rename = "Model")]
    value: String,
    #[tabled(rename = "Error")]
    error: String,
}

/// Execute the calibrate command.
pub fn execute(args: &CalibrateArgs, format: OutputFormat) -> Result<()> {
    let mut definition = load(&args.file)?;
    args.apply(&mut definition.settings);
    let settings = definition.settings;

    let problem = definition.to_problem()?;
    info!(
        file = %args.file.display(),
        nodes = problem.node_count(),
        quotes = %settings.target,
        jacobian = %settings.jacobian,
        "calibrating"
    );

    let calibrated = settings
        .calibrator()
        .calibrate(&problem, &definition.initial_guess())?;
    let report = RepricingReport::new(&problem, &calibrated.curves)?;
    let nodes = node_rows(&problem, &calibrated)?;

    match format {
        OutputFormat::Table => {
            print_header("Calibrated Curves");
            println!("Iterations: {}", calibrated.iterations);
            println!("Max residual: {:.3e}", calibrated.max_residual());
            println!();
            print_table(&nodes);

            print_header("Repricing");
            let rows: Vec<RepricingRow> = report
                .lines()
                .iter()
                .map(|line| RepricingRow {
                    index: line.index,
                    instrument: line.instrument,
                    target: format!("{:.8}", line.target),
                    value: format!("{:.8}", line.value),
                    error: format_bps(line.error),
                })
                .collect();
            print_table(&rows);
        }
        OutputFormat::Json => print_json(&json!({
            "file": args.file.display().to_string(),
            "iterations": calibrated.iterations,
            "max_residual": calibrated.max_residual(),
            "nodes": nodes,
            "repricing": report.lines(),
        }))?,
    }

    let failures = report.failures(settings.tolerance).count();
    if failures > 0 {
        return Err(CliError::RepricingFailed {
            count: failures,
            tolerance: settings.tolerance,
        }
        .into());
    }

    Ok(())
}

fn node_rows(problem: &CalibrationProblem, calibrated: &CalibratedCurves) -> Result<Vec<NodeRow>> {
    let mut rows = Vec::with_capacity(problem.node_count());
    for unknown in problem.unknown_curves() {
        let curve = calibrated.curves.get_curve(unknown.name())?;
        for &time in unknown.node_times() {
            rows.push(NodeRow {
                curve: unknown.name().to_string(),
                time,
                zero_rate: format_percent(curve.zero_rate(time)?),
                discount_factor: format!("{:.8}", curve.discount_factor(time)?),
            });
        }
    }
    Ok(rows)
}
