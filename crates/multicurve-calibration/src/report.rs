//! Repricing of calibration instruments.
//!
//! A calibrated curve set is only as good as its fit: every input instrument
//! must come back to its quote. [`RepricingReport`] values each instrument
//! on the calibrated curves and records the difference.

use std::fmt;

use serde::Serialize;

use multicurve_curves::CurveBundle;
use multicurve_instruments::Visitable;

use crate::error::CalibrationResult;
use crate::problem::CalibrationProblem;

/// One instrument's fit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepricingLine {
    /// Position in the problem.
    pub index: usize,
    /// Instrument type name.
    pub instrument: &'static str,
    /// Market quote.
    pub target: f64,
    /// Value on the calibrated curves.
    pub value: f64,
    /// `value - target`.
    pub error: f64,
}

/// Per-instrument repricing errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepricingReport {
    lines: Vec<RepricingLine>,
}

impl RepricingReport {
    /// Values every instrument of `problem` on `curves`.
    pub fn new(problem: &CalibrationProblem, curves: &CurveBundle) -> CalibrationResult<Self> {
        let values = problem.values_on(curves)?;
        let lines = problem
            .instruments()
            .iter()
            .zip(problem.quotes())
            .zip(values)
            .enumerate()
            .map(|(index, ((instrument, &target), value))| RepricingLine {
                index,
                instrument: instrument.kind().name(),
                target,
                value,
                error: value - target,
            })
            .collect();
        Ok(Self { lines })
    }

    /// Returns the lines in instrument order.
    #[must_use]
    pub fn lines(&self) -> &[RepricingLine] {
        &self.lines
    }

    /// Returns the largest absolute error.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.lines
            .iter()
            .fold(0.0_f64, |acc, line| acc.max(line.error.abs()))
    }

    /// Returns true if every error is within `tolerance`.
    #[must_use]
    pub fn all_within(&self, tolerance: f64) -> bool {
        self.lines.iter().all(|line| line.error.abs() <= tolerance)
    }

    /// Returns the lines whose error exceeds `tolerance`.
    pub fn failures(&self, tolerance: f64) -> impl Iterator<Item = &RepricingLine> {
        self.lines
            .iter()
            .filter(move |line| line.error.abs() > tolerance)
    }
}

impl fmt::Display for RepricingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:>3}  {:<28} {:>14} {:>14} {:>10}",
            "#", "instrument", "target", "value", "error"
        )?;
        for line in &self.lines {
            writeln!(
                f,
                "{:>3}  {:<28} {:>14.8} {:>14.8} {:>10.2e}",
                line.index, line.instrument, line.target, line.value, line.error
            )?;
        }
        write!(f, "max error: {:.2e}", self.max_error())
    }
}
