//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The problem file failed validation.
    #[error("{path} is invalid:\n{errors}")]
    InvalidProblem {
        /// The problem file.
        path: String,
        /// One validation error per line.
        errors: String,
    },

    /// Calibrated curves miss a quote by more than the tolerance.
    #[error("{count} instrument(s) reprice outside the tolerance of {tolerance:e}")]
    RepricingFailed {
        /// Number of instruments off target.
        count: usize,
        /// The tolerance.
        tolerance: f64,
    },
}
