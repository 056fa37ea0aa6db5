//! Error types for curve calibration.

use multicurve_curves::CurveError;
use multicurve_math::MathError;
use multicurve_pricing::PricingError;
use nalgebra::DMatrix;
use thiserror::Error;

/// A specialized Result type for calibration.
pub type CalibrationResult<T> = Result<T, CalibrationError>;

/// Solver state when Newton iteration gave up.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedIteration {
    /// `target - value` per instrument at the last point.
    pub residuals: Vec<f64>,
    /// Node values at the last point, curve block by curve block.
    pub node_values: Vec<f64>,
    /// The last Jacobian evaluated, if any.
    pub jacobian: Option<DMatrix<f64>>,
}

/// Errors raised while setting up or solving a calibration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// A vector or problem has the wrong size.
    #[error("Dimension mismatch in {context}: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// What was being sized.
        context: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// The problem has no instruments.
    #[error("Calibration problem has no instruments")]
    EmptyProblem,

    /// A curve name is defined twice.
    #[error("Curve defined twice: {name}")]
    DuplicateCurve {
        /// The repeated name.
        name: String,
    },

    /// An instrument references a curve that is neither known nor calibrated.
    #[error("Instrument {index} references unknown curve {name}")]
    UnknownCurve {
        /// Position of the instrument in the problem.
        index: usize,
        /// The missing curve name.
        name: String,
    },

    /// A quote or setting is out of range.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the problem.
        reason: String,
    },

    /// Newton iteration did not reach the tolerance.
    #[error("Calibration failed to converge after {iterations} iterations (max residual {max_residual:e})")]
    ConvergenceFailure {
        /// Newton steps taken.
        iterations: usize,
        /// Largest absolute residual at the last point.
        max_residual: f64,
        /// State at the last point.
        state: Box<FailedIteration>,
    },

    /// The Newton step could not be solved for.
    #[error("Singular Jacobian at iteration {iterations}: {source}")]
    SingularJacobian {
        /// Newton steps taken before the failed solve.
        iterations: usize,
        /// The solver error.
        source: MathError,
        /// State at the failing point, with the singular Jacobian.
        state: Box<FailedIteration>,
    },

    /// Curve construction or evaluation failed.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// An instrument could not be valued.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A numerical routine failed outside the Newton step.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl CalibrationError {
    /// Creates a dimension mismatch error.
    #[must_use]
    pub fn dimension_mismatch(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch {
            context,
            expected,
            actual,
        }
    }

    /// Creates a duplicate curve error.
    #[must_use]
    pub fn duplicate_curve(name: impl Into<String>) -> Self {
        Self::DuplicateCurve { name: name.into() }
    }

    /// Creates an unknown curve error.
    #[must_use]
    pub fn unknown_curve(index: usize, name: impl Into<String>) -> Self {
        Self::UnknownCurve {
            index,
            name: name.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Returns the solver state if Newton iteration gave up.
    #[must_use]
    pub fn failed_iteration(&self) -> Option<&FailedIteration> {
        match self {
            Self::ConvergenceFailure { state, .. } | Self::SingularJacobian { state, .. } => {
                Some(state)
            }
            _ => None,
        }
    }
}
