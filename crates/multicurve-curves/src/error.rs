//! Error types for curve operations.

use multicurve_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Invalid time argument or a query the curve's extrapolation rejects.
    #[error("Domain error: {reason}")]
    Domain {
        /// Description of the invalid argument.
        reason: String,
    },

    /// Curve not found in a bundle.
    #[error("Unknown curve: {name}")]
    UnknownCurve {
        /// Name of the missing curve.
        name: String,
    },

    /// Two curves share a name where names must be unique.
    #[error("Duplicate curve: {name}")]
    DuplicateCurve {
        /// The colliding name.
        name: String,
    },

    /// Curve nodes violate construction invariants.
    #[error("Invalid curve nodes: {reason}")]
    InvalidNodes {
        /// Description of the violation.
        reason: String,
    },

    /// Unknown interpolation or extrapolation key.
    #[error("Unknown {kind} method: {key}")]
    UnknownMethod {
        /// "interpolation" or "extrapolation".
        kind: &'static str,
        /// The unrecognised key.
        key: String,
    },

    /// Underlying numerical failure.
    #[error("Math error: {0}")]
    Math(MathError),
}

impl CurveError {
    /// Creates a domain error.
    #[must_use]
    pub fn domain(reason: impl Into<String>) -> Self {
        Self::Domain {
            reason: reason.into(),
        }
    }

    /// Creates an unknown curve error.
    #[must_use]
    pub fn unknown_curve(name: impl Into<String>) -> Self {
        Self::UnknownCurve { name: name.into() }
    }

    /// Creates a duplicate curve error.
    #[must_use]
    pub fn duplicate_curve(name: impl Into<String>) -> Self {
        Self::DuplicateCurve { name: name.into() }
    }

    /// Creates an invalid nodes error.
    #[must_use]
    pub fn invalid_nodes(reason: impl Into<String>) -> Self {
        Self::InvalidNodes {
            reason: reason.into(),
        }
    }

    /// Creates a negative-time domain error.
    #[must_use]
    pub fn negative_time(t: f64) -> Self {
        Self::domain(format!("time {t} is negative"))
    }
}

impl From<MathError> for CurveError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::ExtrapolationNotAllowed { x, min, max } => {
                Self::domain(format!("time {x:.4} outside curve range [{min:.4}, {max:.4}]"))
            }
            MathError::InvalidInput { reason } => Self::InvalidNodes { reason },
            MathError::InsufficientData { required, actual } => Self::invalid_nodes(format!(
                "need at least {required} nodes, got {actual}"
            )),
            other => Self::Math(other),
        }
    }
}
