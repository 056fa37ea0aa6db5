//! Error types for pricing calculations.

use multicurve_curves::CurveError;
use multicurve_instruments::InstrumentKind;
use thiserror::Error;

/// A specialized Result type for pricing calculations.
pub type PricingResult<T> = Result<T, PricingError>;

/// Errors raised by calculators.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// The calculator has no meaning for this instrument type.
    #[error("{calculator} does not support {instrument}")]
    UnsupportedInstrument {
        /// Calculator name.
        calculator: &'static str,
        /// The rejected instrument type.
        instrument: InstrumentKind,
    },

    /// A par spread or par rate would divide by zero.
    #[error("Degenerate {instrument}: {reason}")]
    DegenerateSpread {
        /// Instrument type being valued.
        instrument: InstrumentKind,
        /// Which denominator vanished.
        reason: String,
    },

    /// Instrument data cannot be valued.
    #[error("Invalid instrument: {reason}")]
    InvalidInstrument {
        /// Description of the problem.
        reason: String,
    },

    /// Curve lookup or evaluation failed.
    #[error(transparent)]
    Curve(#[from] CurveError),
}

impl PricingError {
    /// Creates an unsupported instrument error.
    #[must_use]
    pub fn unsupported(calculator: &'static str, instrument: InstrumentKind) -> Self {
        Self::UnsupportedInstrument {
            calculator,
            instrument,
        }
    }

    /// Creates a degenerate spread error.
    #[must_use]
    pub fn degenerate(instrument: InstrumentKind, reason: impl Into<String>) -> Self {
        Self::DegenerateSpread {
            instrument,
            reason: reason.into(),
        }
    }

    /// Creates an invalid instrument error.
    #[must_use]
    pub fn invalid_instrument(reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            reason: reason.into(),
        }
    }
}
