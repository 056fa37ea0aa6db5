//! Error types for instrument construction.

use thiserror::Error;

/// A specialized Result type for instrument construction.
pub type InstrumentResult<T> = Result<T, InstrumentError>;

/// Errors raised while constructing instruments.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InstrumentError {
    /// Instrument data violates an invariant.
    #[error("Invalid {instrument}: {reason}")]
    InvalidInstrument {
        /// Instrument type being constructed.
        instrument: &'static str,
        /// Description of the violation.
        reason: String,
    },
}

impl InstrumentError {
    /// Creates an invalid instrument error.
    #[must_use]
    pub fn invalid(instrument: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInstrument {
            instrument,
            reason: reason.into(),
        }
    }
}
