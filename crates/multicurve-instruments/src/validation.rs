//! Field checks shared by the validating constructors.

use crate::error::{InstrumentError, InstrumentResult};

/// Runs field checks on behalf of one instrument type.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checks {
    instrument: &'static str,
}

impl Checks {
    pub(crate) fn new(instrument: &'static str) -> Self {
        Self { instrument }
    }

    pub(crate) fn fail<T>(self, reason: impl Into<String>) -> InstrumentResult<T> {
        Err(InstrumentError::invalid(self.instrument, reason))
    }

    pub(crate) fn finite(self, field: &str, value: f64) -> InstrumentResult<()> {
        if value.is_finite() {
            Ok(())
        } else {
            self.fail(format!("{field} must be finite, got {value}"))
        }
    }

    /// A time: finite and non-negative.
    pub(crate) fn time(self, field: &str, value: f64) -> InstrumentResult<()> {
        self.non_negative(field, value)
    }

    pub(crate) fn non_negative(self, field: &str, value: f64) -> InstrumentResult<()> {
        self.finite(field, value)?;
        if value < 0.0 {
            return self.fail(format!("{field} must be non-negative, got {value}"));
        }
        Ok(())
    }

    pub(crate) fn positive(self, field: &str, value: f64) -> InstrumentResult<()> {
        self.finite(field, value)?;
        if value <= 0.0 {
            return self.fail(format!("{field} must be positive, got {value}"));
        }
        Ok(())
    }

    pub(crate) fn ordered(
        self,
        earlier: (&str, f64),
        later: (&str, f64),
    ) -> InstrumentResult<()> {
        if earlier.1 > later.1 {
            return self.fail(format!(
                "{} ({}) is after {} ({})",
                earlier.0, earlier.1, later.0, later.1
            ));
        }
        Ok(())
    }

    pub(crate) fn curve(self, field: &str, name: &str) -> InstrumentResult<()> {
        if name.trim().is_empty() {
            return self.fail(format!("{field} must name a curve"));
        }
        Ok(())
    }

    pub(crate) fn same_len(self, a: (&str, usize), b: (&str, usize)) -> InstrumentResult<()> {
        if a.1 != b.1 {
            return self.fail(format!(
                "{} has {} entries but {} has {}",
                a.0, a.1, b.0, b.1
            ));
        }
        Ok(())
    }
}
