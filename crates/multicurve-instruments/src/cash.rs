//! Cash deposit.

use std::collections::BTreeSet;

use crate::error::InstrumentResult;
use crate::traits::CurveDependent;
use crate::validation::Checks;

/// Largest gap between trade time and maturity still treated as a
/// zero-length deposit.
pub const ZERO_LENGTH_TOLERANCE: f64 = 1e-16;

/// A deposit: `notional` lent at `trade_time`, repaid with simple interest
/// at `maturity`.
///
/// A zero year fraction describes an instantaneous deposit and requires
/// `maturity == trade_time` to within [`ZERO_LENGTH_TOLERANCE`].
#[derive(Debug, Clone, PartialEq)]
pub struct Cash {
    notional: f64,
    trade_time: f64,
    maturity: f64,
    year_fraction: f64,
    rate: f64,
    curve: String,
}

impl Cash {
    /// Creates a cash deposit.
    ///
    /// # Errors
    ///
    /// Returns an error if a time is negative, `maturity < trade_time`, the
    /// year fraction is negative, or it is zero while the deposit has a
    /// non-zero length.
    pub fn new(
        notional: f64,
        trade_time: f64,
        maturity: f64,
        year_fraction: f64,
        rate: f64,
        curve: impl Into<String>,
    ) -> InstrumentResult<Self> {
        let curve = curve.into();
        let checks = Checks::new("Cash");
        checks.finite("notional", notional)?;
        checks.time("trade_time", trade_time)?;
        checks.time("maturity", maturity)?;
        checks.ordered(("trade_time", trade_time), ("maturity", maturity))?;
        checks.non_negative("year_fraction", year_fraction)?;
        checks.finite("rate", rate)?;
        checks.curve("curve", &curve)?;
        if year_fraction == 0.0 && maturity - trade_time > ZERO_LENGTH_TOLERANCE {
            return checks.fail("zero year fraction requires maturity == trade_time");
        }

        Ok(Self {
            notional,
            trade_time,
            maturity,
            year_fraction,
            rate,
            curve,
        })
    }

    /// Returns the notional.
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Returns the time the deposit starts.
    #[must_use]
    pub fn trade_time(&self) -> f64 {
        self.trade_time
    }

    /// Returns the time the deposit is repaid.
    #[must_use]
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Returns the accrual factor.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        self.year_fraction
    }

    /// Returns the deposit rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the curve name used for both ends.
    #[must_use]
    pub fn curve(&self) -> &str {
        &self.curve
    }

    /// Returns true for an instantaneous (zero year fraction) deposit.
    #[must_use]
    pub fn is_instantaneous(&self) -> bool {
        self.year_fraction == 0.0
    }
}

impl CurveDependent for Cash {
    fn collect_curve_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        names.insert(&self.curve);
    }

    fn last_time(&self) -> f64 {
        self.maturity
    }
}
