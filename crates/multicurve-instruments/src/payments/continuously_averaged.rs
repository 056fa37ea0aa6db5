//! Payment on a continuously averaged rate.

use std::collections::BTreeSet;

use crate::error::InstrumentResult;
use crate::traits::CurveDependent;
use crate::validation::Checks;

/// A payment of `notional × τ × (R + spread)`, where `R` is the average of
/// the continuously compounded short rate over `[start_time, end_time]`:
///
/// ```text
/// R = (r(end) · end - r(start) · start) / rate_year_fraction
///   = ln(P_idx(start) / P_idx(end)) / rate_year_fraction
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuouslyAveragedPayment {
    payment_time: f64,
    funding_curve: String,
    payment_year_fraction: f64,
    notional: f64,
    index_curve: String,
    rate_year_fraction: f64,
    start_time: f64,
    end_time: f64,
    spread: f64,
}

impl ContinuouslyAveragedPayment {
    /// Creates a continuously averaged payment.
    ///
    /// # Errors
    ///
    /// Returns an error if a time is negative, `start_time > end_time`, the
    /// rate year fraction is not positive, or a curve name is empty.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        payment_time: f64,
        funding_curve: impl Into<String>,
        payment_year_fraction: f64,
        notional: f64,
        index_curve: impl Into<String>,
        rate_year_fraction: f64,
        start_time: f64,
        end_time: f64,
        spread: f64,
    ) -> InstrumentResult<Self> {
        let funding_curve = funding_curve.into();
        let index_curve = index_curve.into();
        let checks = Checks::new("ContinuouslyAveragedPayment");
        checks.time("payment_time", payment_time)?;
        checks.curve("funding_curve", &funding_curve)?;
        checks.non_negative("payment_year_fraction", payment_year_fraction)?;
        checks.finite("notional", notional)?;
        checks.curve("index_curve", &index_curve)?;
        checks.positive("rate_year_fraction", rate_year_fraction)?;
        checks.time("start_time", start_time)?;
        checks.time("end_time", end_time)?;
        checks.ordered(("start_time", start_time), ("end_time", end_time))?;
        checks.finite("spread", spread)?;

        Ok(Self {
            payment_time,
            funding_curve,
            payment_year_fraction,
            notional,
            index_curve,
            rate_year_fraction,
            start_time,
            end_time,
            spread,
        })
    }

    /// Returns the payment time.
    #[must_use]
    pub fn payment_time(&self) -> f64 {
        self.payment_time
    }

    /// Returns the discounting curve name.
    #[must_use]
    pub fn funding_curve(&self) -> &str {
        &self.funding_curve
    }

    /// Returns the accrual factor of the payment.
    #[must_use]
    pub fn payment_year_fraction(&self) -> f64 {
        self.payment_year_fraction
    }

    /// Returns the notional.
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Returns the curve the averaged rate is read from.
    #[must_use]
    pub fn index_curve(&self) -> &str {
        &self.index_curve
    }

    /// Returns the year fraction the averaged rate is quoted over.
    #[must_use]
    pub fn rate_year_fraction(&self) -> f64 {
        self.rate_year_fraction
    }

    /// Returns the start of the averaging period.
    #[must_use]
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Returns the end of the averaging period.
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Returns the spread over the averaged rate.
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.spread
    }
}

impl CurveDependent for ContinuouslyAveragedPayment {
    fn collect_curve_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        names.insert(&self.funding_curve);
        names.insert(&self.index_curve);
    }

    fn last_time(&self) -> f64 {
        self.payment_time.max(self.end_time)
    }
}
