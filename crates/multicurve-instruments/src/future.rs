//! Interest rate future.

use std::collections::BTreeSet;

use crate::error::InstrumentResult;
use crate::traits::CurveDependent;
use crate::validation::Checks;

/// A margined interest rate future.
///
/// The futures price is `1 - F`; the position is worth
/// `N · α · (1 - F - reference_price)` and is not discounted.
#[derive(Debug, Clone, PartialEq)]
pub struct InterestRateFuture {
    fixing_time: f64,
    fixing_period_start: f64,
    fixing_period_end: f64,
    fixing_year_fraction: f64,
    payment_accrual_factor: f64,
    reference_price: f64,
    notional: f64,
    curve: String,
}

impl InterestRateFuture {
    /// Creates a future.
    ///
    /// # Errors
    ///
    /// Returns an error if a time is negative, the fixing times are out of
    /// order, the fixing year fraction is not positive, or the curve name is
    /// empty.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fixing_time: f64,
        fixing_period_start: f64,
        fixing_period_end: f64,
        fixing_year_fraction: f64,
        payment_accrual_factor: f64,
        reference_price: f64,
        notional: f64,
        curve: impl Into<String>,
    ) -> InstrumentResult<Self> {
        let curve = curve.into();
        let checks = Checks::new("InterestRateFuture");
        checks.time("fixing_time", fixing_time)?;
        checks.time("fixing_period_start", fixing_period_start)?;
        checks.time("fixing_period_end", fixing_period_end)?;
        checks.ordered(
            ("fixing_time", fixing_time),
            ("fixing_period_start", fixing_period_start),
        )?;
        checks.ordered(
            ("fixing_period_start", fixing_period_start),
            ("fixing_period_end", fixing_period_end),
        )?;
        checks.positive("fixing_year_fraction", fixing_year_fraction)?;
        checks.non_negative("payment_accrual_factor", payment_accrual_factor)?;
        checks.finite("reference_price", reference_price)?;
        checks.finite("notional", notional)?;
        checks.curve("curve", &curve)?;

        Ok(Self {
            fixing_time,
            fixing_period_start,
            fixing_period_end,
            fixing_year_fraction,
            payment_accrual_factor,
            reference_price,
            notional,
            curve,
        })
    }

    /// Returns the fixing time.
    #[must_use]
    pub fn fixing_time(&self) -> f64 {
        self.fixing_time
    }

    /// Returns the start of the fixing period.
    #[must_use]
    pub fn fixing_period_start(&self) -> f64 {
        self.fixing_period_start
    }

    /// Returns the end of the fixing period.
    #[must_use]
    pub fn fixing_period_end(&self) -> f64 {
        self.fixing_period_end
    }

    /// Returns the accrual factor of the fixing period.
    #[must_use]
    pub fn fixing_year_fraction(&self) -> f64 {
        self.fixing_year_fraction
    }

    /// Returns the accrual factor applied to price moves.
    #[must_use]
    pub fn payment_accrual_factor(&self) -> f64 {
        self.payment_accrual_factor
    }

    /// Returns the price the position was margined at.
    #[must_use]
    pub fn reference_price(&self) -> f64 {
        self.reference_price
    }

    /// Returns the notional.
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Returns the forward curve name.
    #[must_use]
    pub fn curve(&self) -> &str {
        &self.curve
    }
}

impl CurveDependent for InterestRateFuture {
    fn collect_curve_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        names.insert(&self.curve);
    }

    fn last_time(&self) -> f64 {
        self.fixing_period_end
    }
}
