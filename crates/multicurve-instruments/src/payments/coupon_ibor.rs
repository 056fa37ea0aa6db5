//! Ibor-indexed floating coupon.

use std::collections::BTreeSet;

use crate::error::InstrumentResult;
use crate::payments::CouponFixed;
use crate::traits::CurveDependent;
use crate::validation::Checks;

/// A floating coupon paying `notional × τ × (F + spread)`.
///
/// `F` is the simply compounded forward over the fixing period, read from
/// the forward curve:
///
/// ```text
/// F = (P_fwd(fixing_start) / P_fwd(fixing_end) - 1) / fixing_year_fraction
/// ```
///
/// The payment is discounted on the funding curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponIbor {
    payment_time: f64,
    funding_curve: String,
    payment_year_fraction: f64,
    notional: f64,
    fixing_time: f64,
    fixing_period_start: f64,
    fixing_period_end: f64,
    fixing_year_fraction: f64,
    spread: f64,
    forward_curve: String,
}

impl CouponIbor {
    /// Creates an Ibor coupon.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - any time is negative or not finite
    /// - `fixing_time <= fixing_period_start <= fixing_period_end` does not hold
    /// - the fixing year fraction is not positive
    /// - a curve name is empty
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        payment_time: f64,
        funding_curve: impl Into<String>,
        payment_year_fraction: f64,
        notional: f64,
        fixing_time: f64,
        fixing_period_start: f64,
        fixing_period_end: f64,
        fixing_year_fraction: f64,
        spread: f64,
        forward_curve: impl Into<String>,
    ) -> InstrumentResult<Self> {
        let funding_curve = funding_curve.into();
        let forward_curve = forward_curve.into();
        let checks = Checks::new("CouponIbor");
        checks.time("payment_time", payment_time)?;
        checks.curve("funding_curve", &funding_curve)?;
        checks.non_negative("payment_year_fraction", payment_year_fraction)?;
        checks.finite("notional", notional)?;
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
        checks.finite("spread", spread)?;
        checks.curve("forward_curve", &forward_curve)?;

        Ok(Self {
            payment_time,
            funding_curve,
            payment_year_fraction,
            notional,
            fixing_time,
            fixing_period_start,
            fixing_period_end,
            fixing_year_fraction,
            spread,
            forward_curve,
        })
    }

    /// Returns the same coupon with a different spread.
    #[must_use]
    pub fn with_spread(&self, spread: f64) -> Self {
        Self {
            spread,
            ..self.clone()
        }
    }

    /// Returns the same coupon with zero spread.
    #[must_use]
    pub fn with_zero_spread(&self) -> Self {
        self.with_spread(0.0)
    }

    /// Returns a fixed coupon paying `notional × τ × 1` on the same dates.
    ///
    /// Its value is the sensitivity of this coupon to its spread.
    #[must_use]
    pub fn to_unit_coupon(&self) -> CouponFixed {
        CouponFixed::from_parts(
            self.payment_time,
            self.funding_curve.clone(),
            self.payment_year_fraction,
            self.notional,
            1.0,
        )
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

    /// Returns the spread over the index.
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.spread
    }

    /// Returns the forward (projection) curve name.
    #[must_use]
    pub fn forward_curve(&self) -> &str {
        &self.forward_curve
    }
}

impl CurveDependent for CouponIbor {
    fn collect_curve_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        names.insert(&self.funding_curve);
        names.insert(&self.forward_curve);
    }

    fn last_time(&self) -> f64 {
        self.payment_time.max(self.fixing_period_end)
    }
}
