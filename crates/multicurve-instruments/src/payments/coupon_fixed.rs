//! Fixed-rate coupon.

use std::collections::BTreeSet;

use crate::error::InstrumentResult;
use crate::traits::CurveDependent;
use crate::validation::Checks;

/// A coupon paying `notional × year_fraction × rate` at the payment time.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponFixed {
    payment_time: f64,
    funding_curve: String,
    payment_year_fraction: f64,
    notional: f64,
    rate: f64,
}

impl CouponFixed {
    /// Creates a fixed coupon.
    ///
    /// # Errors
    ///
    /// Returns an error if the time or year fraction is negative, a value is
    /// not finite, or the curve name is empty.
    pub fn new(
        payment_time: f64,
        funding_curve: impl Into<String>,
        payment_year_fraction: f64,
        notional: f64,
        rate: f64,
    ) -> InstrumentResult<Self> {
        let funding_curve = funding_curve.into();
        let checks = Checks::new("CouponFixed");
        checks.time("payment_time", payment_time)?;
        checks.curve("funding_curve", &funding_curve)?;
        checks.non_negative("payment_year_fraction", payment_year_fraction)?;
        checks.finite("notional", notional)?;
        checks.finite("rate", rate)?;

        Ok(Self {
            payment_time,
            funding_curve,
            payment_year_fraction,
            notional,
            rate,
        })
    }

    /// Assembles a coupon from fields already checked elsewhere.
    pub(crate) fn from_parts(
        payment_time: f64,
        funding_curve: String,
        payment_year_fraction: f64,
        notional: f64,
        rate: f64,
    ) -> Self {
        Self {
            payment_time,
            funding_curve,
            payment_year_fraction,
            notional,
            rate,
        }
    }

    /// Returns the same coupon paying a different rate.
    #[must_use]
    pub fn with_rate(&self, rate: f64) -> Self {
        Self {
            rate,
            ..self.clone()
        }
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

    /// Returns the fixed rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the cash amount, `notional × year_fraction × rate`.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.notional * self.payment_year_fraction * self.rate
    }
}

impl CurveDependent for CouponFixed {
    fn collect_curve_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        names.insert(&self.funding_curve);
    }

    fn last_time(&self) -> f64 {
        self.payment_time
    }
}
