//! Constant-maturity-swap coupon.

use std::collections::BTreeSet;

use crate::error::InstrumentResult;
use crate::swap::FixedFloatSwap;
use crate::traits::CurveDependent;
use crate::validation::Checks;

/// A coupon paying `notional × τ × S`, where `S` is the par rate of an
/// underlying fixed/float swap observed at the fixing time.
///
/// The underlying's floating coupons must not fix before the CMS fixing.
#[derive(Debug, Clone, PartialEq)]
pub struct CouponCms {
    payment_time: f64,
    funding_curve: String,
    payment_year_fraction: f64,
    notional: f64,
    fixing_time: f64,
    underlying: FixedFloatSwap,
}

impl CouponCms {
    /// Creates a CMS coupon.
    ///
    /// # Errors
    ///
    /// Returns an error if a time is negative, the curve name is empty, or
    /// the underlying swap starts fixing before `fixing_time`.
    pub fn new(
        payment_time: f64,
        funding_curve: impl Into<String>,
        payment_year_fraction: f64,
        notional: f64,
        fixing_time: f64,
        underlying: FixedFloatSwap,
    ) -> InstrumentResult<Self> {
        let funding_curve = funding_curve.into();
        let checks = Checks::new("CouponCms");
        checks.time("payment_time", payment_time)?;
        checks.curve("funding_curve", &funding_curve)?;
        checks.non_negative("payment_year_fraction", payment_year_fraction)?;
        checks.finite("notional", notional)?;
        checks.time("fixing_time", fixing_time)?;

        let first_fixing = underlying
            .receive_leg()
            .payments()
            .iter()
            .map(|c| c.fixing_time())
            .fold(f64::INFINITY, f64::min);
        checks.ordered(
            ("fixing_time", fixing_time),
            ("underlying first fixing", first_fixing),
        )?;

        Ok(Self {
            payment_time,
            funding_curve,
            payment_year_fraction,
            notional,
            fixing_time,
            underlying,
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

    /// Returns the fixing time.
    #[must_use]
    pub fn fixing_time(&self) -> f64 {
        self.fixing_time
    }

    /// Returns the swap whose par rate sets the coupon.
    #[must_use]
    pub fn underlying(&self) -> &FixedFloatSwap {
        &self.underlying
    }
}

impl CurveDependent for CouponCms {
    fn collect_curve_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        names.insert(&self.funding_curve);
        self.underlying.collect_curve_names(names);
    }

    fn last_time(&self) -> f64 {
        self.payment_time.max(self.underlying.last_time())
    }
}
