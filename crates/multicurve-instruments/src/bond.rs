//! Fixed coupon bond.

use std::collections::BTreeSet;

use crate::annuity::FixedCouponAnnuity;
use crate::error::InstrumentResult;
use crate::payments::PaymentFixed;
use crate::traits::CurveDependent;

/// A bullet bond: a fixed coupon leg plus the principal at maturity.
#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    coupons: FixedCouponAnnuity,
    principal: PaymentFixed,
}

impl Bond {
    /// Creates a bond from its coupons and principal.
    #[must_use]
    pub fn new(coupons: FixedCouponAnnuity, principal: PaymentFixed) -> Self {
        Self { coupons, principal }
    }

    /// Builds a unit-notional bond paying `coupon_rate` on a schedule; the
    /// principal is repaid with the last coupon.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule is empty or invalid.
    pub fn from_schedule(
        payment_times: &[f64],
        year_fractions: &[f64],
        coupon_rate: f64,
        curve: &str,
    ) -> InstrumentResult<Self> {
        let coupons =
            FixedCouponAnnuity::from_schedule(payment_times, year_fractions, 1.0, coupon_rate, curve)?;
        let maturity = coupons.last_time();
        let principal = PaymentFixed::new(maturity, 1.0, curve)?;
        Ok(Self::new(coupons, principal))
    }

    /// Returns the coupon leg.
    #[must_use]
    pub fn coupons(&self) -> &FixedCouponAnnuity {
        &self.coupons
    }

    /// Returns the principal repayment.
    #[must_use]
    pub fn principal(&self) -> &PaymentFixed {
        &self.principal
    }
}

impl CurveDependent for Bond {
    fn collect_curve_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        self.coupons.collect_curve_names(names);
        self.principal.collect_curve_names(names);
    }

    fn last_time(&self) -> f64 {
        self.coupons.last_time().max(self.principal.last_time())
    }
}
