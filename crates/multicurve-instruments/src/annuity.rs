//! Ordered sequences of payments.

use std::collections::BTreeSet;

use crate::error::InstrumentResult;
use crate::payments::{CouponFixed, CouponIbor, Payment};
use crate::traits::CurveDependent;
use crate::validation::Checks;

/// A non-empty, ordered sequence of payments of one type.
#[derive(Debug, Clone, PartialEq)]
pub struct Annuity<P> {
    payments: Vec<P>,
}

/// Annuity of arbitrary payments.
pub type GenericAnnuity = Annuity<Payment>;

/// Annuity of fixed-rate coupons.
pub type FixedCouponAnnuity = Annuity<CouponFixed>;

/// Annuity of Ibor coupons.
pub type IborAnnuity = Annuity<CouponIbor>;

impl<P> Annuity<P> {
    /// Creates an annuity from its payments.
    ///
    /// # Errors
    ///
    /// Returns an error if `payments` is empty.
    pub fn new(payments: Vec<P>) -> InstrumentResult<Self> {
        if payments.is_empty() {
            return Checks::new("Annuity").fail("an annuity needs at least one payment");
        }
        Ok(Self { payments })
    }

    /// Returns the payments in order.
    #[must_use]
    pub fn payments(&self) -> &[P] {
        &self.payments
    }

    /// Returns the number of payments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payments.len()
    }

    /// Always false: annuities hold at least one payment.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payments.is_empty()
    }

    /// Iterates over the payments.
    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.payments.iter()
    }

    /// Maps every payment, keeping the order.
    #[must_use]
    pub fn map<Q>(&self, f: impl FnMut(&P) -> Q) -> Annuity<Q> {
        Annuity {
            payments: self.payments.iter().map(f).collect(),
        }
    }
}

impl<'a, P> IntoIterator for &'a Annuity<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.payments.iter()
    }
}

impl<P: CurveDependent> CurveDependent for Annuity<P> {
    fn collect_curve_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        for payment in &self.payments {
            payment.collect_curve_names(names);
        }
    }

    fn last_time(&self) -> f64 {
        self.payments
            .iter()
            .map(CurveDependent::last_time)
            .fold(0.0, f64::max)
    }
}

impl<P: Into<Payment> + Clone> From<&Annuity<P>> for GenericAnnuity {
    fn from(annuity: &Annuity<P>) -> Self {
        annuity.map(|p| p.clone().into())
    }
}

impl FixedCouponAnnuity {
    /// Builds a fixed leg from payment times and accrual factors.
    ///
    /// # Errors
    ///
    /// Returns an error if the slices differ in length, are empty, or any
    /// coupon is invalid.
    pub fn from_schedule(
        payment_times: &[f64],
        year_fractions: &[f64],
        notional: f64,
        rate: f64,
        funding_curve: &str,
    ) -> InstrumentResult<Self> {
        Checks::new("FixedCouponAnnuity").same_len(
            ("payment_times", payment_times.len()),
            ("year_fractions", year_fractions.len()),
        )?;
        let coupons = payment_times
            .iter()
            .zip(year_fractions)
            .map(|(&t, &tau)| CouponFixed::new(t, funding_curve, tau, notional, rate))
            .collect::<InstrumentResult<Vec<_>>>()?;
        Self::new(coupons)
    }

    /// Returns the leg with every coupon paying `rate`.
    #[must_use]
    pub fn with_rate(&self, rate: f64) -> Self {
        self.map(|c| c.with_rate(rate))
    }

    /// Returns the leg with every coupon paying a unit rate.
    #[must_use]
    pub fn with_unit_coupons(&self) -> Self {
        self.with_rate(1.0)
    }
}

impl IborAnnuity {
    /// Builds a floating leg whose coupons fix in advance over consecutive
    /// periods `[start, t_1], [t_1, t_2], ...` and pay at period end.
    ///
    /// Each year fraction serves as both payment and fixing accrual factor.
    ///
    /// # Errors
    ///
    /// Returns an error if the slices differ in length, are empty, or any
    /// coupon is invalid.
    pub fn from_schedule(
        start_time: f64,
        payment_times: &[f64],
        year_fractions: &[f64],
        notional: f64,
        spread: f64,
        funding_curve: &str,
        forward_curve: &str,
    ) -> InstrumentResult<Self> {
        Checks::new("IborAnnuity").same_len(
            ("payment_times", payment_times.len()),
            ("year_fractions", year_fractions.len()),
        )?;
        let mut period_start = start_time;
        let mut coupons = Vec::with_capacity(payment_times.len());
        for (&end, &tau) in payment_times.iter().zip(year_fractions) {
            coupons.push(CouponIbor::new(
                end,
                funding_curve,
                tau,
                notional,
                period_start,
                period_start,
                end,
                tau,
                spread,
                forward_curve,
            )?);
            period_start = end;
        }
        Self::new(coupons)
    }

    /// Returns the leg with every coupon paying `spread`.
    #[must_use]
    pub fn with_spread(&self, spread: f64) -> Self {
        self.map(|c| c.with_spread(spread))
    }

    /// Returns the leg with zero spread.
    #[must_use]
    pub fn with_zero_spread(&self) -> Self {
        self.with_spread(0.0)
    }

    /// Returns fixed coupons paying `notional × τ` on the same dates.
    #[must_use]
    pub fn with_unit_coupons(&self) -> FixedCouponAnnuity {
        self.map(CouponIbor::to_unit_coupon)
    }
}
