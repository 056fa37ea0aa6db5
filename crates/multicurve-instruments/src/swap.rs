//! Two-leg swaps.
//!
//! A swap pays one leg and receives the other. Legs carry unsigned notionals
//! and the value is `PV(receive) - PV(pay)`.

use std::collections::BTreeSet;

use crate::annuity::{Annuity, FixedCouponAnnuity, IborAnnuity};
use crate::error::InstrumentResult;
use crate::payments::{CouponFixed, CouponIbor, Payment, PaymentFixed};
use crate::traits::CurveDependent;

/// A swap of two annuities.
#[derive(Debug, Clone, PartialEq)]
pub struct Swap<P, R> {
    pay_leg: Annuity<P>,
    receive_leg: Annuity<R>,
}

/// Swap of two arbitrary legs.
pub type GenericSwap = Swap<Payment, Payment>;

/// Pays a fixed leg against an arbitrary receive leg.
pub type FixedCouponSwap = Swap<CouponFixed, Payment>;

/// Pays fixed, receives Ibor.
pub type FixedFloatSwap = Swap<CouponFixed, CouponIbor>;

/// Pays one Ibor leg, receives another (with spread).
pub type TenorSwap = Swap<CouponIbor, CouponIbor>;

/// Floating rate note seen as a swap: the pay leg is the notional exchange
/// (paid at start, returned at maturity), the receive leg the coupons.
pub type FloatingRateNote = Swap<PaymentFixed, CouponIbor>;

impl<P, R> Swap<P, R> {
    /// Creates a swap from its two legs.
    #[must_use]
    pub fn new(pay_leg: Annuity<P>, receive_leg: Annuity<R>) -> Self {
        Self {
            pay_leg,
            receive_leg,
        }
    }

    /// Returns the paid leg.
    #[must_use]
    pub fn pay_leg(&self) -> &Annuity<P> {
        &self.pay_leg
    }

    /// Returns the received leg.
    #[must_use]
    pub fn receive_leg(&self) -> &Annuity<R> {
        &self.receive_leg
    }
}

impl<P: CurveDependent, R: CurveDependent> CurveDependent for Swap<P, R> {
    fn collect_curve_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        self.pay_leg.collect_curve_names(names);
        self.receive_leg.collect_curve_names(names);
    }

    fn last_time(&self) -> f64 {
        self.pay_leg.last_time().max(self.receive_leg.last_time())
    }
}

impl FixedFloatSwap {
    /// Builds a payer swap from regular schedules.
    ///
    /// The floating leg accrues from `start_time`; both legs share the
    /// notional.
    ///
    /// # Errors
    ///
    /// Returns an error if either leg is invalid.
    #[allow(clippy::too_many_arguments)]
    pub fn from_schedules(
        start_time: f64,
        fixed_times: &[f64],
        fixed_year_fractions: &[f64],
        float_times: &[f64],
        float_year_fractions: &[f64],
        notional: f64,
        fixed_rate: f64,
        funding_curve: &str,
        forward_curve: &str,
    ) -> InstrumentResult<Self> {
        let fixed = FixedCouponAnnuity::from_schedule(
            fixed_times,
            fixed_year_fractions,
            notional,
            fixed_rate,
            funding_curve,
        )?;
        let float = IborAnnuity::from_schedule(
            start_time,
            float_times,
            float_year_fractions,
            notional,
            0.0,
            funding_curve,
            forward_curve,
        )?;
        Ok(Self::new(fixed, float))
    }

    /// Returns the swap with its floating leg widened to generic payments.
    #[must_use]
    pub fn to_fixed_coupon_swap(&self) -> FixedCouponSwap {
        Swap::new(self.pay_leg.clone(), (&self.receive_leg).into())
    }
}

impl FloatingRateNote {
    /// Builds a note from its coupons: notional paid at `start_time` and
    /// returned with the last coupon.
    ///
    /// # Errors
    ///
    /// Returns an error if the start time is negative.
    pub fn floating_rate_note(start_time: f64, coupons: IborAnnuity) -> InstrumentResult<Self> {
        let last = &coupons.payments()[coupons.len() - 1];
        let funding = last.funding_curve().to_string();
        let notional = last.notional();

        let exchange = Annuity::new(vec![
            PaymentFixed::new(start_time, notional, funding.as_str())?,
            PaymentFixed::new(last.payment_time(), -notional, funding)?,
        ])?;
        Ok(Self::new(exchange, coupons))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vanilla() -> FixedFloatSwap {
        FixedFloatSwap::from_schedules(
            0.0,
            &[1.0, 2.0],
            &[1.0, 1.0],
            &[0.5, 1.0, 1.5, 2.0],
            &[0.5, 0.5, 0.5, 0.5],
            1.0,
            0.03,
            "OIS",
            "LIBOR-6M",
        )
        .unwrap()
    }

    #[test]
    fn test_vanilla_legs() {
        let swap = vanilla();
        assert_eq!(swap.pay_leg().len(), 2);
        assert_eq!(swap.receive_leg().len(), 4);
        assert_eq!(swap.last_time(), 2.0);
        assert_eq!(swap.curve_names(), vec!["LIBOR-6M", "OIS"]);
    }

    #[test]
    fn test_widen_to_fixed_coupon_swap() {
        let swap = vanilla().to_fixed_coupon_swap();
        assert!(swap
            .receive_leg()
            .iter()
            .all(|p| matches!(p, Payment::Ibor(_))));
    }

    #[test]
    fn test_floating_rate_note_exchange() {
        let coupons =
            IborAnnuity::from_schedule(0.5, &[1.0, 1.5], &[0.5, 0.5], 100.0, 0.0, "OIS", "LIBOR-6M")
                .unwrap();
        let frn = FloatingRateNote::floating_rate_note(0.5, coupons).unwrap();

        let amounts: Vec<f64> = frn.pay_leg().iter().map(PaymentFixed::amount).collect();
        assert_eq!(amounts, vec![100.0, -100.0]);
        assert_eq!(frn.pay_leg().payments()[1].payment_time(), 1.5);
    }
}
