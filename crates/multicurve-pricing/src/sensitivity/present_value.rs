//! Present value sensitivities to discount factors.

use multicurve_curves::CurveBundle;
use multicurve_instruments::prelude::*;

use crate::error::{PricingError, PricingResult};
use crate::rates::{averaged_rate, averaged_rate_sensitivities, discount, forward, forward_sensitivities};
use crate::sensitivity::{CurveSensitivities, ParRateSensitivityCalculator};
use crate::ParRateCalculator;

/// `∂PV/∂P(curve, t)` for every discount factor an instrument reads.
///
/// Supports every instrument the [`PresentValueCalculator`](crate::PresentValueCalculator)
/// supports.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentValueSensitivityCalculator;

impl PresentValueSensitivityCalculator {
    /// Creates the calculator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Computes the sensitivities of `instrument`.
    pub fn calculate<I>(&self, instrument: &I, curves: &CurveBundle) -> PricingResult<CurveSensitivities>
    where
        I: Visitable + ?Sized,
    {
        instrument.accept(self, curves)
    }

    pub(crate) fn annuity<P: Visitable>(
        &self,
        annuity: &Annuity<P>,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        annuity
            .iter()
            .try_fold(CurveSensitivities::new(), |acc, p| {
                Ok(acc.plus(p.accept(self, curves)?))
            })
    }

    fn swap<P: Visitable, R: Visitable>(
        &self,
        swap: &Swap<P, R>,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        let receive = self.annuity(swap.receive_leg(), curves)?;
        let pay = self.annuity(swap.pay_leg(), curves)?;
        Ok(receive.plus(pay.scaled(-1.0)))
    }
}

impl InstrumentVisitor<CurveBundle> for PresentValueSensitivityCalculator {
    type Output = CurveSensitivities;
    type Error = PricingError;

    fn visit_cash(&self, cash: &Cash, curves: &CurveBundle) -> PricingResult<CurveSensitivities> {
        discount(curves, cash.curve(), cash.trade_time())?;
        discount(curves, cash.curve(), cash.maturity())?;
        let n = cash.notional();
        let mut sens = CurveSensitivities::single(cash.curve(), cash.trade_time(), -n);
        sens.add(
            cash.curve(),
            cash.maturity(),
            n * (1.0 + cash.rate() * cash.year_fraction()),
        );
        Ok(sens)
    }

    fn visit_forward_rate_agreement(
        &self,
        fra: &ForwardRateAgreement,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        let (start, end, tau_fix) = (
            fra.fixing_period_start(),
            fra.fixing_period_end(),
            fra.fixing_year_fraction(),
        );
        let f = forward(curves, fra.forward_curve(), start, end, tau_fix)?;
        let df = discount(curves, fra.funding_curve(), fra.settlement_time())?;
        let n = fra.notional();
        let tau = fra.payment_year_fraction();
        let k = fra.rate();

        let payoff = n * tau * (f - k) / (1.0 + tau * f);
        let dpayoff_df = n * tau * (1.0 + tau * k) / ((1.0 + tau * f) * (1.0 + tau * f));

        let funding = CurveSensitivities::single(fra.funding_curve(), fra.settlement_time(), payoff);
        let projection =
            forward_sensitivities(curves, fra.forward_curve(), start, end, tau_fix, df * dpayoff_df)?;
        Ok(funding.plus(projection))
    }

    fn visit_interest_rate_future(
        &self,
        future: &InterestRateFuture,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        forward_sensitivities(
            curves,
            future.curve(),
            future.fixing_period_start(),
            future.fixing_period_end(),
            future.fixing_year_fraction(),
            -future.notional() * future.payment_accrual_factor(),
        )
    }

    fn visit_bond(&self, bond: &Bond, curves: &CurveBundle) -> PricingResult<CurveSensitivities> {
        Ok(self
            .annuity(bond.coupons(), curves)?
            .plus(bond.principal().accept(self, curves)?))
    }

    fn visit_generic_annuity(
        &self,
        annuity: &GenericAnnuity,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        self.annuity(annuity, curves)
    }

    fn visit_fixed_coupon_annuity(
        &self,
        annuity: &FixedCouponAnnuity,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        self.annuity(annuity, curves)
    }

    fn visit_ibor_annuity(
        &self,
        annuity: &IborAnnuity,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        self.annuity(annuity, curves)
    }

    fn visit_generic_swap(
        &self,
        swap: &GenericSwap,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        self.swap(swap, curves)
    }

    fn visit_fixed_coupon_swap(
        &self,
        swap: &FixedCouponSwap,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        self.swap(swap, curves)
    }

    fn visit_fixed_float_swap(
        &self,
        swap: &FixedFloatSwap,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        self.swap(swap, curves)
    }

    fn visit_tenor_swap(
        &self,
        swap: &TenorSwap,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        self.swap(swap, curves)
    }

    fn visit_floating_rate_note(
        &self,
        frn: &FloatingRateNote,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        self.swap(frn, curves)
    }

    fn visit_fixed_payment(
        &self,
        payment: &PaymentFixed,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        discount(curves, payment.funding_curve(), payment.payment_time())?;
        Ok(CurveSensitivities::single(
            payment.funding_curve(),
            payment.payment_time(),
            payment.amount(),
        ))
    }

    fn visit_fixed_coupon(
        &self,
        coupon: &CouponFixed,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        discount(curves, coupon.funding_curve(), coupon.payment_time())?;
        Ok(CurveSensitivities::single(
            coupon.funding_curve(),
            coupon.payment_time(),
            coupon.amount(),
        ))
    }

    fn visit_ibor_coupon(
        &self,
        coupon: &CouponIbor,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        let (start, end, tau_fix) = (
            coupon.fixing_period_start(),
            coupon.fixing_period_end(),
            coupon.fixing_year_fraction(),
        );
        let f = forward(curves, coupon.forward_curve(), start, end, tau_fix)?;
        let df = discount(curves, coupon.funding_curve(), coupon.payment_time())?;
        let accrual = coupon.notional() * coupon.payment_year_fraction();

        let funding = CurveSensitivities::single(
            coupon.funding_curve(),
            coupon.payment_time(),
            accrual * (f + coupon.spread()),
        );
        let projection =
            forward_sensitivities(curves, coupon.forward_curve(), start, end, tau_fix, accrual * df)?;
        Ok(funding.plus(projection))
    }

    fn visit_cms_coupon(
        &self,
        coupon: &CouponCms,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        let swap_rate = ParRateCalculator::new().visit_fixed_float_swap(coupon.underlying(), curves)?;
        let df = discount(curves, coupon.funding_curve(), coupon.payment_time())?;
        let accrual = coupon.notional() * coupon.payment_year_fraction();

        let funding =
            CurveSensitivities::single(coupon.funding_curve(), coupon.payment_time(), accrual * swap_rate);
        let rate = ParRateSensitivityCalculator::new()
            .visit_fixed_float_swap(coupon.underlying(), curves)?
            .scaled(accrual * df);
        Ok(funding.plus(rate))
    }

    fn visit_continuously_averaged_payment(
        &self,
        payment: &ContinuouslyAveragedPayment,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        let (start, end, tau_rate) = (
            payment.start_time(),
            payment.end_time(),
            payment.rate_year_fraction(),
        );
        let r = averaged_rate(curves, payment.index_curve(), start, end, tau_rate)?;
        let df = discount(curves, payment.funding_curve(), payment.payment_time())?;
        let accrual = payment.notional() * payment.payment_year_fraction();

        let funding = CurveSensitivities::single(
            payment.funding_curve(),
            payment.payment_time(),
            accrual * (r + payment.spread()),
        );
        let index = averaged_rate_sensitivities(
            curves,
            payment.index_curve(),
            start,
            end,
            tau_rate,
            accrual * df,
        )?;
        Ok(funding.plus(index))
    }
}
