//! Present value calculator.

use multicurve_curves::CurveBundle;
use multicurve_instruments::prelude::*;

use crate::error::{PricingError, PricingResult};
use crate::par_rate::ParRateCalculator;
use crate::rates::{averaged_rate, discount, forward};

/// Present value of any instrument against a curve bundle.
///
/// | Instrument | Present value |
/// |------------|---------------|
/// | fixed payment | `A · P_f(t)` |
/// | fixed coupon | `N · τ · K · P_f(t)` |
/// | Ibor coupon | `N · τ · (F + s) · P_f(t)` |
/// | CMS coupon | `N · τ · S · P_f(t)`, `S` the underlying par rate |
/// | averaged payment | `N · τ · (R + s) · P_f(t)` |
/// | cash | `N · (1 + r · yf) · P(maturity) - N · P(trade)` |
/// | FRA | `N · τ · (F - K) / (1 + τ · F) · P_f(settle)` |
/// | future | `N · α · (1 - F - reference price)` |
/// | annuity, bond | sum of payments |
/// | swap | `PV(receive) - PV(pay)` |
///
/// # Example
///
/// ```rust
/// use multicurve_curves::prelude::*;
/// use multicurve_instruments::prelude::*;
/// use multicurve_pricing::PresentValueCalculator;
///
/// let curves = CurveBundle::new().with_curve("OIS", InterpolatedCurve::flat(0.02).unwrap());
/// let cash = Cash::new(1.0, 0.0, 1.0, 1.0, 0.02, "OIS").unwrap();
///
/// let pv = PresentValueCalculator::new().calculate(&cash, &curves).unwrap();
/// assert!(pv.abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PresentValueCalculator;

impl PresentValueCalculator {
    /// Creates the calculator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Computes the present value of `instrument`.
    pub fn calculate<I>(&self, instrument: &I, curves: &CurveBundle) -> PricingResult<f64>
    where
        I: Visitable + ?Sized,
    {
        instrument.accept(self, curves)
    }

    pub(crate) fn annuity<P: Visitable>(
        &self,
        annuity: &Annuity<P>,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        annuity.iter().map(|p| p.accept(self, curves)).sum()
    }

    fn swap<P: Visitable, R: Visitable>(
        &self,
        swap: &Swap<P, R>,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        Ok(self.annuity(swap.receive_leg(), curves)? - self.annuity(swap.pay_leg(), curves)?)
    }
}

impl InstrumentVisitor<CurveBundle> for PresentValueCalculator {
    type Output = f64;
    type Error = PricingError;

    fn visit_cash(&self, cash: &Cash, curves: &CurveBundle) -> PricingResult<f64> {
        let pa = discount(curves, cash.curve(), cash.trade_time())?;
        let pb = discount(curves, cash.curve(), cash.maturity())?;
        let n = cash.notional();
        Ok(n * (1.0 + cash.rate() * cash.year_fraction()) * pb - n * pa)
    }

    fn visit_forward_rate_agreement(
        &self,
        fra: &ForwardRateAgreement,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        let f = forward(
            curves,
            fra.forward_curve(),
            fra.fixing_period_start(),
            fra.fixing_period_end(),
            fra.fixing_year_fraction(),
        )?;
        let df = discount(curves, fra.funding_curve(), fra.settlement_time())?;
        let tau = fra.payment_year_fraction();
        Ok(fra.notional() * tau * (f - fra.rate()) / (1.0 + tau * f) * df)
    }

    fn visit_interest_rate_future(
        &self,
        future: &InterestRateFuture,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        let f = forward(
            curves,
            future.curve(),
            future.fixing_period_start(),
            future.fixing_period_end(),
            future.fixing_year_fraction(),
        )?;
        Ok(future.notional()
            * future.payment_accrual_factor()
            * (1.0 - f - future.reference_price()))
    }

    fn visit_bond(&self, bond: &Bond, curves: &CurveBundle) -> PricingResult<f64> {
        Ok(self.annuity(bond.coupons(), curves)? + bond.principal().accept(self, curves)?)
    }

    fn visit_generic_annuity(
        &self,
        annuity: &GenericAnnuity,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        self.annuity(annuity, curves)
    }

    fn visit_fixed_coupon_annuity(
        &self,
        annuity: &FixedCouponAnnuity,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        self.annuity(annuity, curves)
    }

    fn visit_ibor_annuity(&self, annuity: &IborAnnuity, curves: &CurveBundle) -> PricingResult<f64> {
        self.annuity(annuity, curves)
    }

    fn visit_generic_swap(&self, swap: &GenericSwap, curves: &CurveBundle) -> PricingResult<f64> {
        self.swap(swap, curves)
    }

    fn visit_fixed_coupon_swap(
        &self,
        swap: &FixedCouponSwap,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        self.swap(swap, curves)
    }

    fn visit_fixed_float_swap(
        &self,
        swap: &FixedFloatSwap,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        self.swap(swap, curves)
    }

    fn visit_tenor_swap(&self, swap: &TenorSwap, curves: &CurveBundle) -> PricingResult<f64> {
        self.swap(swap, curves)
    }

    fn visit_floating_rate_note(
        &self,
        frn: &FloatingRateNote,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        self.swap(frn, curves)
    }

    fn visit_fixed_payment(
        &self,
        payment: &PaymentFixed,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        Ok(payment.amount() * discount(curves, payment.funding_curve(), payment.payment_time())?)
    }

    fn visit_fixed_coupon(&self, coupon: &CouponFixed, curves: &CurveBundle) -> PricingResult<f64> {
        Ok(coupon.amount() * discount(curves, coupon.funding_curve(), coupon.payment_time())?)
    }

    fn visit_ibor_coupon(&self, coupon: &CouponIbor, curves: &CurveBundle) -> PricingResult<f64> {
        let f = forward(
            curves,
            coupon.forward_curve(),
            coupon.fixing_period_start(),
            coupon.fixing_period_end(),
            coupon.fixing_year_fraction(),
        )?;
        let df = discount(curves, coupon.funding_curve(), coupon.payment_time())?;
        Ok(coupon.notional() * coupon.payment_year_fraction() * (f + coupon.spread()) * df)
    }

    fn visit_cms_coupon(&self, coupon: &CouponCms, curves: &CurveBundle) -> PricingResult<f64> {
        let swap_rate = ParRateCalculator::new().visit_fixed_float_swap(coupon.underlying(), curves)?;
        let df = discount(curves, coupon.funding_curve(), coupon.payment_time())?;
        Ok(coupon.notional() * coupon.payment_year_fraction() * swap_rate * df)
    }

    fn visit_continuously_averaged_payment(
        &self,
        payment: &ContinuouslyAveragedPayment,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        let r = averaged_rate(
            curves,
            payment.index_curve(),
            payment.start_time(),
            payment.end_time(),
            payment.rate_year_fraction(),
        )?;
        let df = discount(curves, payment.funding_curve(), payment.payment_time())?;
        Ok(payment.notional() * payment.payment_year_fraction() * (r + payment.spread()) * df)
    }
}
