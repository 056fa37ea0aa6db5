//! Par rate sensitivities to discount factors.

use multicurve_curves::CurveBundle;
use multicurve_instruments::prelude::*;

use crate::error::{PricingError, PricingResult};
use crate::par_rate::DEFAULT_EPSILON;
use crate::rates::{averaged_rate_sensitivities, forward_sensitivities};
use crate::sensitivity::{CurveSensitivities, PresentValueSensitivityCalculator};
use crate::{ParRateCalculator, PresentValueCalculator};

const NAME: &str = "ParRateSensitivityCalculator";

/// `∂(par rate)/∂P(curve, t)` for every discount factor an instrument reads.
///
/// Supports the same instruments as [`ParRateCalculator`]. A quotient
/// `Q = U / A` differentiates as `dQ = (dU - Q · dA) / A`, with `dU` and
/// `dA` from the [`PresentValueSensitivityCalculator`].
#[derive(Debug, Clone, Copy)]
pub struct ParRateSensitivityCalculator {
    epsilon: f64,
}

impl Default for ParRateSensitivityCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl ParRateSensitivityCalculator {
    /// Creates the calculator with the default epsilon.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Sets the step used for zero-length deposits; must match the
    /// [`ParRateCalculator`] being differentiated.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Computes the sensitivities of `instrument`.
    pub fn calculate<I>(&self, instrument: &I, curves: &CurveBundle) -> PricingResult<CurveSensitivities>
    where
        I: Visitable + ?Sized,
    {
        instrument.accept(self, curves)
    }

    fn par_rate(&self) -> ParRateCalculator {
        ParRateCalculator::new().with_epsilon(self.epsilon)
    }

    /// `d(U/A) = (dU - Q dA) / A`.
    fn quotient(
        quote: f64,
        numerator: CurveSensitivities,
        denominator: CurveSensitivities,
        denominator_value: f64,
    ) -> CurveSensitivities {
        numerator
            .plus(denominator.scaled(-quote))
            .scaled(1.0 / denominator_value)
    }

    fn fixed_leg<R: Visitable>(
        swap: &Swap<CouponFixed, R>,
        quote: f64,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        let pv = PresentValueCalculator::new();
        let sens = PresentValueSensitivityCalculator::new();
        let unit = swap.pay_leg().with_unit_coupons();

        let annuity = pv.annuity(&unit, curves)?;
        let d_receive = sens.annuity(swap.receive_leg(), curves)?;
        let d_annuity = sens.annuity(&unit, curves)?;
        Ok(Self::quotient(quote, d_receive, d_annuity, annuity))
    }

    fn receive_spread<P: Visitable>(
        pay: &Annuity<P>,
        receive: &IborAnnuity,
        quote: f64,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        let pv = PresentValueCalculator::new();
        let sens = PresentValueSensitivityCalculator::new();
        let unit = receive.with_unit_coupons();

        let unit_value = pv.annuity(&unit, curves)?;
        let d_pay = sens.annuity(pay, curves)?;
        let d_receive = sens.annuity(&receive.with_zero_spread(), curves)?;
        let d_unit = sens.annuity(&unit, curves)?;
        Ok(Self::quotient(
            quote,
            d_pay.plus(d_receive.scaled(-1.0)),
            d_unit,
            unit_value,
        ))
    }

    fn unsupported(kind: InstrumentKind) -> PricingError {
        PricingError::unsupported(NAME, kind)
    }
}

impl InstrumentVisitor<CurveBundle> for ParRateSensitivityCalculator {
    type Output = CurveSensitivities;
    type Error = PricingError;

    fn visit_cash(&self, cash: &Cash, curves: &CurveBundle) -> PricingResult<CurveSensitivities> {
        let curve = curves.get_curve(cash.curve())?;
        let name = cash.curve();
        let ta = cash.trade_time();

        if cash.is_instantaneous() {
            if ta == 0.0 {
                return Err(PricingError::invalid_instrument(
                    "zero-length deposit at time 0 has no discount factor dependence",
                ));
            }
            let eps = self.epsilon;
            let tb = ta + eps;
            let pa = curve.discount_factor(ta)?;
            let pb = curve.discount_factor(tb)?;

            let mut sens = CurveSensitivities::single(name, ta, (1.0 / eps - 1.0 / ta) / pa);
            sens.add(name, tb, -ta / (tb * eps * pb));
            return Ok(sens);
        }

        let tb = cash.maturity();
        let yf = cash.year_fraction();
        let pa = curve.discount_factor(ta)?;
        let pb = curve.discount_factor(tb)?;

        let mut sens = CurveSensitivities::single(name, ta, 1.0 / (pb * yf));
        sens.add(name, tb, -pa / (pb * pb * yf));
        Ok(sens)
    }

    fn visit_forward_rate_agreement(
        &self,
        fra: &ForwardRateAgreement,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        forward_sensitivities(
            curves,
            fra.forward_curve(),
            fra.fixing_period_start(),
            fra.fixing_period_end(),
            fra.fixing_year_fraction(),
            1.0,
        )
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
            1.0,
        )
    }

    fn visit_bond(&self, bond: &Bond, curves: &CurveBundle) -> PricingResult<CurveSensitivities> {
        let quote = self.par_rate().visit_bond(bond, curves)?;
        let pv = PresentValueCalculator::new();
        let sens = PresentValueSensitivityCalculator::new();
        let unit = bond.coupons().with_unit_coupons();

        let unit_value = pv.annuity(&unit, curves)?;
        let d_principal = bond.principal().accept(&sens, curves)?;
        let d_unit = sens.annuity(&unit, curves)?;
        Ok(Self::quotient(
            quote,
            d_principal.scaled(-1.0),
            d_unit,
            unit_value,
        ))
    }

    fn visit_generic_annuity(
        &self,
        a: &GenericAnnuity,
        _: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        Err(Self::unsupported(a.kind()))
    }

    fn visit_fixed_coupon_annuity(
        &self,
        a: &FixedCouponAnnuity,
        _: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        Err(Self::unsupported(a.kind()))
    }

    fn visit_ibor_annuity(
        &self,
        a: &IborAnnuity,
        _: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        Err(Self::unsupported(a.kind()))
    }

    fn visit_generic_swap(
        &self,
        s: &GenericSwap,
        _: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        Err(Self::unsupported(s.kind()))
    }

    fn visit_fixed_coupon_swap(
        &self,
        swap: &FixedCouponSwap,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        let quote = self.par_rate().visit_fixed_coupon_swap(swap, curves)?;
        Self::fixed_leg(swap, quote, curves)
    }

    fn visit_fixed_float_swap(
        &self,
        swap: &FixedFloatSwap,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        let quote = self.par_rate().visit_fixed_float_swap(swap, curves)?;
        Self::fixed_leg(swap, quote, curves)
    }

    fn visit_tenor_swap(
        &self,
        swap: &TenorSwap,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        let quote = self.par_rate().visit_tenor_swap(swap, curves)?;
        Self::receive_spread(
            &swap.pay_leg().with_zero_spread(),
            swap.receive_leg(),
            quote,
            curves,
        )
    }

    fn visit_floating_rate_note(
        &self,
        frn: &FloatingRateNote,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        let quote = self.par_rate().visit_floating_rate_note(frn, curves)?;
        Self::receive_spread(frn.pay_leg(), frn.receive_leg(), quote, curves)
    }

    fn visit_fixed_payment(
        &self,
        p: &PaymentFixed,
        _: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        Err(Self::unsupported(p.kind()))
    }

    fn visit_fixed_coupon(
        &self,
        c: &CouponFixed,
        _: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        Err(Self::unsupported(c.kind()))
    }

    fn visit_ibor_coupon(
        &self,
        coupon: &CouponIbor,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        forward_sensitivities(
            curves,
            coupon.forward_curve(),
            coupon.fixing_period_start(),
            coupon.fixing_period_end(),
            coupon.fixing_year_fraction(),
            1.0,
        )
    }

    fn visit_cms_coupon(&self, c: &CouponCms, _: &CurveBundle) -> PricingResult<CurveSensitivities> {
        Err(Self::unsupported(c.kind()))
    }

    fn visit_continuously_averaged_payment(
        &self,
        payment: &ContinuouslyAveragedPayment,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        averaged_rate_sensitivities(
            curves,
            payment.index_curve(),
            payment.start_time(),
            payment.end_time(),
            payment.rate_year_fraction(),
            1.0,
        )
    }
}
