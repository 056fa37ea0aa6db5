//! Par rate calculator.
//!
//! The par rate of an instrument is the quote that makes it worth zero: the
//! deposit rate of a cash deposit, the forward of an FRA or future, the
//! fixed rate of a swap, the spread of a tenor swap or FRN, the coupon of a
//! bond.

use log::debug;
use multicurve_curves::CurveBundle;
use multicurve_instruments::prelude::*;

use crate::error::{PricingError, PricingResult};
use crate::present_value::PresentValueCalculator;
use crate::rates::{averaged_rate, forward};

/// Step used to read the instantaneous rate of a zero-length deposit.
pub const DEFAULT_EPSILON: f64 = 1e-8;

const NAME: &str = "ParRateCalculator";

/// Par rate of an instrument against a curve bundle.
///
/// Annuities, generic swaps, fixed payments, fixed coupons and CMS coupons
/// have no par rate and return [`PricingError::UnsupportedInstrument`].
///
/// # Example
///
/// ```rust
/// use multicurve_curves::prelude::*;
/// use multicurve_instruments::prelude::*;
/// use multicurve_pricing::ParRateCalculator;
///
/// let curves = CurveBundle::new().with_curve("OIS", InterpolatedCurve::flat(0.02).unwrap());
/// let cash = Cash::new(1.0, 0.0, 0.5, 0.5, 0.0, "OIS").unwrap();
///
/// let rate = ParRateCalculator::new().calculate(&cash, &curves).unwrap();
/// assert!((rate - ((0.01_f64).exp() - 1.0) / 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ParRateCalculator {
    epsilon: f64,
}

impl Default for ParRateCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl ParRateCalculator {
    /// Creates the calculator with the default epsilon.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }

    /// Sets the step used for zero-length deposits.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Returns the zero-length deposit step.
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Computes the par rate of `instrument`.
    pub fn calculate<I>(&self, instrument: &I, curves: &CurveBundle) -> PricingResult<f64>
    where
        I: Visitable + ?Sized,
    {
        instrument.accept(self, curves)
    }

    /// `PV(receive) / PV(unit fixed leg)` for swaps paying a fixed leg.
    fn fixed_leg_par_rate<R: Visitable>(
        swap: &Swap<CouponFixed, R>,
        kind: InstrumentKind,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        let pv = PresentValueCalculator::new();
        let annuity = pv.annuity(&swap.pay_leg().with_unit_coupons(), curves)?;
        if annuity == 0.0 {
            debug!("{kind}: fixed leg annuity vanished");
            return Err(PricingError::degenerate(kind, "fixed leg annuity is zero"));
        }
        Ok(pv.annuity(swap.receive_leg(), curves)? / annuity)
    }

    /// `(PV(pay) - PV(receive, zero spread)) / PV(receive unit coupons)`.
    fn receive_spread<P: Visitable>(
        pay: &Annuity<P>,
        receive: &IborAnnuity,
        kind: InstrumentKind,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        let pv = PresentValueCalculator::new();
        let unit = pv.annuity(&receive.with_unit_coupons(), curves)?;
        if unit == 0.0 {
            debug!("{kind}: receive leg has no spread sensitivity");
            return Err(PricingError::degenerate(
                kind,
                "receive leg has zero spread sensitivity",
            ));
        }
        let pay_value = pv.annuity(pay, curves)?;
        let receive_value = pv.annuity(&receive.with_zero_spread(), curves)?;
        Ok((pay_value - receive_value) / unit)
    }

    fn unsupported(kind: InstrumentKind) -> PricingError {
        PricingError::unsupported(NAME, kind)
    }
}

impl InstrumentVisitor<CurveBundle> for ParRateCalculator {
    type Output = f64;
    type Error = PricingError;

    fn visit_cash(&self, cash: &Cash, curves: &CurveBundle) -> PricingResult<f64> {
        let curve = curves.get_curve(cash.curve())?;
        let ta = cash.trade_time();

        if cash.is_instantaneous() {
            let eps = self.epsilon;
            let r = curve.zero_rate(ta)?;
            let r_eps = curve.zero_rate(ta + eps)?;
            return Ok(r + ta * (r_eps - r) / eps);
        }

        let pa = curve.discount_factor(ta)?;
        let pb = curve.discount_factor(cash.maturity())?;
        Ok((pa / pb - 1.0) / cash.year_fraction())
    }

    fn visit_forward_rate_agreement(
        &self,
        fra: &ForwardRateAgreement,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        forward(
            curves,
            fra.forward_curve(),
            fra.fixing_period_start(),
            fra.fixing_period_end(),
            fra.fixing_year_fraction(),
        )
    }

    fn visit_interest_rate_future(
        &self,
        future: &InterestRateFuture,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        forward(
            curves,
            future.curve(),
            future.fixing_period_start(),
            future.fixing_period_end(),
            future.fixing_year_fraction(),
        )
    }

    fn visit_bond(&self, bond: &Bond, curves: &CurveBundle) -> PricingResult<f64> {
        let pv = PresentValueCalculator::new();
        let unit = pv.annuity(&bond.coupons().with_unit_coupons(), curves)?;
        if unit == 0.0 {
            debug!("bond coupon annuity vanished");
            return Err(PricingError::degenerate(
                InstrumentKind::Bond,
                "coupon annuity is zero",
            ));
        }
        let principal = bond.principal().accept(&pv, curves)?;
        Ok((1.0 - principal) / unit)
    }

    fn visit_generic_annuity(&self, a: &GenericAnnuity, _: &CurveBundle) -> PricingResult<f64> {
        Err(Self::unsupported(a.kind()))
    }

    fn visit_fixed_coupon_annuity(
        &self,
        a: &FixedCouponAnnuity,
        _: &CurveBundle,
    ) -> PricingResult<f64> {
        Err(Self::unsupported(a.kind()))
    }

    fn visit_ibor_annuity(&self, a: &IborAnnuity, _: &CurveBundle) -> PricingResult<f64> {
        Err(Self::unsupported(a.kind()))
    }

    fn visit_generic_swap(&self, s: &GenericSwap, _: &CurveBundle) -> PricingResult<f64> {
        Err(Self::unsupported(s.kind()))
    }

    fn visit_fixed_coupon_swap(
        &self,
        swap: &FixedCouponSwap,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        Self::fixed_leg_par_rate(swap, swap.kind(), curves)
    }

    fn visit_fixed_float_swap(
        &self,
        swap: &FixedFloatSwap,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        Self::fixed_leg_par_rate(swap, swap.kind(), curves)
    }

    fn visit_tenor_swap(&self, swap: &TenorSwap, curves: &CurveBundle) -> PricingResult<f64> {
        Self::receive_spread(
            &swap.pay_leg().with_zero_spread(),
            swap.receive_leg(),
            swap.kind(),
            curves,
        )
    }

    fn visit_floating_rate_note(
        &self,
        frn: &FloatingRateNote,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        Self::receive_spread(frn.pay_leg(), frn.receive_leg(), frn.kind(), curves)
    }

    fn visit_fixed_payment(&self, p: &PaymentFixed, _: &CurveBundle) -> PricingResult<f64> {
        Err(Self::unsupported(p.kind()))
    }

    fn visit_fixed_coupon(&self, c: &CouponFixed, _: &CurveBundle) -> PricingResult<f64> {
        Err(Self::unsupported(c.kind()))
    }

    fn visit_ibor_coupon(&self, coupon: &CouponIbor, curves: &CurveBundle) -> PricingResult<f64> {
        forward(
            curves,
            coupon.forward_curve(),
            coupon.fixing_period_start(),
            coupon.fixing_period_end(),
            coupon.fixing_year_fraction(),
        )
    }

    fn visit_cms_coupon(&self, c: &CouponCms, _: &CurveBundle) -> PricingResult<f64> {
        Err(Self::unsupported(c.kind()))
    }

    fn visit_continuously_averaged_payment(
        &self,
        payment: &ContinuouslyAveragedPayment,
        curves: &CurveBundle,
    ) -> PricingResult<f64> {
        averaged_rate(
            curves,
            payment.index_curve(),
            payment.start_time(),
            payment.end_time(),
            payment.rate_year_fraction(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensitivity::test_support::{bundle, instruments, with_curve_rates};
    use approx::assert_relative_eq;
    use multicurve_curves::InterpolatedCurve;
    use proptest::prelude::*;

    #[test]
    fn test_cash_par_rate() {
        let curves = bundle();
        let ois = curves.get_curve("OIS").unwrap();
        let cash = Cash::new(1.0, 0.25, 0.75, 0.5, 0.0, "OIS").unwrap();

        let expected =
            (ois.discount_factor(0.25).unwrap() / ois.discount_factor(0.75).unwrap() - 1.0) / 0.5;
        assert_relative_eq!(
            ParRateCalculator::new().calculate(&cash, &curves).unwrap(),
            expected,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_cash_ignores_other_curves() {
        let curves = bundle();
        let cash = Cash::new(1.0, 0.0, 0.5, 0.5, 0.0, "OIS").unwrap();
        let calc = ParRateCalculator::new();

        let before = calc.calculate(&cash, &curves).unwrap();
        let moved = curves.with_curve("LIBOR-6M", InterpolatedCurve::flat(0.09).unwrap());
        assert_eq!(calc.calculate(&cash, &moved).unwrap(), before);
    }

    #[test]
    fn test_zero_length_deposit_reads_instantaneous_rate() {
        let curves =
            CurveBundle::new().with_curve("OIS", InterpolatedCurve::flat(0.03).unwrap());
        let cash = Cash::new(1.0, 0.5, 0.5, 0.0, 0.0, "OIS").unwrap();

        // flat curve: instantaneous forward equals the zero rate
        assert_relative_eq!(
            ParRateCalculator::new().calculate(&cash, &curves).unwrap(),
            0.03,
            epsilon = 1e-9
        );

        let at_origin = Cash::new(1.0, 0.0, 0.0, 0.0, 0.0, "OIS").unwrap();
        assert_relative_eq!(
            ParRateCalculator::new().calculate(&at_origin, &curves).unwrap(),
            0.03,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_swap_at_par_rate_is_worthless() {
        let curves = bundle();
        let swap = FixedFloatSwap::from_schedules(
            0.0,
            &[1.0, 2.0, 3.0],
            &[1.0; 3],
            &[0.5, 1.0, 1.5, 2.0, 2.5, 3.0],
            &[0.5; 6],
            1e6,
            0.0,
            "OIS",
            "LIBOR-6M",
        )
        .unwrap();

        let par = ParRateCalculator::new().calculate(&swap, &curves).unwrap();
        let at_par = FixedFloatSwap::new(swap.pay_leg().with_rate(par), swap.receive_leg().clone());
        let pv = PresentValueCalculator::new().calculate(&at_par, &curves).unwrap();
        assert!(pv.abs() < 1e-6, "pv = {pv}");
    }

    #[test]
    fn test_fixed_coupons_ignored() {
        let curves = bundle();
        let make = |rate| {
            FixedFloatSwap::from_schedules(
                0.0,
                &[1.0, 2.0],
                &[1.0; 2],
                &[1.0, 2.0],
                &[1.0; 2],
                1.0,
                rate,
                "OIS",
                "LIBOR-6M",
            )
            .unwrap()
        };
        let calc = ParRateCalculator::new();
        assert_eq!(
            calc.calculate(&make(0.01), &curves).unwrap(),
            calc.calculate(&make(0.07), &curves).unwrap()
        );
    }

    #[test]
    fn test_frn_at_par_spread_is_worthless() {
        let curves = bundle();
        let coupons = IborAnnuity::from_schedule(
            0.5,
            &[1.0, 1.5, 2.0],
            &[0.5; 3],
            100.0,
            0.0,
            "OIS",
            "LIBOR-6M",
        )
        .unwrap();
        let frn = FloatingRateNote::floating_rate_note(0.5, coupons).unwrap();

        let spread = ParRateCalculator::new().calculate(&frn, &curves).unwrap();
        let at_par = FloatingRateNote::new(
            frn.pay_leg().clone(),
            frn.receive_leg().with_spread(spread),
        );
        let pv = PresentValueCalculator::new().calculate(&at_par, &curves).unwrap();
        assert!(pv.abs() < 1e-10, "pv = {pv}");
    }

    #[test]
    fn test_tenor_swap_spread_is_worthless() {
        let curves = bundle();
        let pay = IborAnnuity::from_schedule(0.0, &[1.0, 2.0], &[1.0; 2], 1.0, 0.0, "OIS", "OIS")
            .unwrap();
        let receive = IborAnnuity::from_schedule(
            0.0,
            &[0.5, 1.0, 1.5, 2.0],
            &[0.5; 4],
            1.0,
            0.0,
            "OIS",
            "LIBOR-6M",
        )
        .unwrap();
        let swap = TenorSwap::new(pay, receive);

        let spread = ParRateCalculator::new().calculate(&swap, &curves).unwrap();
        let at_par = TenorSwap::new(
            swap.pay_leg().clone(),
            swap.receive_leg().with_spread(spread),
        );
        let pv = PresentValueCalculator::new().calculate(&at_par, &curves).unwrap();
        assert!(pv.abs() < 1e-12, "pv = {pv}");
    }

    #[test]
    fn test_bond_par_coupon() {
        let curves = bundle();
        let bond = Bond::from_schedule(&[1.0, 2.0, 3.0], &[1.0; 3], 0.0, "OIS").unwrap();
        let coupon = ParRateCalculator::new().calculate(&bond, &curves).unwrap();

        let at_par = Bond::from_schedule(&[1.0, 2.0, 3.0], &[1.0; 3], coupon, "OIS").unwrap();
        let price = PresentValueCalculator::new().calculate(&at_par, &curves).unwrap();
        assert_relative_eq!(price, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_spread() {
        let curves = bundle();
        let coupons =
            IborAnnuity::from_schedule(0.5, &[1.0], &[0.5], 0.0, 0.0, "OIS", "LIBOR-6M").unwrap();
        let frn = FloatingRateNote::floating_rate_note(0.5, coupons).unwrap();

        assert!(matches!(
            ParRateCalculator::new().calculate(&frn, &curves),
            Err(PricingError::DegenerateSpread { .. })
        ));
    }

    #[test]
    fn test_unsupported_instruments() {
        let curves = bundle();
        let calc = ParRateCalculator::new();
        let supported = [
            InstrumentKind::Cash,
            InstrumentKind::ForwardRateAgreement,
            InstrumentKind::InterestRateFuture,
            InstrumentKind::Bond,
            InstrumentKind::FixedCouponSwap,
            InstrumentKind::FixedFloatSwap,
            InstrumentKind::TenorSwap,
            InstrumentKind::FloatingRateNote,
            InstrumentKind::IborCoupon,
            InstrumentKind::ContinuouslyAveragedPayment,
        ];

        for (name, instrument) in instruments() {
            let result = calc.calculate(&instrument, &curves);
            if supported.contains(&instrument.kind()) {
                assert!(result.is_ok(), "{name}: {result:?}");
            } else {
                assert_eq!(
                    result,
                    Err(PricingError::unsupported(NAME, instrument.kind())),
                    "{name}"
                );
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let curves = bundle();
        let calc = ParRateCalculator::new();
        for (_, instrument) in instruments() {
            let first = calc.calculate(&instrument, &curves);
            let second = calc.calculate(&instrument, &curves);
            match (first, second) {
                (Ok(a), Ok(b)) => assert_eq!(a.to_bits(), b.to_bits()),
                (a, b) => assert_eq!(a, b),
            }
        }
    }

    proptest! {
        #[test]
        fn prop_cash_par_rate_formula(
            rates in proptest::collection::vec(-0.01f64..0.08, 4),
            ta in 0.0f64..2.0,
            length in 0.05f64..3.0,
        ) {
            let curves = with_curve_rates("OIS", &rates);
            let tb = ta + length;
            let cash = Cash::new(1.0, ta, tb, length, 0.0, "OIS").unwrap();
            let ois = curves.get_curve("OIS").unwrap();
            let expected = (ois.discount_factor(ta).unwrap() / ois.discount_factor(tb).unwrap() - 1.0)
                / length;

            let rate = ParRateCalculator::new().calculate(&cash, &curves).unwrap();
            prop_assert!((rate - expected).abs() <= 1e-14 * expected.abs().max(1.0));
        }

        #[test]
        fn prop_swap_par_rate_round_trip(
            rates in proptest::collection::vec(0.0f64..0.08, 4),
            years in 1usize..8,
        ) {
            let curves = with_curve_rates("LIBOR-6M", &rates);
            let fixed_times: Vec<f64> = (1..=years).map(|i| i as f64).collect();
            let float_times: Vec<f64> = (1..=2 * years).map(|i| i as f64 * 0.5).collect();
            let swap = FixedFloatSwap::from_schedules(
                0.0,
                &fixed_times,
                &vec![1.0; years],
                &float_times,
                &vec![0.5; 2 * years],
                1.0,
                0.0,
                "OIS",
                "LIBOR-6M",
            )
            .unwrap();

            let par = ParRateCalculator::new().calculate(&swap, &curves).unwrap();
            let at_par = FixedFloatSwap::new(swap.pay_leg().with_rate(par), swap.receive_leg().clone());
            let again = ParRateCalculator::new().calculate(&at_par, &curves).unwrap();
            prop_assert!((again - par).abs() <= 1e-10 * par.abs().max(1e-12));

            let pv = PresentValueCalculator::new().calculate(&at_par, &curves).unwrap();
            prop_assert!(pv.abs() < 1e-12);
        }
    }
}
