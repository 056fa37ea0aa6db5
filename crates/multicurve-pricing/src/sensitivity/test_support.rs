//! Shared fixtures for calculator tests.

use multicurve_curves::prelude::*;
use multicurve_instruments::prelude::*;

use crate::error::PricingResult;
use crate::sensitivity::CurveSensitivities;

const BUMP: f64 = 1e-5;

fn interpolator(name: &str) -> CurveInterpolator {
    match name {
        "OIS" => CurveInterpolator::new(
            InterpolationMethod::LogLinear,
            ExtrapolationMethod::FlatForward,
        ),
        "LIBOR-6M" => CurveInterpolator::new(
            InterpolationMethod::NaturalCubic,
            ExtrapolationMethod::Linear,
        ),
        _ => CurveInterpolator::default(),
    }
}

fn curve(name: &str, times: &[f64], rates: &[f64]) -> InterpolatedCurve {
    InterpolatedCurve::new(times.to_vec(), rates.to_vec(), interpolator(name)).unwrap()
}

/// Upward sloping OIS and LIBOR-6M curves with different interpolators.
pub(crate) fn bundle() -> CurveBundle {
    let times = [0.5, 1.0, 2.0, 5.0, 10.0];
    CurveBundle::new()
        .with_curve("OIS", curve("OIS", &times, &[0.020, 0.022, 0.025, 0.028, 0.030]))
        .with_curve(
            "LIBOR-6M",
            curve("LIBOR-6M", &times, &[0.024, 0.026, 0.029, 0.032, 0.033]),
        )
}

/// [`bundle`] with `name` replaced by a four-node curve on `rates`.
pub(crate) fn with_curve_rates(name: &str, rates: &[f64]) -> CurveBundle {
    bundle().with_curve(name, curve(name, &[0.5, 1.0, 2.0, 5.0], rates))
}

/// One instance of every instrument and payment type, unit notionals.
pub(crate) fn instruments() -> Vec<(&'static str, Instrument)> {
    let fixed_leg = FixedCouponAnnuity::from_schedule(&[1.0, 2.0], &[1.0; 2], 1.0, 0.03, "OIS")
        .unwrap();
    let ibor_leg =
        IborAnnuity::from_schedule(0.0, &[0.5, 1.0], &[0.5; 2], 1.0, 0.001, "OIS", "LIBOR-6M")
            .unwrap();
    let swap = FixedFloatSwap::from_schedules(
        0.0,
        &[1.0, 2.0, 3.0],
        &[1.0; 3],
        &[0.5, 1.0, 1.5, 2.0, 2.5, 3.0],
        &[0.5; 6],
        1.0,
        0.027,
        "OIS",
        "LIBOR-6M",
    )
    .unwrap();
    let forward_swap = FixedFloatSwap::from_schedules(
        1.0,
        &[2.0, 3.0],
        &[1.0; 2],
        &[1.5, 2.0, 2.5, 3.0],
        &[0.5; 4],
        1.0,
        0.03,
        "OIS",
        "LIBOR-6M",
    )
    .unwrap();
    let ois_leg =
        IborAnnuity::from_schedule(0.0, &[1.0, 2.0], &[1.0; 2], 1.0, 0.002, "OIS", "OIS").unwrap();
    let frn_coupons = IborAnnuity::from_schedule(
        0.5,
        &[1.0, 1.5, 2.0],
        &[0.5; 3],
        1.0,
        0.004,
        "OIS",
        "LIBOR-6M",
    )
    .unwrap();

    let ibor_coupon =
        CouponIbor::new(1.0, "OIS", 0.5, 1.0, 0.5, 0.5, 1.0, 0.5, 0.001, "LIBOR-6M").unwrap();
    let generic = GenericAnnuity::new(vec![
        PaymentFixed::new(0.75, 0.5, "OIS").unwrap().into(),
        ibor_coupon.clone().into(),
    ])
    .unwrap();

    vec![
        (
            "cash",
            Cash::new(1.0, 0.0, 0.5, 0.5, 0.02, "OIS").unwrap().into(),
        ),
        (
            "forward cash",
            Cash::new(1.0, 0.25, 1.25, 1.0, 0.02, "OIS").unwrap().into(),
        ),
        (
            "instantaneous cash",
            Cash::new(1.0, 0.75, 0.75, 0.0, 0.0, "OIS").unwrap().into(),
        ),
        (
            "fra",
            ForwardRateAgreement::standard(0.5, 1.0, 0.5, 1.0, 0.03, "OIS", "LIBOR-6M")
                .unwrap()
                .into(),
        ),
        (
            "future",
            InterestRateFuture::new(1.0, 1.0, 1.5, 0.5, 0.25, 0.97, 1.0, "LIBOR-6M")
                .unwrap()
                .into(),
        ),
        (
            "bond",
            Bond::from_schedule(&[1.0, 2.0, 3.0], &[1.0; 3], 0.04, "OIS")
                .unwrap()
                .into(),
        ),
        ("generic annuity", generic.clone().into()),
        ("fixed annuity", fixed_leg.clone().into()),
        ("ibor annuity", ibor_leg.clone().into()),
        (
            "generic swap",
            GenericSwap::new((&fixed_leg).into(), generic).into(),
        ),
        ("fixed coupon swap", swap.to_fixed_coupon_swap().into()),
        ("fixed float swap", swap.into()),
        (
            "tenor swap",
            TenorSwap::new(ois_leg, ibor_leg).into(),
        ),
        (
            "frn",
            FloatingRateNote::floating_rate_note(0.5, frn_coupons)
                .unwrap()
                .into(),
        ),
        (
            "fixed payment",
            Instrument::Payment(PaymentFixed::new(2.0, 1.0, "OIS").unwrap().into()),
        ),
        (
            "fixed coupon",
            Instrument::Payment(CouponFixed::new(1.5, "OIS", 0.5, 1.0, 0.03).unwrap().into()),
        ),
        ("ibor coupon", Instrument::Payment(ibor_coupon.into())),
        (
            "cms coupon",
            Instrument::Payment(
                CouponCms::new(1.5, "OIS", 0.5, 1.0, 1.0, forward_swap)
                    .unwrap()
                    .into(),
            ),
        ),
        (
            "averaged payment",
            Instrument::Payment(
                ContinuouslyAveragedPayment::new(1.0, "OIS", 0.5, 1.0, "OIS", 0.5, 0.5, 1.0, 0.001)
                    .unwrap()
                    .into(),
            ),
        ),
    ]
}

/// Checks `sensitivities` against central differences of `value` in each
/// node rate of each curve in `curves`.
///
/// The chain rule goes through [`Curve::node_sensitivities`]:
/// `∂Q/∂r_j = Σ ∂Q/∂P(t) · ∂P(t)/∂r_j`.
pub(crate) fn assert_matches_bumps<F>(
    name: &str,
    sensitivities: &CurveSensitivities,
    curves: &CurveBundle,
    tolerance: f64,
    mut value: F,
) where
    F: FnMut(&CurveBundle) -> PricingResult<f64>,
{
    for curve_name in curves.names() {
        let base = curves.get_curve(curve_name).unwrap();
        let times = base.node_times();
        let rates = base.node_values();

        let mut analytic = vec![0.0; rates.len()];
        for &(t, dq_dp) in sensitivities.get(curve_name).unwrap_or(&[]) {
            for (j, dp_dr) in base.node_sensitivities(t).unwrap() {
                analytic[j] += dq_dp * dp_dr;
            }
        }

        for j in 0..rates.len() {
            let bumped = |shift: f64| {
                let mut r = rates.to_vec();
                r[j] += shift;
                curves.clone().with_curve(curve_name, curve(curve_name, times, &r))
            };
            let up = value(&bumped(BUMP)).unwrap();
            let down = value(&bumped(-BUMP)).unwrap();
            let numeric = (up - down) / (2.0 * BUMP);

            assert!(
                (numeric - analytic[j]).abs() <= tolerance * (1.0 + numeric.abs()),
                "{name}: {curve_name} node {j}: analytic {} vs bumped {numeric}",
                analytic[j]
            );
        }
    }
}

