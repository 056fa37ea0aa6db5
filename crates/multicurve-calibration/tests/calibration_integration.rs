//! Integration tests: two-curve calibration (OIS discounting, LIBOR-6M
//! projection).
//!
//! | Curve    | Nodes (years)        | Instruments                     |
//! |----------|----------------------|---------------------------------|
//! | OIS      | 0.5, 1, 2, 3, 5      | 6M deposit, 1Y/2Y/3Y/5Y OIS     |
//! | LIBOR-6M | 0.5, 1, 2, 3, 5      | 0x6 FRA, 1Y/2Y/3Y/5Y swaps      |

use approx::assert_relative_eq;
use proptest::prelude::*;

use multicurve_calibration::prelude::*;
use multicurve_curves::prelude::*;
use multicurve_instruments::prelude::*;
use multicurve_pricing::{ParRateCalculator, PresentValueCalculator};

const TIMES: [f64; 5] = [0.5, 1.0, 2.0, 3.0, 5.0];
const OIS_RATES: [f64; 5] = [0.0150, 0.0165, 0.0190, 0.0210, 0.0240];
const LIBOR_RATES: [f64; 5] = [0.0190, 0.0205, 0.0228, 0.0246, 0.0271];

fn ois_interpolator() -> CurveInterpolator {
    CurveInterpolator::new(InterpolationMethod::LogLinear, ExtrapolationMethod::FlatForward)
}

fn libor_interpolator() -> CurveInterpolator {
    CurveInterpolator::new(InterpolationMethod::NaturalCubic, ExtrapolationMethod::FlatForward)
}

fn true_curves(ois: &[f64], libor: &[f64]) -> CurveBundle {
    CurveBundle::new()
        .with_curve(
            "OIS",
            InterpolatedCurve::new(TIMES.to_vec(), ois.to_vec(), ois_interpolator()).unwrap(),
        )
        .with_curve(
            "LIBOR-6M",
            InterpolatedCurve::new(TIMES.to_vec(), libor.to_vec(), libor_interpolator()).unwrap(),
        )
}

fn ois_swap(years: usize, rate: f64) -> FixedFloatSwap {
    let times: Vec<f64> = (1..=years).map(|i| i as f64).collect();
    FixedFloatSwap::from_schedules(
        0.0,
        &times,
        &vec![1.0; years],
        &times,
        &vec![1.0; years],
        1.0,
        rate,
        "OIS",
        "OIS",
    )
    .unwrap()
}

fn libor_swap(years: usize, rate: f64) -> FixedFloatSwap {
    let fixed: Vec<f64> = (1..=years).map(|i| i as f64).collect();
    let float: Vec<f64> = (1..=2 * years).map(|i| i as f64 * 0.5).collect();
    FixedFloatSwap::from_schedules(
        0.0,
        &fixed,
        &vec![1.0; years],
        &float,
        &vec![0.5; 2 * years],
        1.0,
        rate,
        "OIS",
        "LIBOR-6M",
    )
    .unwrap()
}

/// Market instruments struck at `rate`; struck at the par rate they are
/// worth zero.
fn ois_instruments(rate: impl Fn(usize) -> f64) -> Vec<Instrument> {
    vec![
        Cash::new(1.0, 0.0, 0.5, 0.5, rate(0), "OIS").unwrap().into(),
        ois_swap(1, rate(1)).into(),
        ois_swap(2, rate(2)).into(),
        ois_swap(3, rate(3)).into(),
        ois_swap(5, rate(4)).into(),
    ]
}

fn libor_instruments(rate: impl Fn(usize) -> f64) -> Vec<Instrument> {
    vec![
        ForwardRateAgreement::standard(0.0, 0.5, 0.5, 1.0, rate(0), "OIS", "LIBOR-6M")
            .unwrap()
            .into(),
        libor_swap(1, rate(1)).into(),
        libor_swap(2, rate(2)).into(),
        libor_swap(3, rate(3)).into(),
        libor_swap(5, rate(4)).into(),
    ]
}

fn par_rates(instruments: &[Instrument], curves: &CurveBundle) -> Vec<f64> {
    let calc = ParRateCalculator::new();
    instruments
        .iter()
        .map(|i| calc.calculate(i, curves).unwrap())
        .collect()
}

fn unknown(name: &str, interpolator: CurveInterpolator) -> UnknownCurve {
    UnknownCurve::new(name, TIMES.to_vec(), interpolator).unwrap()
}

/// Par-rate quoted two-curve problem implied by `curves`.
fn par_problem(curves: &CurveBundle) -> CalibrationProblem {
    let instruments: Vec<Instrument> = ois_instruments(|_| 0.0)
        .into_iter()
        .chain(libor_instruments(|_| 0.0))
        .collect();
    let quotes = par_rates(&instruments, curves);

    instruments
        .into_iter()
        .zip(quotes)
        .fold(
            CalibrationProblem::builder()
                .unknown_curve(unknown("OIS", ois_interpolator()))
                .unknown_curve(unknown("LIBOR-6M", libor_interpolator())),
            |builder, (instrument, quote)| builder.instrument(instrument, quote),
        )
        .build()
        .unwrap()
}

fn expected_nodes() -> Vec<f64> {
    OIS_RATES.iter().chain(&LIBOR_RATES).copied().collect()
}

fn assert_nodes(actual: &[f64], expected: &[f64], tol: f64) {
    assert_eq!(actual.len(), expected.len());
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!((a - e).abs() < tol, "node {i}: {a} vs {e}");
    }
}

#[test]
fn test_round_trip_from_flat_guess() {
    let curves = true_curves(&OIS_RATES, &LIBOR_RATES);
    let problem = par_problem(&curves);

    let result = NewtonCalibrator::default()
        .calibrate(&problem, &problem.flat_guess(0.01))
        .unwrap();

    assert_nodes(&result.node_values, &expected_nodes(), 1e-8);
    assert!(result.max_residual() < 1e-10);
    assert!(result.iterations < 10);
    assert_eq!(result.curves.names(), vec!["LIBOR-6M", "OIS"]);
}

#[test]
fn test_round_trip_from_perturbed_guess() {
    let curves = true_curves(&OIS_RATES, &LIBOR_RATES);
    let problem = par_problem(&curves);
    let guess: Vec<f64> = expected_nodes()
        .iter()
        .enumerate()
        .map(|(i, r)| r + if i % 2 == 0 { 0.004 } else { -0.003 })
        .collect();

    let result = NewtonCalibrator::default().calibrate(&problem, &guess).unwrap();
    assert_nodes(&result.node_values, &expected_nodes(), 1e-8);

    let report = RepricingReport::new(&problem, &result.curves).unwrap();
    assert!(report.all_within(1e-10), "{report}");
}

#[test]
fn test_present_value_target() {
    let curves = true_curves(&OIS_RATES, &LIBOR_RATES);
    let ois_par = par_rates(&ois_instruments(|_| 0.0), &curves);
    let libor_par = par_rates(&libor_instruments(|_| 0.0), &curves);

    let instruments: Vec<Instrument> = ois_instruments(|i| ois_par[i])
        .into_iter()
        .chain(libor_instruments(|i| libor_par[i]))
        .collect();
    let pv = PresentValueCalculator::new();
    for instrument in &instruments {
        assert!(pv.calculate(instrument, &curves).unwrap().abs() < 1e-14);
    }

    let problem = instruments
        .into_iter()
        .fold(
            CalibrationProblem::builder()
                .unknown_curve(unknown("OIS", ois_interpolator()))
                .unknown_curve(unknown("LIBOR-6M", libor_interpolator()))
                .target(CalibrationTarget::PresentValue),
            |builder, instrument| builder.instrument(instrument, 0.0),
        )
        .build()
        .unwrap();

    let result = NewtonCalibrator::default()
        .calibrate(&problem, &problem.flat_guess(0.02))
        .unwrap();
    assert_nodes(&result.node_values, &expected_nodes(), 1e-8);
}

#[test]
fn test_projection_curve_against_known_discounting() {
    let curves = true_curves(&OIS_RATES, &LIBOR_RATES);
    let instruments = libor_instruments(|_| 0.0);
    let quotes = par_rates(&instruments, &curves);
    let known = CurveBundle::new().with_shared_curve("OIS", curves.get_shared("OIS").unwrap());

    let problem = instruments
        .into_iter()
        .zip(quotes)
        .fold(
            CalibrationProblem::builder()
                .unknown_curve(unknown("LIBOR-6M", libor_interpolator()))
                .known_curves(known),
            |builder, (instrument, quote)| builder.instrument(instrument, quote),
        )
        .build()
        .unwrap();

    let result = NewtonCalibrator::default()
        .calibrate(&problem, &problem.flat_guess(0.03))
        .unwrap();
    assert_nodes(&result.node_values, &LIBOR_RATES, 1e-8);
    assert_eq!(
        result.curves.get_curve("OIS").unwrap().node_values(),
        &OIS_RATES
    );
}

#[test]
fn test_single_deposit() {
    let problem = CalibrationProblem::builder()
        .unknown_curve(UnknownCurve::new("OIS", vec![0.5], ois_interpolator()).unwrap())
        .instrument(Cash::new(1.0, 0.0, 0.5, 0.5, 0.0, "OIS").unwrap(), 0.02)
        .build()
        .unwrap();

    let result = NewtonCalibrator::default().calibrate(&problem, &[0.0]).unwrap();
    let df = result
        .curves
        .get_curve("OIS")
        .unwrap()
        .discount_factor(0.5)
        .unwrap();
    assert_relative_eq!(df, 1.0 / (1.0 + 0.02 * 0.5), epsilon = 1e-12);
}

#[test]
fn test_deposit_and_two_year_swap() {
    let swap = ois_swap(2, 0.0);
    let problem = CalibrationProblem::builder()
        .unknown_curve(UnknownCurve::new("OIS", vec![0.5, 2.0], ois_interpolator()).unwrap())
        .instrument(Cash::new(1.0, 0.0, 0.5, 0.5, 0.0, "OIS").unwrap(), 0.02)
        .instrument(swap.clone(), 0.025)
        .build()
        .unwrap();

    let result = NewtonCalibrator::default()
        .calibrate(&problem, &problem.flat_guess(0.0))
        .unwrap();

    let par = ParRateCalculator::new()
        .calculate(&swap, &result.curves)
        .unwrap();
    assert!((par - 0.025).abs() < 1e-8);
    let df = result
        .curves
        .get_curve("OIS")
        .unwrap()
        .discount_factor(0.5)
        .unwrap();
    assert_relative_eq!(df, 1.0 / 1.01, epsilon = 1e-10);
}

#[test]
fn test_analytic_jacobian_matches_finite_difference() {
    let curves = true_curves(&OIS_RATES, &LIBOR_RATES);
    let problem = par_problem(&curves);
    let x: Vec<f64> = expected_nodes().iter().map(|r| r + 0.001).collect();

    let analytic = AnalyticJacobian::new(&problem).evaluate(&x).unwrap();
    let numeric = FiniteDifferenceJacobian::new(&problem)
        .with_bump(1e-6)
        .evaluate(&x)
        .unwrap();

    assert_eq!(analytic.shape(), (10, 10));
    for i in 0..10 {
        for j in 0..10 {
            let (a, n) = (analytic[(i, j)], numeric[(i, j)]);
            assert!((a - n).abs() < 1e-6, "J[{i}][{j}]: {a} vs {n}");
        }
    }
}

#[test]
fn test_discount_block_of_projection_rows() {
    // LIBOR swaps discount on OIS, so their rows reach into the OIS block;
    // OIS instruments never read LIBOR
    let curves = true_curves(&OIS_RATES, &LIBOR_RATES);
    let problem = par_problem(&curves);
    let j = AnalyticJacobian::new(&problem)
        .evaluate(&expected_nodes())
        .unwrap();

    for i in 0..5 {
        for k in 5..10 {
            assert_eq!(j[(i, k)], 0.0);
        }
    }
    assert!((0..5).any(|k| j[(9, k)] != 0.0));
}

#[test]
fn test_parallel_calibration_is_identical() {
    let curves = true_curves(&OIS_RATES, &LIBOR_RATES);
    let serial = par_problem(&curves);
    let parallel = serial.clone().with_parallel(true);
    let guess = serial.flat_guess(0.01);

    let a = NewtonCalibrator::default().calibrate(&serial, &guess).unwrap();
    let b = NewtonCalibrator::default().calibrate(&parallel, &guess).unwrap();
    assert_eq!(a.node_values, b.node_values);
    assert_eq!(a.iterations, b.iterations);
}

#[test]
fn test_dimension_mismatch() {
    let curves = true_curves(&OIS_RATES, &LIBOR_RATES);
    let instruments = ois_instruments(|_| 0.0);
    let quotes = par_rates(&instruments, &curves);

    let result = instruments
        .into_iter()
        .zip(quotes)
        .take(4)
        .fold(
            CalibrationProblem::builder().unknown_curve(unknown("OIS", ois_interpolator())),
            |builder, (instrument, quote)| builder.instrument(instrument, quote),
        )
        .build();
    assert!(matches!(
        result,
        Err(CalibrationError::DimensionMismatch {
            expected: 5,
            actual: 4,
            ..
        })
    ));

    let problem = par_problem(&curves);
    assert!(matches!(
        NewtonCalibrator::default().calibrate(&problem, &[0.02; 9]),
        Err(CalibrationError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_unsupported_instrument_surfaces() {
    let problem = CalibrationProblem::builder()
        .unknown_curve(UnknownCurve::new("OIS", vec![1.0], ois_interpolator()).unwrap())
        .instrument(Payment::from(PaymentFixed::new(1.0, 1.0, "OIS").unwrap()), 0.98)
        .build()
        .unwrap();

    assert!(matches!(
        NewtonCalibrator::default().calibrate(&problem, &[0.02]),
        Err(CalibrationError::Pricing(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_round_trip(
        ois in proptest::collection::vec(0.0f64..0.05, 5),
        basis in proptest::collection::vec(0.0f64..0.01, 5),
    ) {
        let libor: Vec<f64> = ois.iter().zip(&basis).map(|(o, b)| o + b).collect();
        let curves = true_curves(&ois, &libor);
        let problem = par_problem(&curves);

        let result = NewtonCalibrator::default()
            .calibrate(&problem, &problem.flat_guess(0.02))
            .unwrap();

        let expected: Vec<f64> = ois.iter().chain(&libor).copied().collect();
        for (a, e) in result.node_values.iter().zip(&expected) {
            prop_assert!((a - e).abs() < 1e-8);
        }
    }

    #[test]
    fn prop_jacobian_is_square(years in 1usize..6) {
        let times: Vec<f64> = (1..=years).map(|i| i as f64).collect();
        let instruments: Vec<Instrument> = (1..=years).map(|y| ois_swap(y, 0.0).into()).collect();
        let problem = instruments
            .into_iter()
            .fold(
                CalibrationProblem::builder()
                    .unknown_curve(UnknownCurve::new("OIS", times, ois_interpolator()).unwrap()),
                |builder, instrument| builder.instrument(instrument, 0.02),
            )
            .build()
            .unwrap();

        let j = AnalyticJacobian::new(&problem)
            .evaluate(&problem.flat_guess(0.02))
            .unwrap();
        prop_assert_eq!(j.shape(), (years, years));
    }
}
