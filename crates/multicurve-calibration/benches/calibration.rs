//! Benchmarks for Jacobian assembly and full two-curve calibration.
//!
//! Run with: cargo bench -p multicurve-calibration

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use multicurve_calibration::prelude::*;
use multicurve_curves::prelude::*;
use multicurve_instruments::prelude::*;
use multicurve_pricing::ParRateCalculator;

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn node_times(count: usize) -> Vec<f64> {
    (1..=count).map(|i| i as f64).collect()
}

fn swap(years: usize, forward: &str, float_per_year: usize) -> FixedFloatSwap {
    let fixed = node_times(years);
    let step = 1.0 / float_per_year as f64;
    let float: Vec<f64> = (1..=years * float_per_year).map(|i| i as f64 * step).collect();
    FixedFloatSwap::from_schedules(
        0.0,
        &fixed,
        &vec![1.0; years],
        &float,
        &vec![step; float.len()],
        1.0,
        0.0,
        "OIS",
        forward,
    )
    .unwrap()
}

/// Two curves with `count` annual nodes each, quoted from upward sloping
/// reference curves.
fn create_problem(count: usize, parallel: bool) -> CalibrationProblem {
    let times = node_times(count);
    let ois_rates: Vec<f64> = times.iter().map(|t| 0.015 + 0.001 * t).collect();
    let libor_rates: Vec<f64> = ois_rates.iter().map(|r| r + 0.004).collect();
    let ois_interp =
        CurveInterpolator::new(InterpolationMethod::LogLinear, ExtrapolationMethod::FlatForward);
    let libor_interp =
        CurveInterpolator::new(InterpolationMethod::NaturalCubic, ExtrapolationMethod::FlatForward);

    let reference = CurveBundle::new()
        .with_curve(
            "OIS",
            InterpolatedCurve::new(times.clone(), ois_rates, ois_interp).unwrap(),
        )
        .with_curve(
            "LIBOR-6M",
            InterpolatedCurve::new(times.clone(), libor_rates, libor_interp).unwrap(),
        );

    let instruments: Vec<Instrument> = (1..=count)
        .map(|y| swap(y, "OIS", 1).into())
        .chain((1..=count).map(|y| swap(y, "LIBOR-6M", 2).into()))
        .collect();

    let par = ParRateCalculator::new();
    instruments
        .into_iter()
        .fold(
            CalibrationProblem::builder()
                .unknown_curve(UnknownCurve::new("OIS", times.clone(), ois_interp).unwrap())
                .unknown_curve(UnknownCurve::new("LIBOR-6M", times, libor_interp).unwrap())
                .parallel(parallel),
            |builder, instrument| {
                let quote = par.calculate(&instrument, &reference).unwrap();
                builder.instrument(instrument, quote)
            },
        )
        .build()
        .unwrap()
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_jacobian(c: &mut Criterion) {
    let mut group = c.benchmark_group("jacobian");

    for count in [5, 10, 20] {
        let problem = create_problem(count, false);
        let x = problem.flat_guess(0.02);

        group.bench_with_input(BenchmarkId::new("analytic", count), &x, |b, x| {
            let jacobian = AnalyticJacobian::new(&problem);
            b.iter(|| jacobian.evaluate(black_box(x)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("finite_difference", count), &x, |b, x| {
            let jacobian = FiniteDifferenceJacobian::new(&problem);
            b.iter(|| jacobian.evaluate(black_box(x)).unwrap());
        });
    }

    group.finish();
}

fn bench_calibration(c: &mut Criterion) {
    let mut group = c.benchmark_group("calibration");
    group.sample_size(20);

    for parallel in [false, true] {
        let problem = create_problem(10, parallel);
        let guess = problem.flat_guess(0.02);
        let label = if parallel { "parallel" } else { "serial" };

        group.bench_function(BenchmarkId::new("two_curve_10y", label), |b| {
            b.iter(|| {
                NewtonCalibrator::default()
                    .calibrate(black_box(&problem), black_box(&guess))
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_jacobian, bench_calibration);
criterion_main!(benches);
