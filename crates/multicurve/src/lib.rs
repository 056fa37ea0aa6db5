//! # Multicurve
//!
//! Multi-curve interest rate curve calibration.
//!
//! Curves are named zero-rate curves held in a [`CurveBundle`]. Instruments
//! refer to their discounting and projection curves by name and are priced by
//! visitor calculators. The Newton calibrator solves every unknown curve of a
//! problem at once, using the analytic sensitivities of the instruments to
//! the curve nodes.
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`math`] | interpolation, linear solves |
//! | [`curves`] | interpolated curves, bundles |
//! | [`instruments`] | payments, deposits, FRAs, futures, swaps, bonds, the visitor |
//! | [`pricing`] | present value, par rate and their curve sensitivities |
//! | [`calibration`] | problems, Jacobians, the Newton solver, repricing reports |
//! | [`config`] | TOML/JSON problem files |
//!
//! # Example
//!
//! ```rust
//! use multicurve::prelude::*;
//!
//! let ois = UnknownCurve::new("OIS", vec![1.0, 2.0], CurveInterpolator::default()).unwrap();
//! let deposit = Cash::new(1.0, 0.0, 1.0, 1.0, 0.02, "OIS").unwrap();
//! let swap = FixedFloatSwap::from_schedules(
//!     0.0, &[1.0, 2.0], &[1.0, 1.0], &[1.0, 2.0], &[1.0, 1.0], 1.0, 0.022, "OIS", "OIS",
//! )
//! .unwrap();
//!
//! let problem = CalibrationProblem::builder()
//!     .unknown_curve(ois)
//!     .instrument(deposit, 0.02)
//!     .instrument(swap, 0.022)
//!     .build()
//!     .unwrap();
//!
//! let calibrated = NewtonCalibrator::default()
//!     .calibrate(&problem, &problem.flat_guess(0.02))
//!     .unwrap();
//!
//! let ois = calibrated.curves.get_curve("OIS").unwrap();
//! assert!((ois.discount_factor(1.0).unwrap() - 1.0 / 1.02).abs() < 1e-10);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use multicurve_calibration as calibration;
pub use multicurve_config as config;
pub use multicurve_curves as curves;
pub use multicurve_instruments as instruments;
pub use multicurve_math as math;
pub use multicurve_pricing as pricing;

/// Everything needed to build, price and calibrate.
pub mod prelude {
    pub use multicurve_calibration::prelude::*;
    pub use multicurve_config::prelude::*;
    pub use multicurve_curves::prelude::*;
    pub use multicurve_instruments::prelude::*;
    pub use multicurve_pricing::prelude::*;
}
