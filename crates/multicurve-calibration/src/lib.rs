//! # Multicurve Calibration
//!
//! Simultaneous calibration of several yield curves to market quotes.
//!
//! Each curve to solve for is an [`UnknownCurve`]: fixed node times and an
//! interpolator. A [`CalibrationProblem`] pairs the unknown curves (and any
//! curves held fixed) with one quoted instrument per node. The
//! [`NewtonCalibrator`] then solves `value_i(x) = quote_i` with
//! Newton-Raphson, taking its Jacobian from the analytic pricing
//! sensitivities ([`AnalyticJacobian`]) or from central differences
//! ([`FiniteDifferenceJacobian`]).
//!
//! ## Example
//!
//! ```rust
//! use multicurve_calibration::prelude::*;
//! use multicurve_curves::{CurveInterpolator, InterpolationMethod};
//! use multicurve_instruments::{Cash, FixedFloatSwap};
//!
//! let ois = UnknownCurve::new(
//!     "OIS",
//!     vec![0.5, 2.0],
//!     CurveInterpolator::default().with_method(InterpolationMethod::LogLinear),
//! )
//! .unwrap();
//! let swap = FixedFloatSwap::from_schedules(
//!     0.0, &[1.0, 2.0], &[1.0; 2], &[0.5, 1.0, 1.5, 2.0], &[0.5; 4],
//!     1.0, 0.0, "OIS", "OIS",
//! )
//! .unwrap();
//!
//! let problem = CalibrationProblem::builder()
//!     .unknown_curve(ois)
//!     .instrument(Cash::new(1.0, 0.0, 0.5, 0.5, 0.0, "OIS").unwrap(), 0.02)
//!     .instrument(swap, 0.025)
//!     .build()
//!     .unwrap();
//!
//! let result = NewtonCalibrator::default()
//!     .calibrate(&problem, &problem.flat_guess(0.02))
//!     .unwrap();
//!
//! let report = RepricingReport::new(&problem, &result.curves).unwrap();
//! assert!(report.all_within(1e-8));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]

pub mod error;
pub mod jacobian;
pub mod newton;
pub mod problem;
pub mod report;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CalibrationError, CalibrationResult, FailedIteration};
    pub use crate::jacobian::{AnalyticJacobian, FiniteDifferenceJacobian, Jacobian};
    pub use crate::newton::{CalibratedCurves, JacobianMethod, NewtonCalibrator, NewtonConfig};
    pub use crate::problem::{
        CalibrationProblem, CalibrationProblemBuilder, CalibrationTarget, UnknownCurve,
    };
    pub use crate::report::{RepricingLine, RepricingReport};
}

pub use error::{CalibrationError, CalibrationResult, FailedIteration};
pub use jacobian::{AnalyticJacobian, FiniteDifferenceJacobian, Jacobian, DEFAULT_BUMP};
pub use newton::{CalibratedCurves, JacobianMethod, NewtonCalibrator, NewtonConfig};
pub use problem::{CalibrationProblem, CalibrationProblemBuilder, CalibrationTarget, UnknownCurve};
pub use report::{RepricingLine, RepricingReport};
