//! # Multicurve Math
//!
//! Numerical building blocks for the Multicurve calibration library.
//!
//! This crate provides:
//!
//! - **Interpolation**: Linear and natural cubic spline interpolators that also
//!   report the analytic sensitivity of the interpolated value (and slope) to
//!   each node value
//! - **Linear Algebra**: Dense linear solves used by the Newton calibration loop
//!
//! ## Design Philosophy
//!
//! - **Analytic Sensitivities**: Every interpolator is linear in its node
//!   values, so node sensitivities are exact rather than bumped
//! - **No Hidden Extrapolation**: Interpolators reject queries outside their
//!   node range; extrapolation is decided by the caller

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_range_loop)]

pub mod error;
pub mod interpolation;
pub mod linear_algebra;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{Interpolator, LinearInterpolator, NaturalCubicSpline};
    pub use crate::linear_algebra::{max_abs, solve_linear_system};
}

pub use error::{MathError, MathResult};
pub use interpolation::{Interpolator, LinearInterpolator, NaturalCubicSpline};
pub use linear_algebra::{max_abs, solve_linear_system};
