//! Curve implementations.
//!
//! - [`InterpolatedCurve`]: zero-rate nodes joined by a [`CurveInterpolator`](crate::CurveInterpolator)

mod interpolated;

pub use interpolated::InterpolatedCurve;
