//! # Multicurve Curves
//!
//! Yield curve primitives for the Multicurve calibration library.
//!
//! This crate provides:
//!
//! - **Curve Trait**: Core [`Curve`] trait (discount factors, zero rates,
//!   forwards, and analytic node sensitivities)
//! - **Interpolated Curves**: [`InterpolatedCurve`] built from zero-rate nodes
//! - **Interpolation Spec**: [`CurveInterpolator`], pairing an
//!   [`InterpolationMethod`] with an [`ExtrapolationMethod`]
//! - **Curve Bundles**: [`CurveBundle`], an immutable map from curve name to
//!   curve shared by every calculator
//!
//! ## Quick Start
//!
//! ```rust
//! use multicurve_curves::prelude::*;
//!
//! let curve = InterpolatedCurve::new(
//!     vec![0.5, 1.0, 2.0, 5.0],
//!     vec![0.020, 0.022, 0.025, 0.030],
//!     CurveInterpolator::new(InterpolationMethod::NaturalCubic, ExtrapolationMethod::FlatForward),
//! )
//! .unwrap();
//!
//! let df = curve.discount_factor(1.5).unwrap();
//! assert!(df > 0.0 && df < 1.0);
//!
//! let bundle = CurveBundle::new().with_curve("USD-OIS", curve);
//! assert!(bundle.get_curve("USD-OIS").is_ok());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]

pub mod bundle;
pub mod curves;
pub mod error;
pub mod interpolation;
pub mod traits;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bundle::CurveBundle;
    pub use crate::curves::InterpolatedCurve;
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::interpolation::{CurveInterpolator, ExtrapolationMethod, InterpolationMethod};
    pub use crate::traits::Curve;
}

pub use bundle::CurveBundle;
pub use curves::InterpolatedCurve;
pub use error::{CurveError, CurveResult};
pub use interpolation::{CurveInterpolator, ExtrapolationMethod, InterpolationMethod};
pub use traits::Curve;
