//! # Multicurve Pricing
//!
//! Calculators for the Multicurve instrument set, dispatched through
//! [`InstrumentVisitor`](multicurve_instruments::InstrumentVisitor):
//!
//! - [`PresentValueCalculator`]: value in currency units
//! - [`ParRateCalculator`]: the quote that makes an instrument worth zero
//! - [`PresentValueSensitivityCalculator`] and
//!   [`ParRateSensitivityCalculator`]: derivatives of the above with respect
//!   to every discount factor the instrument reads
//!
//! Calculators are stateless apart from configuration, take the
//! [`CurveBundle`](multicurve_curves::CurveBundle) as visitor data, and may be
//! shared freely across threads.
//!
//! ## Example
//!
//! ```rust
//! use multicurve_curves::prelude::*;
//! use multicurve_instruments::prelude::*;
//! use multicurve_pricing::prelude::*;
//!
//! let curves = CurveBundle::new()
//!     .with_curve("OIS", InterpolatedCurve::flat(0.02).unwrap())
//!     .with_curve("LIBOR-6M", InterpolatedCurve::flat(0.025).unwrap());
//!
//! let swap = FixedFloatSwap::from_schedules(
//!     0.0, &[1.0, 2.0], &[1.0, 1.0], &[0.5, 1.0, 1.5, 2.0], &[0.5; 4],
//!     1.0, 0.0, "OIS", "LIBOR-6M",
//! )
//! .unwrap();
//!
//! let par = ParRateCalculator::new().calculate(&swap, &curves).unwrap();
//! assert!(par > 0.02);
//!
//! let sens = PresentValueSensitivityCalculator::new()
//!     .calculate(&swap, &curves)
//!     .unwrap();
//! assert_eq!(sens.curve_names(), vec!["LIBOR-6M", "OIS"]);
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
pub mod par_rate;
pub mod present_value;
mod rates;
pub mod sensitivity;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{PricingError, PricingResult};
    pub use crate::par_rate::ParRateCalculator;
    pub use crate::present_value::PresentValueCalculator;
    pub use crate::sensitivity::{
        CurveSensitivities, ParRateSensitivityCalculator, PresentValueSensitivityCalculator,
    };
}

pub use error::{PricingError, PricingResult};
pub use par_rate::{ParRateCalculator, DEFAULT_EPSILON};
pub use present_value::PresentValueCalculator;
pub use sensitivity::{
    CurveSensitivities, ParRateSensitivityCalculator, PresentValueSensitivityCalculator,
};
