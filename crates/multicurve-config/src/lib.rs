//! Multicurve Configuration Layer
//!
//! Calibration settings and problem files for the Multicurve library. A
//! problem file describes the curves to solve for, curves held fixed, and
//! the market instruments with their quotes, in TOML or JSON.
//!
//! # Example
//!
//! ```rust
//! use multicurve_config::prelude::*;
//!
//! let definition = ProblemDefinition::from_toml_str(r#"
//!     [settings]
//!     tolerance = 1e-12
//!
//!     [[curves]]
//!     name = "OIS"
//!     node_times = [1.0, 2.0]
//!
//!     [[instruments]]
//!     type = "cash"
//!     end = 1.0
//!     curve = "OIS"
//!     quote = 0.02
//!
//!     [[instruments]]
//!     type = "swap"
//!     maturity = 2.0
//!     funding_curve = "OIS"
//!     forward_curve = "OIS"
//!     quote = 0.022
//! "#).unwrap();
//!
//! assert!(definition.is_valid());
//!
//! let problem = definition.to_problem().unwrap();
//! let calibrated = definition
//!     .settings
//!     .calibrator()
//!     .calibrate(&problem, &definition.initial_guess())
//!     .unwrap();
//! assert!(calibrated.max_residual() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod problem;
pub mod settings;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
    pub use crate::problem::{
        InstrumentDefinition, KnownCurveDefinition, ProblemDefinition, UnknownCurveDefinition,
    };
    pub use crate::settings::CalibrationSettings;
}

pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use problem::{
    InstrumentDefinition, KnownCurveDefinition, ProblemDefinition, UnknownCurveDefinition,
};
pub use settings::CalibrationSettings;
