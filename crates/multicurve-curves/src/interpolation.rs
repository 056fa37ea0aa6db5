//! Interpolation and extrapolation methods for yield curves.
//!
//! Curves are defined by continuously compounded zero rates `r_j` at node
//! times `t_j`. Every method works on the exponent `Y(t) = r(t)·t`, with
//! `DF(t) = exp(-Y(t))`.
//!
//! | Method          | Interpolated quantity       |
//! |-----------------|-----------------------------|
//! | `Linear`        | zero rate `r(t)`            |
//! | `LogLinear`     | `Y(t) = -ln DF(t)`          |
//! | `NaturalCubic`  | zero rate `r(t)`            |
//!
//! Before the first node the zero rate is held flat at `r_0`. Beyond the last
//! node the [`ExtrapolationMethod`] decides.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CurveError;

/// Interpolation methods for yield curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum InterpolationMethod {
    /// Linear interpolation on zero rates.
    #[default]
    Linear,

    /// Linear interpolation on log discount factors (piecewise flat forwards).
    LogLinear,

    /// Natural cubic spline on zero rates.
    NaturalCubic,
}

impl InterpolationMethod {
    /// All methods, in declaration order.
    pub const ALL: [Self; 3] = [Self::Linear, Self::LogLinear, Self::NaturalCubic];

    /// Returns the configuration key for this method.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::LogLinear => "log-linear",
            Self::NaturalCubic => "natural-cubic",
        }
    }

    /// Returns true if this method interpolates `-ln DF` rather than zero rates.
    #[must_use]
    pub fn is_on_log_discount(&self) -> bool {
        matches!(self, Self::LogLinear)
    }

    /// Returns true if every node influences every interpolated value.
    #[must_use]
    pub fn has_global_support(&self) -> bool {
        matches!(self, Self::NaturalCubic)
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Linear => "Linear",
            Self::LogLinear => "Log-Linear",
            Self::NaturalCubic => "Natural Cubic",
        };
        write!(f, "{name}")
    }
}

impl FromStr for InterpolationMethod {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "linear" => Ok(Self::Linear),
            "log-linear" => Ok(Self::LogLinear),
            "natural-cubic" | "cubic" => Ok(Self::NaturalCubic),
            _ => Err(CurveError::UnknownMethod {
                kind: "interpolation",
                key: s.to_string(),
            }),
        }
    }
}

/// Extrapolation beyond the last curve node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ExtrapolationMethod {
    /// Hold the last zero rate.
    Flat,

    /// Continue the interpolated quantity along its slope at the last node.
    Linear,

    /// Hold the instantaneous forward rate at the last node.
    #[default]
    FlatForward,

    /// Reject queries beyond the last node.
    None,
}

impl ExtrapolationMethod {
    /// All methods, in declaration order.
    pub const ALL: [Self; 4] = [Self::Flat, Self::Linear, Self::FlatForward, Self::None];

    /// Returns the configuration key for this method.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Linear => "linear",
            Self::FlatForward => "flat-forward",
            Self::None => "none",
        }
    }

    /// Returns true if queries beyond the last node are answered.
    #[must_use]
    pub fn allows_extrapolation(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for ExtrapolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Flat => "Flat",
            Self::Linear => "Linear",
            Self::FlatForward => "Flat Forward",
            Self::None => "None",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ExtrapolationMethod {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_key(s).as_str() {
            "flat" => Ok(Self::Flat),
            "linear" => Ok(Self::Linear),
            "flat-forward" => Ok(Self::FlatForward),
            "none" => Ok(Self::None),
            _ => Err(CurveError::UnknownMethod {
                kind: "extrapolation",
                key: s.to_string(),
            }),
        }
    }
}

fn normalize_key(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['_', ' '], "-")
}

/// How a curve turns its nodes into a continuous function of time.
///
/// A value type: cheap to copy and compare, and serializable for
/// configuration files.
///
/// ```rust
/// use multicurve_curves::{CurveInterpolator, ExtrapolationMethod, InterpolationMethod};
///
/// let interp = CurveInterpolator::default()
///     .with_method(InterpolationMethod::LogLinear)
///     .with_extrapolation(ExtrapolationMethod::Flat);
/// assert_eq!(interp.to_string(), "Log-Linear / Flat");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct CurveInterpolator {
    /// Interpolation between nodes.
    #[serde(default)]
    pub method: InterpolationMethod,
    /// Extrapolation beyond the last node.
    #[serde(default)]
    pub extrapolation: ExtrapolationMethod,
}

impl CurveInterpolator {
    /// Creates an interpolator from its two parts.
    #[must_use]
    pub fn new(method: InterpolationMethod, extrapolation: ExtrapolationMethod) -> Self {
        Self {
            method,
            extrapolation,
        }
    }

    /// Sets the interpolation method.
    #[must_use]
    pub fn with_method(mut self, method: InterpolationMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the extrapolation method.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: ExtrapolationMethod) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Parses an interpolator from its configuration keys.
    pub fn from_keys(method: &str, extrapolation: &str) -> Result<Self, CurveError> {
        Ok(Self::new(method.parse()?, extrapolation.parse()?))
    }
}

impl fmt::Display for CurveInterpolator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.method, self.extrapolation)
    }
}
