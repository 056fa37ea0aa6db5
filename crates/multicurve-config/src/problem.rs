//! Calibration problem files.
//!
//! A problem file names the curves to solve for, any curves held fixed, and
//! one market instrument per unknown node. TOML and JSON are both accepted:
//!
//! ```toml
//! [settings]
//! tolerance = 1e-12
//!
//! [[curves]]
//! name = "OIS"
//! node_times = [0.5, 1.0, 2.0]
//! interpolation = "log-linear"
//!
//! [[instruments]]
//! type = "cash"
//! end = 0.5
//! curve = "OIS"
//! quote = 0.02
//!
//! [[instruments]]
//! type = "swap"
//! maturity = 1.0
//! funding_curve = "OIS"
//! forward_curve = "OIS"
//! quote = 0.021
//!
//! [[instruments]]
//! type = "swap"
//! maturity = 2.0
//! funding_curve = "OIS"
//! forward_curve = "OIS"
//! quote = 0.023
//! ```
//!
//! Each instrument is struck at its quote. Under the par-rate target the
//! quote is also the calibration target; under the present-value target the
//! instruments are priced to par instead.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use multicurve_calibration::{CalibrationProblem, CalibrationTarget, UnknownCurve};
use multicurve_curves::{
    Curve, CurveBundle, CurveInterpolator, ExtrapolationMethod, InterpolatedCurve, InterpolationMethod,
};
use multicurve_instruments::{
    Bond, Cash, FixedFloatSwap, FloatingRateNote, ForwardRateAgreement, IborAnnuity, Instrument,
    InterestRateFuture, TenorSwap, Visitable,
};

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use crate::settings::CalibrationSettings;

fn default_notional() -> f64 {
    1.0
}

fn default_initial_rate() -> f64 {
    0.02
}

fn default_fixed_period() -> f64 {
    1.0
}

fn default_float_period() -> f64 {
    0.5
}

/// A curve to calibrate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnknownCurveDefinition {
    /// Curve name, as referenced by instruments.
    pub name: String,

    /// Node times in years, strictly increasing.
    pub node_times: Vec<f64>,

    /// Interpolation between nodes.
    #[serde(default)]
    pub interpolation: InterpolationMethod,

    /// Extrapolation beyond the last node.
    #[serde(default)]
    pub extrapolation: ExtrapolationMethod,

    /// Starting zero rate for every node.
    #[serde(default = "default_initial_rate")]
    pub initial_rate: f64,
}

impl UnknownCurveDefinition {
    /// Returns the interpolator of this curve.
    #[must_use]
    pub fn interpolator(&self) -> CurveInterpolator {
        CurveInterpolator::new(self.interpolation, self.extrapolation)
    }
}

/// A curve held fixed during calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnownCurveDefinition {
    /// Curve name.
    pub name: String,

    /// Node times in years.
    pub node_times: Vec<f64>,

    /// Continuously compounded zero rates at the nodes.
    pub rates: Vec<f64>,

    /// Interpolation between nodes.
    #[serde(default)]
    pub interpolation: InterpolationMethod,

    /// Extrapolation beyond the last node.
    #[serde(default)]
    pub extrapolation: ExtrapolationMethod,
}

impl KnownCurveDefinition {
    /// Builds the curve.
    pub fn curve(&self) -> ConfigResult<InterpolatedCurve> {
        Ok(InterpolatedCurve::new(
            self.node_times.clone(),
            self.rates.clone(),
            CurveInterpolator::new(self.interpolation, self.extrapolation),
        )?)
    }
}

/// A market instrument and its quote.
///
/// Times are year fractions from the valuation date. Periods are regular
/// from the start, with a short final period when the maturity is not a
/// whole number of periods away.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InstrumentDefinition {
    /// Deposit over `[start, end]`, quoted as its simple rate.
    Cash {
        /// Start time; a deposit with `end == start` quotes the instantaneous rate.
        #[serde(default)]
        start: f64,
        /// Maturity.
        end: f64,
        /// Discounting curve.
        curve: String,
        /// Deposit rate.
        quote: f64,
        /// Notional.
        #[serde(default = "default_notional")]
        notional: f64,
    },

    /// FRA fixing and settling at `start`, quoted as its rate.
    Fra {
        /// Start of the fixing period.
        start: f64,
        /// End of the fixing period.
        end: f64,
        /// Discounting curve.
        funding_curve: String,
        /// Projection curve.
        forward_curve: String,
        /// FRA rate.
        quote: f64,
        /// Notional.
        #[serde(default = "default_notional")]
        notional: f64,
    },

    /// Interest rate future, quoted as the rate implied by its price.
    Future {
        /// Start of the underlying period.
        start: f64,
        /// End of the underlying period.
        end: f64,
        /// Projection curve.
        curve: String,
        /// Implied rate, `1 - price`.
        quote: f64,
        /// Notional.
        #[serde(default = "default_notional")]
        notional: f64,
    },

    /// Payer fixed-float swap, quoted as its par rate.
    Swap {
        /// Effective time.
        #[serde(default)]
        start: f64,
        /// Maturity.
        maturity: f64,
        /// Fixed leg period in years.
        #[serde(default = "default_fixed_period")]
        fixed_period: f64,
        /// Floating leg period in years.
        #[serde(default = "default_float_period")]
        float_period: f64,
        /// Discounting curve.
        funding_curve: String,
        /// Projection curve of the floating leg.
        forward_curve: String,
        /// Par rate.
        quote: f64,
        /// Notional.
        #[serde(default = "default_notional")]
        notional: f64,
    },

    /// Ibor against Ibor, quoted as the spread on the receive leg.
    TenorSwap {
        /// Effective time.
        #[serde(default)]
        start: f64,
        /// Maturity.
        maturity: f64,
        /// Discounting curve.
        funding_curve: String,
        /// Projection curve of the pay leg.
        pay_curve: String,
        /// Pay leg period in years.
        pay_period: f64,
        /// Projection curve of the receive leg.
        receive_curve: String,
        /// Receive leg period in years.
        receive_period: f64,
        /// Receive leg spread.
        quote: f64,
        /// Notional.
        #[serde(default = "default_notional")]
        notional: f64,
    },

    /// Floating rate note, quoted as its par spread.
    Frn {
        /// Issue time.
        #[serde(default)]
        start: f64,
        /// Maturity.
        maturity: f64,
        /// Coupon period in years.
        #[serde(default = "default_float_period")]
        period: f64,
        /// Discounting curve.
        funding_curve: String,
        /// Projection curve.
        forward_curve: String,
        /// Coupon spread.
        quote: f64,
        /// Notional.
        #[serde(default = "default_notional")]
        notional: f64,
    },

    /// Unit-notional bond issued today, quoted as its par coupon.
    Bond {
        /// Maturity.
        maturity: f64,
        /// Coupon period in years.
        #[serde(default = "default_fixed_period")]
        period: f64,
        /// Discounting curve.
        curve: String,
        /// Coupon rate.
        quote: f64,
    },
}

impl InstrumentDefinition {
    /// Returns the type tag.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Cash { .. } => "cash",
            Self::Fra { .. } => "fra",
            Self::Future { .. } => "future",
            Self::Swap { .. } => "swap",
            Self::TenorSwap { .. } => "tenor-swap",
            Self::Frn { .. } => "frn",
            Self::Bond { .. } => "bond",
        }
    }

    /// Returns the market quote.
    #[must_use]
    pub fn quote(&self) -> f64 {
        match self {
            Self::Cash { quote, .. }
            | Self::Fra { quote, .. }
            | Self::Future { quote, .. }
            | Self::Swap { quote, .. }
            | Self::TenorSwap { quote, .. }
            | Self::Frn { quote, .. }
            | Self::Bond { quote, .. } => *quote,
        }
    }

    /// Returns the value the instrument is calibrated to under `target`.
    ///
    /// Instruments are struck at their quote, so at par they are worth
    /// nothing except the bond, which is worth its face.
    #[must_use]
    pub fn target_value(&self, target: CalibrationTarget) -> f64 {
        match (target, self) {
            (CalibrationTarget::ParRate, _) => self.quote(),
            (CalibrationTarget::PresentValue, Self::Bond { .. }) => 1.0,
            (CalibrationTarget::PresentValue, _) => 0.0,
        }
    }

    /// Returns the names of the curves this instrument reads.
    #[must_use]
    pub fn curve_names(&self) -> BTreeSet<&str> {
        match self {
            Self::Cash { curve, .. } | Self::Future { curve, .. } | Self::Bond { curve, .. } => {
                BTreeSet::from([curve.as_str()])
            }
            Self::Fra {
                funding_curve,
                forward_curve,
                ..
            }
            | Self::Swap {
                funding_curve,
                forward_curve,
                ..
            }
            | Self::Frn {
                funding_curve,
                forward_curve,
                ..
            } => BTreeSet::from([funding_curve.as_str(), forward_curve.as_str()]),
            Self::TenorSwap {
                funding_curve,
                pay_curve,
                receive_curve,
                ..
            } => BTreeSet::from([
                funding_curve.as_str(),
                pay_curve.as_str(),
                receive_curve.as_str(),
            ]),
        }
    }

    /// Builds the instrument, struck at its quote.
    pub fn to_instrument(&self) -> ConfigResult<Instrument> {
        let instrument: Instrument = match self {
            Self::Cash {
                start,
                end,
                curve,
                quote,
                notional,
            } => Cash::new(*notional, *start, *end, end - start, *quote, curve.as_str())?.into(),
            Self::Fra {
                start,
                end,
                funding_curve,
                forward_curve,
                quote,
                notional,
            } => ForwardRateAgreement::standard(
                *start,
                *end,
                end - start,
                *notional,
                *quote,
                funding_curve.as_str(),
                forward_curve.as_str(),
            )?
            .into(),
            Self::Future {
                start,
                end,
                curve,
                quote,
                notional,
            } => InterestRateFuture::new(
                *start,
                *start,
                *end,
                end - start,
                end - start,
                1.0 - quote,
                *notional,
                curve.as_str(),
            )?
            .into(),
            Self::Swap {
                start,
                maturity,
                fixed_period,
                float_period,
                funding_curve,
                forward_curve,
                quote,
                notional,
            } => {
                let (fixed_times, fixed_fractions) = schedule(*start, *maturity, *fixed_period);
                let (float_times, float_fractions) = schedule(*start, *maturity, *float_period);
                FixedFloatSwap::from_schedules(
                    *start,
                    &fixed_times,
                    &fixed_fractions,
                    &float_times,
                    &float_fractions,
                    *notional,
                    *quote,
                    funding_curve,
                    forward_curve,
                )?
                .into()
            }
            Self::TenorSwap {
                start,
                maturity,
                funding_curve,
                pay_curve,
                pay_period,
                receive_curve,
                receive_period,
                quote,
                notional,
            } => {
                let (pay_times, pay_fractions) = schedule(*start, *maturity, *pay_period);
                let (receive_times, receive_fractions) =
                    schedule(*start, *maturity, *receive_period);
                let pay = IborAnnuity::from_schedule(
                    *start,
                    &pay_times,
                    &pay_fractions,
                    *notional,
                    0.0,
                    funding_curve,
                    pay_curve,
                )?;
                let receive = IborAnnuity::from_schedule(
                    *start,
                    &receive_times,
                    &receive_fractions,
                    *notional,
                    *quote,
                    funding_curve,
                    receive_curve,
                )?;
                TenorSwap::new(pay, receive).into()
            }
            Self::Frn {
                start,
                maturity,
                period,
                funding_curve,
                forward_curve,
                quote,
                notional,
            } => {
                let (times, fractions) = schedule(*start, *maturity, *period);
                let coupons = IborAnnuity::from_schedule(
                    *start,
                    &times,
                    &fractions,
                    *notional,
                    *quote,
                    funding_curve,
                    forward_curve,
                )?;
                FloatingRateNote::floating_rate_note(*start, coupons)?.into()
            }
            Self::Bond {
                maturity,
                period,
                curve,
                quote,
            } => {
                let (times, fractions) = schedule(0.0, *maturity, *period);
                Bond::from_schedule(&times, &fractions, *quote, curve)?.into()
            }
        };
        Ok(instrument)
    }

    /// Start, end and period of the instrument, where it has them.
    fn extent(&self) -> (f64, f64, Vec<(&'static str, f64)>) {
        match self {
            Self::Cash { start, end, .. }
            | Self::Fra { start, end, .. }
            | Self::Future { start, end, .. } => (*start, *end, Vec::new()),
            Self::Swap {
                start,
                maturity,
                fixed_period,
                float_period,
                ..
            } => (
                *start,
                *maturity,
                vec![("fixed_period", *fixed_period), ("float_period", *float_period)],
            ),
            Self::TenorSwap {
                start,
                maturity,
                pay_period,
                receive_period,
                ..
            } => (
                *start,
                *maturity,
                vec![("pay_period", *pay_period), ("receive_period", *receive_period)],
            ),
            Self::Frn {
                start,
                maturity,
                period,
                ..
            } => (*start, *maturity, vec![("period", *period)]),
            Self::Bond {
                maturity, period, ..
            } => (0.0, *maturity, vec![("period", *period)]),
        }
    }
}

impl Validate for InstrumentDefinition {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !self.quote().is_finite() {
            errors.push(ValidationError::new("quote", "Quote must be finite"));
        }

        if self.curve_names().iter().any(|name| name.is_empty()) {
            errors.push(ValidationError::new("curve", "Curve name cannot be empty"));
        }

        let (start, end, periods) = self.extent();
        if !(start >= 0.0 && start.is_finite()) {
            errors.push(ValidationError::new("start", "Start must be non-negative"));
        }
        let zero_length_allowed = matches!(self, Self::Cash { .. });
        if !(end.is_finite() && (end > start || (zero_length_allowed && end == start))) {
            errors.push(ValidationError::new("end", "End must be after start"));
        }
        for (field, period) in periods {
            if !(period > 0.0 && period.is_finite()) {
                errors.push(ValidationError::new(field, "Period must be positive"));
            }
        }

        errors
    }
}

/// A complete calibration problem file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDefinition {
    /// Solver settings.
    #[serde(default)]
    pub settings: CalibrationSettings,

    /// Curves to calibrate, in block order.
    pub curves: Vec<UnknownCurveDefinition>,

    /// Curves held fixed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub known_curves: Vec<KnownCurveDefinition>,

    /// Calibration instruments, one per unknown node.
    pub instruments: Vec<InstrumentDefinition>,
}

impl ProblemDefinition {
    /// Reads a problem file, choosing the format from its extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, its extension is neither
    /// `.toml` nor `.json`, or its contents do not parse.
    pub fn from_path(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if extension != "toml" && extension != "json" {
            return Err(ConfigError::UnsupportedFormat { extension });
        }

        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if extension == "toml" {
            Self::from_toml_str(&contents)
        } else {
            Self::from_json_str(&contents)
        }
    }

    /// Parses a TOML problem.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Parses a JSON problem.
    pub fn from_json_str(contents: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Serializes the problem as TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Serializes the problem as pretty-printed JSON.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns the total number of unknown nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.curves.iter().map(|c| c.node_times.len()).sum()
    }

    /// Returns the starting node values, block by block.
    #[must_use]
    pub fn initial_guess(&self) -> Vec<f64> {
        self.curves
            .iter()
            .flat_map(|c| std::iter::repeat(c.initial_rate).take(c.node_times.len()))
            .collect()
    }

    /// Builds the fixed curves.
    pub fn known_bundle(&self) -> ConfigResult<CurveBundle> {
        let curves = self
            .known_curves
            .iter()
            .map(|c| Ok((c.name.clone(), Arc::new(c.curve()?) as Arc<dyn Curve>)))
            .collect::<ConfigResult<Vec<_>>>()?;
        Ok(CurveBundle::from_curves(curves)?)
    }

    /// Validates the definition and assembles the calibration problem.
    ///
    /// # Errors
    ///
    /// Returns the validation errors, or the first error raised while
    /// building curves and instruments.
    pub fn to_problem(&self) -> ConfigResult<CalibrationProblem> {
        self.validate_or_error()?;

        let mut builder = CalibrationProblem::builder()
            .known_curves(self.known_bundle()?)
            .target(self.settings.target)
            .epsilon(self.settings.epsilon)
            .parallel(self.settings.parallel);

        for curve in &self.curves {
            builder = builder.unknown_curve(UnknownCurve::new(
                curve.name.clone(),
                curve.node_times.clone(),
                curve.interpolator(),
            )?);
        }
        for instrument in &self.instruments {
            builder = builder.instrument(
                instrument.to_instrument()?,
                instrument.target_value(self.settings.target),
            );
        }

        Ok(builder.build()?)
    }
}

impl Validate for ProblemDefinition {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors: Vec<ValidationError> = self
            .settings
            .validate()
            .into_iter()
            .map(|e| e.nested("settings"))
            .collect();

        if self.curves.is_empty() {
            errors.push(ValidationError::new("curves", "At least one curve is required"));
        }

        let mut names = BTreeSet::new();
        let unknown = self.curves.iter().map(|c| (&c.name, &c.node_times, None));
        let known = self
            .known_curves
            .iter()
            .map(|c| (&c.name, &c.node_times, Some(&c.rates)));
        for (i, (name, times, rates)) in unknown.chain(known).enumerate() {
            let prefix = if i < self.curves.len() {
                format!("curves[{i}]")
            } else {
                format!("known_curves[{}]", i - self.curves.len())
            };
            if name.is_empty() {
                errors.push(ValidationError::new("name", "Name cannot be empty").nested(&prefix));
            } else if !names.insert(name.as_str()) {
                errors.push(
                    ValidationError::new("name", format!("Curve '{name}' is defined twice"))
                        .nested(&prefix),
                );
            }
            if times.is_empty() {
                errors.push(
                    ValidationError::new("node_times", "At least one node is required")
                        .nested(&prefix),
                );
            } else if times.windows(2).any(|w| w[1] <= w[0]) || times[0] < 0.0 {
                errors.push(
                    ValidationError::new(
                        "node_times",
                        "Node times must be non-negative and strictly increasing",
                    )
                    .nested(&prefix),
                );
            }
            if let Some(rates) = rates {
                if rates.len() != times.len() {
                    errors.push(
                        ValidationError::new(
                            "rates",
                            format!("Expected {} rates, found {}", times.len(), rates.len()),
                        )
                        .nested(&prefix),
                    );
                }
            }
        }

        if self.instruments.len() != self.node_count() {
            errors.push(ValidationError::new(
                "instruments",
                format!(
                    "Expected one instrument per node ({}), found {}",
                    self.node_count(),
                    self.instruments.len()
                ),
            ));
        }

        for (i, instrument) in self.instruments.iter().enumerate() {
            let prefix = format!("instruments[{i}]");
            errors.extend(instrument.validate().into_iter().map(|e| e.nested(&prefix)));
            for curve in instrument.curve_names() {
                if !curve.is_empty() && !names.contains(curve) {
                    errors.push(
                        ValidationError::new("curve", format!("Unknown curve '{curve}'"))
                            .nested(&prefix),
                    );
                }
            }
        }

        errors
    }
}

/// Regular payment times from `start` to `end` with a short last period.
fn schedule(start: f64, end: f64, period: f64) -> (Vec<f64>, Vec<f64>) {
    let mut times = Vec::new();
    let mut t = start + period;
    while t < end - 1e-9 {
        times.push(t);
        t += period;
    }
    times.push(end);

    let fractions = times
        .iter()
        .scan(start, |previous, &t| {
            let tau = t - *previous;
            *previous = t;
            Some(tau)
        })
        .collect();
    (times, fractions)
}
