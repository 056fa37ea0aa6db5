//! Calibration problem definition.
//!
//! A problem pairs a set of curves to solve for (the *unknown* curves, each
//! with fixed node times) with a set of market instruments and their quotes.
//! The unknowns are the node zero rates of every unknown curve, flattened
//! curve block by curve block in insertion order:
//!
//! ```text
//! x = [ r(OIS, t0) .. r(OIS, tn) | r(LIBOR-6M, t0) .. r(LIBOR-6M, tm) ]
//! ```
//!
//! The problem is square: one instrument per node.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use multicurve_curves::{CurveBundle, CurveInterpolator, InterpolatedCurve};
use multicurve_instruments::{CurveDependent, Instrument};
use multicurve_pricing::{
    CurveSensitivities, ParRateCalculator, ParRateSensitivityCalculator, PresentValueCalculator,
    PresentValueSensitivityCalculator, PricingResult, DEFAULT_EPSILON,
};

use crate::error::{CalibrationError, CalibrationResult};

/// The quantity each instrument is calibrated to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CalibrationTarget {
    /// Quotes are par rates (deposit rates, swap rates, spreads).
    #[default]
    ParRate,
    /// Quotes are present values, usually zero.
    PresentValue,
}

impl CalibrationTarget {
    /// Returns the configuration key.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::ParRate => "par-rate",
            Self::PresentValue => "present-value",
        }
    }
}

impl fmt::Display for CalibrationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CalibrationTarget {
    type Err = CalibrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "par-rate" | "par" => Ok(Self::ParRate),
            "present-value" | "pv" => Ok(Self::PresentValue),
            other => Err(CalibrationError::invalid_input(format!(
                "unknown calibration target '{other}'"
            ))),
        }
    }
}

/// A curve to solve for: its name, node times and interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownCurve {
    name: String,
    node_times: Vec<f64>,
    interpolator: CurveInterpolator,
}

impl UnknownCurve {
    /// Creates an unknown curve.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::Curve`] if the node times could not define
    /// an [`InterpolatedCurve`] with this interpolator.
    pub fn new(
        name: impl Into<String>,
        node_times: Vec<f64>,
        interpolator: CurveInterpolator,
    ) -> CalibrationResult<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CalibrationError::invalid_input("curve name is empty"));
        }
        InterpolatedCurve::new(node_times.clone(), vec![0.0; node_times.len()], interpolator)?;

        Ok(Self {
            name,
            node_times,
            interpolator,
        })
    }

    /// Returns the curve name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the node times.
    #[must_use]
    pub fn node_times(&self) -> &[f64] {
        &self.node_times
    }

    /// Returns the curve interpolator.
    #[must_use]
    pub fn interpolator(&self) -> CurveInterpolator {
        self.interpolator
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_times.len()
    }

    /// Builds the curve with the given node rates.
    pub fn curve(&self, rates: &[f64]) -> CalibrationResult<InterpolatedCurve> {
        Ok(InterpolatedCurve::new(
            self.node_times.clone(),
            rates.to_vec(),
            self.interpolator,
        )?)
    }
}

/// A square calibration problem.
///
/// Build with [`CalibrationProblem::builder`].
///
/// # Example
///
/// ```rust
/// use multicurve_calibration::prelude::*;
/// use multicurve_curves::CurveInterpolator;
/// use multicurve_instruments::Cash;
///
/// let ois = UnknownCurve::new("OIS", vec![0.5], CurveInterpolator::default()).unwrap();
/// let problem = CalibrationProblem::builder()
///     .unknown_curve(ois)
///     .instrument(Cash::new(1.0, 0.0, 0.5, 0.5, 0.0, "OIS").unwrap(), 0.02)
///     .build()
///     .unwrap();
///
/// assert_eq!(problem.node_count(), 1);
/// let residuals = problem.residuals(&[0.02]).unwrap();
/// assert!(residuals[0].abs() < 1e-3);
/// ```
#[derive(Debug, Clone)]
pub struct CalibrationProblem {
    unknown_curves: Vec<UnknownCurve>,
    offsets: Vec<usize>,
    known_curves: CurveBundle,
    instruments: Vec<Instrument>,
    quotes: Vec<f64>,
    target: CalibrationTarget,
    epsilon: f64,
    parallel: bool,
}

impl CalibrationProblem {
    /// Starts a problem builder.
    #[must_use]
    pub fn builder() -> CalibrationProblemBuilder {
        CalibrationProblemBuilder::default()
    }

    /// Returns the curves being solved for, in block order.
    #[must_use]
    pub fn unknown_curves(&self) -> &[UnknownCurve] {
        &self.unknown_curves
    }

    /// Returns the curves held fixed.
    #[must_use]
    pub fn known_curves(&self) -> &CurveBundle {
        &self.known_curves
    }

    /// Returns the calibration instruments.
    #[must_use]
    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Returns the market quotes, one per instrument.
    #[must_use]
    pub fn quotes(&self) -> &[f64] {
        &self.quotes
    }

    /// Returns what the quotes mean.
    #[must_use]
    pub fn target(&self) -> CalibrationTarget {
        self.target
    }

    /// Returns the zero-length deposit step used for par rates.
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Returns true if per-instrument work is spread over the rayon pool.
    #[must_use]
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Returns the same problem with parallel evaluation switched on or off.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Returns the total number of unknown nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.unknown_curves.iter().map(UnknownCurve::node_count).sum()
    }

    /// Returns the number of instruments.
    #[must_use]
    pub fn instrument_count(&self) -> usize {
        self.instruments.len()
    }

    /// Returns the position of the first node of unknown curve `name` in
    /// the unknown vector, with its node count.
    #[must_use]
    pub fn block(&self, name: &str) -> Option<(usize, usize)> {
        self.unknown_curves
            .iter()
            .zip(&self.offsets)
            .find(|(curve, _)| curve.name == name)
            .map(|(curve, &offset)| (offset, curve.node_count()))
    }

    /// Returns a starting vector with every node at `rate`.
    #[must_use]
    pub fn flat_guess(&self, rate: f64) -> Vec<f64> {
        vec![rate; self.node_count()]
    }

    /// Builds the unknown curves from `x` and attaches the known curves.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::DimensionMismatch`] if `x` does not have
    /// one entry per node, or a curve error if a curve cannot be built.
    pub fn build_bundle(&self, x: &[f64]) -> CalibrationResult<CurveBundle> {
        self.check_len(x)?;

        let mut bundle = self.known_curves.clone();
        for (curve, &offset) in self.unknown_curves.iter().zip(&self.offsets) {
            let rates = &x[offset..offset + curve.node_count()];
            bundle = bundle.with_curve(curve.name.clone(), curve.curve(rates)?);
        }
        Ok(bundle)
    }

    /// Values every instrument at `x`, in the units of the target.
    pub fn values(&self, x: &[f64]) -> CalibrationResult<Vec<f64>> {
        let bundle = self.build_bundle(x)?;
        self.values_on(&bundle)
    }

    /// Values every instrument on an existing bundle.
    pub fn values_on(&self, curves: &CurveBundle) -> CalibrationResult<Vec<f64>> {
        let value = |instrument: &Instrument| self.value(instrument, curves);
        let values: PricingResult<Vec<f64>> = if self.parallel {
            self.instruments.par_iter().map(value).collect()
        } else {
            self.instruments.iter().map(value).collect()
        };
        Ok(values?)
    }

    /// Returns `quote - value` for every instrument at `x`.
    pub fn residuals(&self, x: &[f64]) -> CalibrationResult<Vec<f64>> {
        let values = self.values(x)?;
        Ok(self
            .quotes
            .iter()
            .zip(values)
            .map(|(quote, value)| quote - value)
            .collect())
    }

    pub(crate) fn value(&self, instrument: &Instrument, curves: &CurveBundle) -> PricingResult<f64> {
        match self.target {
            CalibrationTarget::ParRate => ParRateCalculator::new()
                .with_epsilon(self.epsilon)
                .calculate(instrument, curves),
            CalibrationTarget::PresentValue => {
                PresentValueCalculator::new().calculate(instrument, curves)
            }
        }
    }

    pub(crate) fn sensitivities(
        &self,
        instrument: &Instrument,
        curves: &CurveBundle,
    ) -> PricingResult<CurveSensitivities> {
        match self.target {
            CalibrationTarget::ParRate => ParRateSensitivityCalculator::new()
                .with_epsilon(self.epsilon)
                .calculate(instrument, curves),
            CalibrationTarget::PresentValue => {
                PresentValueSensitivityCalculator::new().calculate(instrument, curves)
            }
        }
    }

    pub(crate) fn check_len(&self, x: &[f64]) -> CalibrationResult<()> {
        let expected = self.node_count();
        if x.len() == expected {
            Ok(())
        } else {
            Err(CalibrationError::dimension_mismatch(
                "node vector",
                expected,
                x.len(),
            ))
        }
    }
}

/// Builder for [`CalibrationProblem`].
#[derive(Debug, Clone)]
pub struct CalibrationProblemBuilder {
    unknown_curves: Vec<UnknownCurve>,
    known_curves: CurveBundle,
    instruments: Vec<Instrument>,
    quotes: Vec<f64>,
    target: CalibrationTarget,
    epsilon: f64,
    parallel: bool,
}

impl Default for CalibrationProblemBuilder {
    fn default() -> Self {
        Self {
            unknown_curves: Vec::new(),
            known_curves: CurveBundle::new(),
            instruments: Vec::new(),
            quotes: Vec::new(),
            target: CalibrationTarget::default(),
            epsilon: DEFAULT_EPSILON,
            parallel: false,
        }
    }
}

impl CalibrationProblemBuilder {
    /// Adds a curve to solve for. Its nodes follow those already added.
    #[must_use]
    pub fn unknown_curve(mut self, curve: UnknownCurve) -> Self {
        self.unknown_curves.push(curve);
        self
    }

    /// Sets the curves held fixed during calibration.
    #[must_use]
    pub fn known_curves(mut self, curves: CurveBundle) -> Self {
        self.known_curves = curves;
        self
    }

    /// Adds an instrument with its market quote.
    #[must_use]
    pub fn instrument(mut self, instrument: impl Into<Instrument>, quote: f64) -> Self {
        self.instruments.push(instrument.into());
        self.quotes.push(quote);
        self
    }

    /// Sets what the quotes mean.
    #[must_use]
    pub fn target(mut self, target: CalibrationTarget) -> Self {
        self.target = target;
        self
    }

    /// Sets the zero-length deposit step.
    #[must_use]
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Spreads per-instrument work over the rayon pool.
    #[must_use]
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Validates and builds the problem.
    ///
    /// # Errors
    ///
    /// - [`CalibrationError::EmptyProblem`] with no instruments
    /// - [`CalibrationError::DimensionMismatch`] if node and instrument
    ///   counts differ
    /// - [`CalibrationError::DuplicateCurve`] if an unknown curve name repeats
    ///   or is also a known curve
    /// - [`CalibrationError::UnknownCurve`] if an instrument references a
    ///   curve in neither set
    /// - [`CalibrationError::InvalidInput`] for a non-finite quote or a
    ///   non-positive epsilon
    pub fn build(self) -> CalibrationResult<CalibrationProblem> {
        if self.instruments.is_empty() {
            return Err(CalibrationError::EmptyProblem);
        }
        if self.epsilon <= 0.0 || !self.epsilon.is_finite() {
            return Err(CalibrationError::invalid_input(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }

        let mut names = BTreeSet::new();
        for curve in &self.unknown_curves {
            if !names.insert(curve.name.as_str()) || self.known_curves.contains(&curve.name) {
                return Err(CalibrationError::duplicate_curve(curve.name.clone()));
            }
        }

        let node_count: usize = self.unknown_curves.iter().map(UnknownCurve::node_count).sum();
        if node_count != self.instruments.len() {
            return Err(CalibrationError::dimension_mismatch(
                "instrument count",
                node_count,
                self.instruments.len(),
            ));
        }

        for (index, (instrument, quote)) in self.instruments.iter().zip(&self.quotes).enumerate() {
            if !quote.is_finite() {
                return Err(CalibrationError::invalid_input(format!(
                    "quote {index} is not finite"
                )));
            }
            for name in instrument.curve_names() {
                if !names.contains(name) && !self.known_curves.contains(name) {
                    return Err(CalibrationError::unknown_curve(index, name));
                }
            }
        }

        let offsets = self
            .unknown_curves
            .iter()
            .scan(0, |next, curve| {
                let offset = *next;
                *next += curve.node_count();
                Some(offset)
            })
            .collect();

        debug!(
            "calibration problem: {} unknown curves, {} nodes, {} known curves, target {}",
            self.unknown_curves.len(),
            node_count,
            self.known_curves.len(),
            self.target
        );

        Ok(CalibrationProblem {
            unknown_curves: self.unknown_curves,
            offsets,
            known_curves: self.known_curves,
            instruments: self.instruments,
            quotes: self.quotes,
            target: self.target,
            epsilon: self.epsilon,
            parallel: self.parallel,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use multicurve_curves::Curve;
    use multicurve_instruments::{Cash, ForwardRateAgreement};

    fn unknown(name: &str, times: &[f64]) -> UnknownCurve {
        UnknownCurve::new(name, times.to_vec(), CurveInterpolator::default()).unwrap()
    }

    fn cash(end: f64) -> Cash {
        Cash::new(1.0, 0.0, end, end, 0.0, "OIS").unwrap()
    }

    fn two_node_problem() -> CalibrationProblem {
        CalibrationProblem::builder()
            .unknown_curve(unknown("OIS", &[0.5, 1.0]))
            .instrument(cash(0.5), 0.02)
            .instrument(cash(1.0), 0.022)
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_bundle_slices_blocks() {
        let known = CurveBundle::new().with_curve("GBP", InterpolatedCurve::flat(0.04).unwrap());
        let problem = CalibrationProblem::builder()
            .unknown_curve(unknown("OIS", &[0.5, 1.0]))
            .unknown_curve(unknown("LIBOR-6M", &[1.0]))
            .known_curves(known)
            .instrument(cash(0.5), 0.02)
            .instrument(cash(1.0), 0.02)
            .instrument(
                ForwardRateAgreement::standard(0.5, 1.0, 0.5, 1.0, 0.0, "OIS", "LIBOR-6M").unwrap(),
                0.025,
            )
            .build()
            .unwrap();

        assert_eq!(problem.block("OIS"), Some((0, 2)));
        assert_eq!(problem.block("LIBOR-6M"), Some((2, 1)));
        assert_eq!(problem.block("GBP"), None);

        let bundle = problem.build_bundle(&[0.01, 0.02, 0.03]).unwrap();
        assert_eq!(bundle.names(), vec!["GBP", "LIBOR-6M", "OIS"]);
        assert_eq!(bundle.get_curve("OIS").unwrap().node_values(), &[0.01, 0.02]);
        assert_eq!(bundle.get_curve("LIBOR-6M").unwrap().node_values(), &[0.03]);
    }

    #[test]
    fn test_build_bundle_checks_length() {
        let problem = two_node_problem();
        assert_eq!(
            problem.build_bundle(&[0.01]).unwrap_err(),
            CalibrationError::dimension_mismatch("node vector", 2, 1)
        );
    }

    #[test]
    fn test_residuals_are_quote_minus_value() {
        let problem = two_node_problem();
        let x = [0.02, 0.021];
        let values = problem.values(&x).unwrap();
        let residuals = problem.residuals(&x).unwrap();

        assert_relative_eq!(residuals[0], 0.02 - values[0], epsilon = 1e-15);
        assert_relative_eq!(residuals[1], 0.022 - values[1], epsilon = 1e-15);
    }

    #[test]
    fn test_parallel_values_match() {
        let problem = two_node_problem();
        let x = [0.02, 0.021];
        let serial = problem.values(&x).unwrap();
        let parallel = problem.clone().with_parallel(true).values(&x).unwrap();
        assert_eq!(serial, parallel);
    }

    #[test]
    fn test_rejects_dimension_mismatch() {
        let result = CalibrationProblem::builder()
            .unknown_curve(unknown("OIS", &[0.5, 1.0]))
            .instrument(cash(0.5), 0.02)
            .build();
        assert_eq!(
            result.unwrap_err(),
            CalibrationError::dimension_mismatch("instrument count", 2, 1)
        );
    }

    #[test]
    fn test_rejects_empty_problem() {
        let result = CalibrationProblem::builder()
            .unknown_curve(unknown("OIS", &[0.5]))
            .build();
        assert_eq!(result.unwrap_err(), CalibrationError::EmptyProblem);
    }

    #[test]
    fn test_rejects_duplicate_curves() {
        let result = CalibrationProblem::builder()
            .unknown_curve(unknown("OIS", &[0.5]))
            .unknown_curve(unknown("OIS", &[1.0]))
            .instrument(cash(0.5), 0.02)
            .instrument(cash(1.0), 0.02)
            .build();
        assert_eq!(result.unwrap_err(), CalibrationError::duplicate_curve("OIS"));

        let known = CurveBundle::new().with_curve("OIS", InterpolatedCurve::flat(0.02).unwrap());
        let result = CalibrationProblem::builder()
            .unknown_curve(unknown("OIS", &[0.5]))
            .known_curves(known)
            .instrument(cash(0.5), 0.02)
            .build();
        assert_eq!(result.unwrap_err(), CalibrationError::duplicate_curve("OIS"));
    }

    #[test]
    fn test_rejects_missing_curve() {
        let result = CalibrationProblem::builder()
            .unknown_curve(unknown("OIS", &[0.5]))
            .instrument(
                ForwardRateAgreement::standard(0.0, 0.5, 0.5, 1.0, 0.0, "OIS", "LIBOR-3M").unwrap(),
                0.02,
            )
            .build();
        assert_eq!(
            result.unwrap_err(),
            CalibrationError::unknown_curve(0, "LIBOR-3M")
        );
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let result = CalibrationProblem::builder()
            .unknown_curve(unknown("OIS", &[0.5]))
            .instrument(cash(0.5), f64::NAN)
            .build();
        assert!(matches!(result, Err(CalibrationError::InvalidInput { .. })));

        let result = CalibrationProblem::builder()
            .unknown_curve(unknown("OIS", &[0.5]))
            .instrument(cash(0.5), 0.02)
            .epsilon(0.0)
            .build();
        assert!(matches!(result, Err(CalibrationError::InvalidInput { .. })));

        assert!(matches!(
            UnknownCurve::new("OIS", vec![1.0, 0.5], CurveInterpolator::default()),
            Err(CalibrationError::Curve(_))
        ));
    }

    #[test]
    fn test_target_keys() {
        for target in [CalibrationTarget::ParRate, CalibrationTarget::PresentValue] {
            assert_eq!(target.key().parse::<CalibrationTarget>().unwrap(), target);
        }
        assert!("yield".parse::<CalibrationTarget>().is_err());
    }
}
