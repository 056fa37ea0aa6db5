//! Interpolated zero-rate curve.
//!
//! An `InterpolatedCurve` holds continuously compounded zero rates at node
//! times and evaluates the exponent `Y(t) = -ln DF(t)` piecewise:
//!
//! ```text
//! t <= t_0          Y = r_0 · t
//! t_0 < t <= t_n    Y = t · I(t)         (zero-rate methods)
//!                   Y = I(t)             (log-linear, I interpolates r_j·t_j)
//! t > t_n           per ExtrapolationMethod
//! ```
//!
//! Every branch is linear in the interpolated node quantities, so the
//! derivative of `DF(t)` with respect to each node rate is exact.

use std::sync::Arc;

use log::debug;
use multicurve_math::interpolation::{Interpolator, LinearInterpolator, NaturalCubicSpline};

use crate::error::{CurveError, CurveResult};
use crate::interpolation::{CurveInterpolator, ExtrapolationMethod, InterpolationMethod};
use crate::traits::Curve;

/// Node time used by [`InterpolatedCurve::flat`].
const FLAT_NODE_TIME: f64 = 1.0;

/// A curve built from zero-rate nodes.
///
/// # Example
///
/// ```rust
/// use multicurve_curves::prelude::*;
///
/// let curve = InterpolatedCurve::new(
///     vec![1.0, 2.0],
///     vec![0.02, 0.03],
///     CurveInterpolator::default(),
/// )
/// .unwrap();
///
/// assert!((curve.zero_rate(1.5).unwrap() - 0.025).abs() < 1e-12);
/// // nodes bracketing t = 1.5 move DF(1.5)
/// let sens = curve.node_sensitivities(1.5).unwrap();
/// assert_eq!(sens.len(), 2);
/// ```
#[derive(Clone)]
pub struct InterpolatedCurve {
    times: Vec<f64>,
    rates: Vec<f64>,
    interpolator: CurveInterpolator,
    /// `∂q_j/∂r_j` for the interpolated quantity `q_j`.
    scale: Vec<f64>,
    /// Absent for single-node curves.
    inner: Option<Arc<dyn Interpolator>>,
}

impl std::fmt::Debug for InterpolatedCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterpolatedCurve")
            .field("times", &self.times)
            .field("rates", &self.rates)
            .field("interpolator", &self.interpolator)
            .finish()
    }
}

/// Where a query time falls relative to the nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Before,
    Inside,
    Beyond,
}

impl InterpolatedCurve {
    /// Creates a curve from node times and zero rates.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::InvalidNodes`] if:
    /// - no nodes are given, or the lengths differ
    /// - a time is negative, or times are not strictly increasing
    /// - a time or rate is not finite
    /// - the method is log-linear and the first node time is zero
    pub fn new(
        times: Vec<f64>,
        rates: Vec<f64>,
        interpolator: CurveInterpolator,
    ) -> CurveResult<Self> {
        validate(&times, &rates, interpolator.method)?;

        let scale = if interpolator.method.is_on_log_discount() {
            times.clone()
        } else {
            vec![1.0; times.len()]
        };
        let inner = build_inner(interpolator.method, &times, &rates, &scale)?;

        debug!(
            "built {} curve with {} nodes up to t = {}",
            interpolator,
            times.len(),
            times[times.len() - 1]
        );

        Ok(Self {
            times,
            rates,
            interpolator,
            scale,
            inner,
        })
    }

    /// Creates a curve with a constant zero rate at every time.
    pub fn flat(rate: f64) -> CurveResult<Self> {
        Self::new(vec![FLAT_NODE_TIME], vec![rate], CurveInterpolator::default())
    }

    /// Returns a curve with the same times and interpolator but new rates.
    pub fn with_node_values(&self, rates: Vec<f64>) -> CurveResult<Self> {
        Self::new(self.times.clone(), rates, self.interpolator)
    }

    /// Returns the curve interpolator.
    #[must_use]
    pub fn interpolator(&self) -> CurveInterpolator {
        self.interpolator
    }

    /// Returns the last node time.
    #[must_use]
    pub fn max_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    fn last(&self) -> usize {
        self.times.len() - 1
    }

    fn region(&self, t: f64) -> CurveResult<Region> {
        if t.is_nan() {
            return Err(CurveError::domain("time is NaN"));
        }
        if t < 0.0 {
            return Err(CurveError::negative_time(t));
        }
        if t <= self.times[0] {
            Ok(Region::Before)
        } else if t <= self.max_time() {
            Ok(Region::Inside)
        } else if self.interpolator.extrapolation.allows_extrapolation() {
            Ok(Region::Beyond)
        } else {
            Err(CurveError::domain(format!(
                "time {t} beyond last node {} and extrapolation is disabled",
                self.max_time()
            )))
        }
    }

    fn on_log_discount(&self) -> bool {
        self.interpolator.method.is_on_log_discount()
    }

    /// Slope of the interpolated quantity at the last node.
    fn end_slope(&self) -> CurveResult<f64> {
        match &self.inner {
            Some(inner) => Ok(inner.derivative(self.max_time())?),
            None => Ok(0.0),
        }
    }

    /// `∂slope/∂r_j` at the last node.
    fn end_slope_sensitivities(&self) -> CurveResult<Vec<f64>> {
        match &self.inner {
            Some(inner) => {
                let weights = inner.derivative_node_sensitivities(self.max_time())?;
                Ok(weights
                    .into_iter()
                    .zip(&self.scale)
                    .map(|(w, s)| w * s)
                    .collect())
            }
            None => Ok(vec![0.0; self.times.len()]),
        }
    }

    /// The exponent `Y(t) = -ln DF(t)`.
    fn exponent(&self, t: f64) -> CurveResult<f64> {
        match self.region(t)? {
            Region::Before => Ok(self.rates[0] * t),
            Region::Inside => {
                let inner = self.inner.as_ref().ok_or_else(|| {
                    CurveError::invalid_nodes("interior query on a single-node curve")
                })?;
                let value = inner.interpolate(t)?;
                if self.on_log_discount() {
                    Ok(value)
                } else {
                    Ok(t * value)
                }
            }
            Region::Beyond => {
                let n = self.last();
                let (tn, rn) = (self.times[n], self.rates[n]);
                let dt = t - tn;
                match self.interpolator.extrapolation {
                    ExtrapolationMethod::Flat => Ok(rn * t),
                    ExtrapolationMethod::Linear | ExtrapolationMethod::FlatForward
                        if self.on_log_discount() =>
                    {
                        Ok(rn * tn + self.end_slope()? * dt)
                    }
                    ExtrapolationMethod::Linear => Ok(t * (rn + self.end_slope()? * dt)),
                    ExtrapolationMethod::FlatForward => {
                        let forward = rn + tn * self.end_slope()?;
                        Ok(rn * tn + forward * dt)
                    }
                    ExtrapolationMethod::None => Err(CurveError::domain(format!(
                        "time {t} beyond last node {tn}"
                    ))),
                }
            }
        }
    }

    /// `∂Y(t)/∂r_j` for every node, dense.
    fn exponent_sensitivities(&self, t: f64) -> CurveResult<Vec<f64>> {
        let mut sens = vec![0.0; self.times.len()];
        match self.region(t)? {
            Region::Before => sens[0] = t,
            Region::Inside => {
                let inner = self.inner.as_ref().ok_or_else(|| {
                    CurveError::invalid_nodes("interior query on a single-node curve")
                })?;
                let weights = inner.node_sensitivities(t)?;
                let factor = if self.on_log_discount() { 1.0 } else { t };
                for (j, w) in weights.into_iter().enumerate() {
                    sens[j] = factor * w * self.scale[j];
                }
            }
            Region::Beyond => {
                let n = self.last();
                let tn = self.times[n];
                let dt = t - tn;
                match self.interpolator.extrapolation {
                    ExtrapolationMethod::Flat => sens[n] = t,
                    ExtrapolationMethod::Linear | ExtrapolationMethod::FlatForward
                        if self.on_log_discount() =>
                    {
                        for (j, ds) in self.end_slope_sensitivities()?.into_iter().enumerate() {
                            sens[j] = ds * dt;
                        }
                        sens[n] += tn;
                    }
                    ExtrapolationMethod::Linear => {
                        for (j, ds) in self.end_slope_sensitivities()?.into_iter().enumerate() {
                            sens[j] = t * ds * dt;
                        }
                        sens[n] += t;
                    }
                    ExtrapolationMethod::FlatForward => {
                        for (j, ds) in self.end_slope_sensitivities()?.into_iter().enumerate() {
                            sens[j] = tn * ds * dt;
                        }
                        sens[n] += tn + dt;
                    }
                    ExtrapolationMethod::None => {
                        return Err(CurveError::domain(format!(
                            "time {t} beyond last node {tn}"
                        )))
                    }
                }
            }
        }
        Ok(sens)
    }
}

impl Curve for InterpolatedCurve {
    fn discount_factor(&self, t: f64) -> CurveResult<f64> {
        Ok((-self.exponent(t)?).exp())
    }

    fn zero_rate(&self, t: f64) -> CurveResult<f64> {
        if t == 0.0 {
            return Ok(self.rates[0]);
        }
        Ok(self.exponent(t)? / t)
    }

    fn node_times(&self) -> &[f64] {
        &self.times
    }

    fn node_values(&self) -> &[f64] {
        &self.rates
    }

    fn node_sensitivities(&self, t: f64) -> CurveResult<Vec<(usize, f64)>> {
        let sens = self.exponent_sensitivities(t)?;
        let df = (-self.exponent(t)?).exp();
        Ok(sens
            .into_iter()
            .enumerate()
            .filter(|(_, s)| *s != 0.0)
            .map(|(j, s)| (j, -df * s))
            .collect())
    }
}

fn validate(times: &[f64], rates: &[f64], method: InterpolationMethod) -> CurveResult<()> {
    if times.is_empty() {
        return Err(CurveError::invalid_nodes("curve needs at least one node"));
    }
    if times.len() != rates.len() {
        return Err(CurveError::invalid_nodes(format!(
            "{} node times but {} node values",
            times.len(),
            rates.len()
        )));
    }
    if times.iter().chain(rates).any(|v| !v.is_finite()) {
        return Err(CurveError::invalid_nodes("node times and values must be finite"));
    }
    if times[0] < 0.0 {
        return Err(CurveError::invalid_nodes(format!(
            "first node time {} is negative",
            times[0]
        )));
    }
    if let Some(i) = (1..times.len()).find(|&i| times[i] <= times[i - 1]) {
        return Err(CurveError::invalid_nodes(format!(
            "node times must be strictly increasing: t[{}] = {} <= t[{}] = {}",
            i,
            times[i],
            i - 1,
            times[i - 1]
        )));
    }
    if method.is_on_log_discount() && times[0] == 0.0 {
        return Err(CurveError::invalid_nodes(
            "log-linear curves need a positive first node time",
        ));
    }
    Ok(())
}

fn build_inner(
    method: InterpolationMethod,
    times: &[f64],
    rates: &[f64],
    scale: &[f64],
) -> CurveResult<Option<Arc<dyn Interpolator>>> {
    if times.len() < 2 {
        return Ok(None);
    }

    let xs = times.to_vec();
    let ys: Vec<f64> = rates.iter().zip(scale).map(|(r, s)| r * s).collect();
    let inner: Arc<dyn Interpolator> = match method {
        InterpolationMethod::Linear | InterpolationMethod::LogLinear => {
            Arc::new(LinearInterpolator::new(xs, ys)?)
        }
        InterpolationMethod::NaturalCubic => Arc::new(NaturalCubicSpline::new(xs, ys)?),
    };
    Ok(Some(inner))
}
