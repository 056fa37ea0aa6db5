//! Interpolation methods for yield curve construction.
//!
//! # Available Methods
//!
//! - [`LinearInterpolator`]: Piecewise linear, local support on two nodes
//! - [`NaturalCubicSpline`]: C2 natural cubic spline, global support
//!
//! # Node Sensitivities
//!
//! Calibration needs the derivative of an interpolated value with respect to
//! each node value. Both interpolators are linear in their y values, so
//!
//! ```text
//! y(x) = Σ w_j(x) · y_j      ∂y(x)/∂y_j = w_j(x)
//! ```
//!
//! and the weights are returned directly by
//! [`node_sensitivities`](Interpolator::node_sensitivities). The same holds for
//! the slope, which curves need for flat-forward extrapolation.

mod cubic_spline;
mod linear;

pub use cubic_spline::NaturalCubicSpline;
pub use linear::LinearInterpolator;

use crate::error::{MathError, MathResult};

/// Trait for interpolation methods.
///
/// Queries outside `[min_x, max_x]` fail with
/// [`MathError::ExtrapolationNotAllowed`].
pub trait Interpolator: Send + Sync + std::fmt::Debug {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    ///
    /// At an interior node the slope of the segment to the left is used, so
    /// at `max_x` this is the last segment's end slope.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Returns `∂y(x)/∂y_j` for every node `j`.
    fn node_sensitivities(&self, x: f64) -> MathResult<Vec<f64>>;

    /// Returns `∂y'(x)/∂y_j` for every node `j`.
    fn derivative_node_sensitivities(&self, x: f64) -> MathResult<Vec<f64>>;

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Returns the number of nodes.
    fn len(&self) -> usize;

    /// Returns true if there are no nodes.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Checks the node arrays shared by every interpolator.
pub(crate) fn validate_nodes(xs: &[f64], ys: &[f64], required: usize) -> MathResult<()> {
    if xs.len() < required {
        return Err(MathError::insufficient_data(required, xs.len()));
    }
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("node values must be finite"));
    }
    for i in 1..xs.len() {
        if xs[i] <= xs[i - 1] {
            return Err(MathError::invalid_input(
                "x values must be strictly increasing",
            ));
        }
    }
    Ok(())
}

/// Finds the segment index `i` with `xs[i] < x <= xs[i+1]`, clamped to the
/// first segment at `xs[0]`.
pub(crate) fn find_segment(xs: &[f64], x: f64) -> usize {
    let last = xs.len() - 2;
    match xs.binary_search_by(|probe| probe.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Equal)) {
        Ok(i) => i.saturating_sub(1).min(last),
        Err(i) => i.saturating_sub(1).min(last),
    }
}

/// Rejects a query outside the node range.
pub(crate) fn check_range(xs: &[f64], x: f64) -> MathResult<()> {
    let min = xs[0];
    let max = xs[xs.len() - 1];
    if x < min || x > max || x.is_nan() {
        return Err(MathError::extrapolation_not_allowed(x, min, max));
    }
    Ok(())
}
