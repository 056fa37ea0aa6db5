//! Natural cubic spline interpolation.

use crate::error::MathResult;
use crate::interpolation::{check_range, find_segment, validate_nodes, Interpolator};

/// Natural cubic spline interpolation.
///
/// Piecewise cubic polynomials with continuous first and second derivatives;
/// "natural" means the second derivative is zero at both end points.
///
/// The second derivatives solve a tridiagonal system that is linear in the
/// node values, `y'' = M · y`. `M` is computed once at construction, which
/// makes node sensitivities exact. Unlike linear interpolation, every node
/// influences every interpolated value.
///
/// # Example
///
/// ```rust
/// use multicurve_math::interpolation::{NaturalCubicSpline, Interpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
///
/// let spline = NaturalCubicSpline::new(xs, ys).unwrap();
/// let y = spline.interpolate(1.5).unwrap();
/// assert!(y > 1.0 && y < 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct NaturalCubicSpline {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Second derivatives at each knot
    y2s: Vec<f64>,
    /// `∂y2s[i] / ∂ys[j]`
    y2_sensitivity: Vec<Vec<f64>>,
}

/// Position of x inside a spline segment.
struct Segment {
    lo: usize,
    a: f64,
    b: f64,
    h: f64,
}

impl NaturalCubicSpline {
    /// Creates a natural cubic spline interpolator.
    ///
    /// Two points are accepted; the spline then reduces to a straight line.
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, if lengths differ,
    /// or if the x values are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 2)?;

        let y2s = compute_second_derivatives(&xs, &ys);

        let n = xs.len();
        let mut y2_sensitivity = vec![vec![0.0; n]; n];
        let mut unit = vec![0.0; n];
        for j in 0..n {
            unit[j] = 1.0;
            let column = compute_second_derivatives(&xs, &unit);
            for (i, value) in column.into_iter().enumerate() {
                y2_sensitivity[i][j] = value;
            }
            unit[j] = 0.0;
        }

        Ok(Self {
            xs,
            ys,
            y2s,
            y2_sensitivity,
        })
    }

    fn locate(&self, x: f64) -> MathResult<Segment> {
        check_range(&self.xs, x)?;
        let lo = find_segment(&self.xs, x);
        let h = self.xs[lo + 1] - self.xs[lo];
        Ok(Segment {
            lo,
            a: (self.xs[lo + 1] - x) / h,
            b: (x - self.xs[lo]) / h,
            h,
        })
    }

    /// Returns the second derivatives at the knots.
    #[must_use]
    pub fn second_derivatives(&self) -> &[f64] {
        &self.y2s
    }
}

impl Interpolator for NaturalCubicSpline {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        let Segment { lo, a, b, h } = self.locate(x)?;
        let hi = lo + 1;

        let y = a * self.ys[lo]
            + b * self.ys[hi]
            + ((a * a * a - a) * self.y2s[lo] + (b * b * b - b) * self.y2s[hi]) * (h * h) / 6.0;

        Ok(y)
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        let Segment { lo, a, b, h } = self.locate(x)?;
        let hi = lo + 1;

        let dy = (self.ys[hi] - self.ys[lo]) / h - (3.0 * a * a - 1.0) / 6.0 * h * self.y2s[lo]
            + (3.0 * b * b - 1.0) / 6.0 * h * self.y2s[hi];

        Ok(dy)
    }

    fn node_sensitivities(&self, x: f64) -> MathResult<Vec<f64>> {
        let Segment { lo, a, b, h } = self.locate(x)?;
        let hi = lo + 1;
        let ca = (a * a * a - a) * h * h / 6.0;
        let cb = (b * b * b - b) * h * h / 6.0;

        let mut weights: Vec<f64> = (0..self.xs.len())
            .map(|j| ca * self.y2_sensitivity[lo][j] + cb * self.y2_sensitivity[hi][j])
            .collect();
        weights[lo] += a;
        weights[hi] += b;

        Ok(weights)
    }

    fn derivative_node_sensitivities(&self, x: f64) -> MathResult<Vec<f64>> {
        let Segment { lo, a, b, h } = self.locate(x)?;
        let hi = lo + 1;
        let ca = -(3.0 * a * a - 1.0) / 6.0 * h;
        let cb = (3.0 * b * b - 1.0) / 6.0 * h;

        let mut weights: Vec<f64> = (0..self.xs.len())
            .map(|j| ca * self.y2_sensitivity[lo][j] + cb * self.y2_sensitivity[hi][j])
            .collect();
        weights[lo] -= 1.0 / h;
        weights[hi] += 1.0 / h;

        Ok(weights)
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }

    fn len(&self) -> usize {
        self.xs.len()
    }
}

/// Computes the second derivatives for a natural cubic spline.
fn compute_second_derivatives(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut y2s = vec![0.0; n];
    let mut u = vec![0.0; n - 1];

    // Decomposition loop
    for i in 1..n - 1 {
        let sig = (xs[i] - xs[i - 1]) / (xs[i + 1] - xs[i - 1]);
        let p = sig * y2s[i - 1] + 2.0;
        y2s[i] = (sig - 1.0) / p;
        u[i] = (ys[i + 1] - ys[i]) / (xs[i + 1] - xs[i])
            - (ys[i] - ys[i - 1]) / (xs[i] - xs[i - 1]);
        u[i] = (6.0 * u[i] / (xs[i + 1] - xs[i - 1]) - sig * u[i - 1]) / p;
    }

    // Natural end condition
    y2s[n - 1] = 0.0;

    // Back-substitution loop
    for i in (0..n - 1).rev() {
        y2s[i] = y2s[i] * y2s[i + 1] + u[i];
    }

    y2s
}
