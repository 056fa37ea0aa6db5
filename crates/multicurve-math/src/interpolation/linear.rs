//! Linear interpolation.

use crate::error::MathResult;
use crate::interpolation::{check_range, find_segment, validate_nodes, Interpolator};

/// Linear interpolation between data points.
///
/// Connects consecutive points with straight lines. Each interpolated value
/// depends only on the two nodes of its segment.
///
/// # Example
///
/// ```rust
/// use multicurve_math::interpolation::{LinearInterpolator, Interpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
///
/// let interp = LinearInterpolator::new(xs, ys).unwrap();
/// let y = interp.interpolate(1.5).unwrap();
/// assert!((y - 2.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator.
    ///
    /// # Arguments
    ///
    /// * `xs` - X coordinates (strictly increasing)
    /// * `ys` - Y coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if there are fewer than 2 points, if lengths differ,
    /// or if the x values are not strictly increasing.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 2)?;
        Ok(Self { xs, ys })
    }

    /// Returns the segment and its relative position for an in-range x.
    fn locate(&self, x: f64) -> MathResult<(usize, f64, f64)> {
        check_range(&self.xs, x)?;
        let i = find_segment(&self.xs, x);
        let h = self.xs[i + 1] - self.xs[i];
        Ok((i, (x - self.xs[i]) / h, h))
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        let (i, t, _) = self.locate(x)?;
        let y0 = self.ys[i];
        let y1 = self.ys[i + 1];
        Ok(y0 + t * (y1 - y0))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        let (i, _, h) = self.locate(x)?;
        Ok((self.ys[i + 1] - self.ys[i]) / h)
    }

    fn node_sensitivities(&self, x: f64) -> MathResult<Vec<f64>> {
        let (i, t, _) = self.locate(x)?;
        let mut weights = vec![0.0; self.xs.len()];
        weights[i] = 1.0 - t;
        weights[i + 1] = t;
        Ok(weights)
    }

    fn derivative_node_sensitivities(&self, x: f64) -> MathResult<Vec<f64>> {
        let (i, _, h) = self.locate(x)?;
        let mut weights = vec![0.0; self.xs.len()];
        weights[i] = -1.0 / h;
        weights[i + 1] = 1.0 / h;
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_interpolation() {
        let xs = vec![0.0, 1.0, 2.0];
        let ys = vec![0.0, 2.0, 4.0];

        let interp = LinearInterpolator::new(xs, ys).unwrap();

        assert_relative_eq!(interp.interpolate(0.0).unwrap(), 0.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(1.0).unwrap(), 2.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(2.0).unwrap(), 4.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(0.5).unwrap(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(interp.interpolate(1.5).unwrap(), 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0]).unwrap();

        assert!(interp.interpolate(-0.5).is_err());
        assert!(interp.interpolate(2.5).is_err());
        assert!(interp.node_sensitivities(2.5).is_err());
    }

    #[test]
    fn test_local_support() {
        let interp =
            LinearInterpolator::new(vec![1.0, 2.0, 3.0, 4.0], vec![0.01, 0.02, 0.03, 0.04])
                .unwrap();

        let w = interp.node_sensitivities(2.25).unwrap();
        assert_eq!(w[0], 0.0);
        assert_relative_eq!(w[1], 0.75, epsilon = 1e-12);
        assert_relative_eq!(w[2], 0.25, epsilon = 1e-12);
        assert_eq!(w[3], 0.0);
    }

    #[test]
    fn test_insufficient_points() {
        assert!(LinearInterpolator::new(vec![0.0], vec![1.0]).is_err());
    }
}
