//! Calibration Jacobians.
//!
//! Row `i` holds the derivatives of instrument `i`'s value with respect to
//! every unknown node rate. The analytic builder chains the pricing
//! sensitivities `∂Q/∂P(t)` with the curve's `∂P(t)/∂r_j`:
//!
//! ```text
//! J[i][offset(c) + j] = Σ_t  ∂Q_i/∂P_c(t) · ∂P_c(t)/∂r_{c,j}
//! ```
//!
//! Sensitivities to known curves are dropped. The finite-difference builder
//! bumps each node both ways and is kept for validation.

use log::trace;
use nalgebra::DMatrix;
use rayon::prelude::*;

use multicurve_curves::CurveBundle;

use crate::error::CalibrationResult;
use crate::problem::CalibrationProblem;

/// Default central difference step for [`FiniteDifferenceJacobian`].
pub const DEFAULT_BUMP: f64 = 1e-7;

/// Evaluates `∂value_i/∂x_j` at a point.
pub trait Jacobian: Send + Sync {
    /// Returns the square Jacobian at `x`.
    fn evaluate(&self, x: &[f64]) -> CalibrationResult<DMatrix<f64>>;
}

/// Jacobian from analytic curve sensitivities.
#[derive(Debug, Clone, Copy)]
pub struct AnalyticJacobian<'a> {
    problem: &'a CalibrationProblem,
}

impl<'a> AnalyticJacobian<'a> {
    /// Creates the builder for `problem`.
    #[must_use]
    pub fn new(problem: &'a CalibrationProblem) -> Self {
        Self { problem }
    }

    fn row(&self, index: usize, curves: &CurveBundle) -> CalibrationResult<Vec<f64>> {
        let problem = self.problem;
        let instrument = &problem.instruments()[index];
        let sensitivities = problem.sensitivities(instrument, curves)?;

        let mut row = vec![0.0; problem.node_count()];
        for (name, entries) in sensitivities.iter() {
            let Some((offset, _)) = problem.block(name) else {
                continue;
            };
            let curve = curves.get_curve(name)?;
            for &(t, dq_dp) in entries {
                for (j, dp_dr) in curve.node_sensitivities(t)? {
                    row[offset + j] += dq_dp * dp_dr;
                }
            }
        }
        Ok(row)
    }
}

impl Jacobian for AnalyticJacobian<'_> {
    fn evaluate(&self, x: &[f64]) -> CalibrationResult<DMatrix<f64>> {
        let curves = self.problem.build_bundle(x)?;
        let n = self.problem.node_count();

        let rows: Vec<Vec<f64>> = if self.problem.is_parallel() {
            (0..n)
                .into_par_iter()
                .map(|i| self.row(i, &curves))
                .collect::<CalibrationResult<_>>()?
        } else {
            (0..n)
                .map(|i| self.row(i, &curves))
                .collect::<CalibrationResult<_>>()?
        };

        trace!("assembled {n}x{n} analytic jacobian");
        Ok(DMatrix::from_fn(n, n, |i, j| rows[i][j]))
    }
}

/// Jacobian from central differences of the instrument values.
#[derive(Debug, Clone, Copy)]
pub struct FiniteDifferenceJacobian<'a> {
    problem: &'a CalibrationProblem,
    bump: f64,
}

impl<'a> FiniteDifferenceJacobian<'a> {
    /// Creates the builder for `problem` with the default bump.
    #[must_use]
    pub fn new(problem: &'a CalibrationProblem) -> Self {
        Self {
            problem,
            bump: DEFAULT_BUMP,
        }
    }

    /// Sets the bump applied to each node rate.
    #[must_use]
    pub fn with_bump(mut self, bump: f64) -> Self {
        self.bump = bump;
        self
    }

    fn column(&self, x: &[f64], j: usize) -> CalibrationResult<Vec<f64>> {
        let mut shifted = x.to_vec();
        shifted[j] = x[j] + self.bump;
        let up = self.problem.values(&shifted)?;
        shifted[j] = x[j] - self.bump;
        let down = self.problem.values(&shifted)?;

        Ok(up
            .iter()
            .zip(&down)
            .map(|(u, d)| (u - d) / (2.0 * self.bump))
            .collect())
    }
}

impl Jacobian for FiniteDifferenceJacobian<'_> {
    fn evaluate(&self, x: &[f64]) -> CalibrationResult<DMatrix<f64>> {
        self.problem.check_len(x)?;
        let n = x.len();

        let columns: Vec<Vec<f64>> = if self.problem.is_parallel() {
            (0..n)
                .into_par_iter()
                .map(|j| self.column(x, j))
                .collect::<CalibrationResult<_>>()?
        } else {
            (0..n)
                .map(|j| self.column(x, j))
                .collect::<CalibrationResult<_>>()?
        };

        trace!("assembled {n}x{n} finite-difference jacobian");
        Ok(DMatrix::from_fn(n, n, |i, j| columns[j][i]))
    }
}
