//! Newton-Raphson calibration loop.
//!
//! Solves `values(x) = quotes` for the node vector `x`:
//!
//! ```text
//! r_k = quotes - values(x_k)
//! J_k · δ_k = r_k
//! x_{k+1} = x_k + δ_k
//! ```
//!
//! until `max |r_k| < tolerance`.

use std::fmt;
use std::str::FromStr;

use log::{debug, info, warn};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use multicurve_curves::CurveBundle;
use multicurve_math::{max_abs, solve_linear_system};

use crate::error::{CalibrationError, CalibrationResult, FailedIteration};
use crate::jacobian::{AnalyticJacobian, FiniteDifferenceJacobian, Jacobian, DEFAULT_BUMP};
use crate::problem::CalibrationProblem;

/// How the Newton loop obtains its Jacobian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JacobianMethod {
    /// Chain rule through the pricing sensitivities.
    #[default]
    Analytic,
    /// Central differences of the instrument values.
    FiniteDifference,
}

impl JacobianMethod {
    /// Returns the configuration key.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Analytic => "analytic",
            Self::FiniteDifference => "finite-difference",
        }
    }
}

impl fmt::Display for JacobianMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for JacobianMethod {
    type Err = CalibrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "analytic" => Ok(Self::Analytic),
            "finite-difference" | "fd" => Ok(Self::FiniteDifference),
            other => Err(CalibrationError::invalid_input(format!(
                "unknown jacobian method '{other}'"
            ))),
        }
    }
}

/// Configuration for the Newton loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonConfig {
    /// Convergence threshold on the largest absolute residual.
    pub tolerance: f64,
    /// Maximum number of Newton steps.
    pub max_iterations: usize,
    /// Jacobian source.
    pub jacobian: JacobianMethod,
    /// Node bump for [`JacobianMethod::FiniteDifference`].
    pub bump: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 50,
            jacobian: JacobianMethod::Analytic,
            bump: DEFAULT_BUMP,
        }
    }
}

impl NewtonConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the Jacobian method.
    #[must_use]
    pub fn with_jacobian(mut self, jacobian: JacobianMethod) -> Self {
        self.jacobian = jacobian;
        self
    }

    /// Sets the finite-difference bump.
    #[must_use]
    pub fn with_bump(mut self, bump: f64) -> Self {
        self.bump = bump;
        self
    }
}

/// Curves that reprice the calibration instruments.
#[derive(Debug, Clone)]
pub struct CalibratedCurves {
    /// Calibrated curves together with the known curves.
    pub curves: CurveBundle,
    /// Solved node rates, curve block by curve block.
    pub node_values: Vec<f64>,
    /// Newton steps taken.
    pub iterations: usize,
    /// `quote - value` per instrument at the solution.
    pub residuals: Vec<f64>,
    /// The last Jacobian evaluated; `None` if the initial guess already
    /// converged.
    pub jacobian: Option<DMatrix<f64>>,
}

impl CalibratedCurves {
    /// Returns the largest absolute residual.
    #[must_use]
    pub fn max_residual(&self) -> f64 {
        max_abs(&self.residuals)
    }
}

/// Multi-curve Newton-Raphson calibrator.
///
/// # Example
///
/// ```rust
/// use multicurve_calibration::prelude::*;
/// use multicurve_curves::{Curve, CurveInterpolator};
/// use multicurve_instruments::Cash;
///
/// let ois = UnknownCurve::new("OIS", vec![0.5], CurveInterpolator::default()).unwrap();
/// let problem = CalibrationProblem::builder()
///     .unknown_curve(ois)
///     .instrument(Cash::new(1.0, 0.0, 0.5, 0.5, 0.0, "OIS").unwrap(), 0.02)
///     .build()
///     .unwrap();
///
/// let result = NewtonCalibrator::default().calibrate(&problem, &[0.0]).unwrap();
/// let df = result.curves.get_curve("OIS").unwrap().discount_factor(0.5).unwrap();
/// assert!((df - 1.0 / 1.01).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonCalibrator {
    config: NewtonConfig,
}

impl NewtonCalibrator {
    /// Creates a calibrator.
    #[must_use]
    pub fn new(config: NewtonConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &NewtonConfig {
        &self.config
    }

    /// Solves `problem` starting from `initial_guess`.
    ///
    /// # Errors
    ///
    /// - [`CalibrationError::DimensionMismatch`] if the guess has the wrong
    ///   length
    /// - [`CalibrationError::SingularJacobian`] if a Newton step cannot be
    ///   solved; the error keeps the failing state
    /// - [`CalibrationError::ConvergenceFailure`] if the tolerance is not
    ///   reached within `max_iterations` steps or a residual is not finite
    /// - curve and pricing errors from valuing the instruments
    pub fn calibrate(
        &self,
        problem: &CalibrationProblem,
        initial_guess: &[f64],
    ) -> CalibrationResult<CalibratedCurves> {
        problem.check_len(initial_guess).map_err(|_| {
            CalibrationError::dimension_mismatch(
                "initial guess",
                problem.node_count(),
                initial_guess.len(),
            )
        })?;

        let jacobian: Box<dyn Jacobian + '_> = match self.config.jacobian {
            JacobianMethod::Analytic => Box::new(AnalyticJacobian::new(problem)),
            JacobianMethod::FiniteDifference => {
                Box::new(FiniteDifferenceJacobian::new(problem).with_bump(self.config.bump))
            }
        };

        let mut x = initial_guess.to_vec();
        let mut last_jacobian = None;
        let mut iterations = 0;

        loop {
            let residuals = problem.residuals(&x)?;
            let max_residual = max_abs(&residuals);
            debug!("newton iteration {iterations}: max residual {max_residual:.3e}");

            let finite = residuals.iter().all(|r| r.is_finite());
            if finite && max_residual < self.config.tolerance {
                info!(
                    "calibrated {} nodes in {iterations} iterations (max residual {max_residual:.3e})",
                    x.len()
                );
                return Ok(CalibratedCurves {
                    curves: problem.build_bundle(&x)?,
                    node_values: x,
                    iterations,
                    residuals,
                    jacobian: last_jacobian,
                });
            }

            if !finite || iterations >= self.config.max_iterations {
                warn!(
                    "calibration stopped after {iterations} iterations with max residual {max_residual:.3e}"
                );
                return Err(CalibrationError::ConvergenceFailure {
                    iterations,
                    max_residual,
                    state: Box::new(FailedIteration {
                        residuals,
                        node_values: x,
                        jacobian: last_jacobian,
                    }),
                });
            }

            let j = jacobian.evaluate(&x)?;
            let delta = match solve_linear_system(&j, &DVector::from_vec(residuals.clone())) {
                Ok(delta) => delta,
                Err(source) => {
                    warn!("newton iteration {iterations}: {source}");
                    return Err(CalibrationError::SingularJacobian {
                        iterations,
                        source,
                        state: Box::new(FailedIteration {
                            residuals,
                            node_values: x,
                            jacobian: Some(j),
                        }),
                    });
                }
            };
            for (xi, di) in x.iter_mut().zip(delta.iter()) {
                *xi += di;
            }
            last_jacobian = Some(j);
            iterations += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::UnknownCurve;
    use multicurve_curves::{Curve, CurveInterpolator};
    use multicurve_instruments::Cash;
    use multicurve_math::MathError;

    fn deposits(quotes: &[(f64, f64)]) -> CalibrationProblem {
        let times = quotes.iter().map(|&(t, _)| t).collect();
        let ois = UnknownCurve::new("OIS", times, CurveInterpolator::default()).unwrap();
        quotes
            .iter()
            .fold(CalibrationProblem::builder().unknown_curve(ois), |b, &(t, q)| {
                b.instrument(Cash::new(1.0, 0.0, t, t, 0.0, "OIS").unwrap(), q)
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_single_deposit() {
        let problem = deposits(&[(0.5, 0.02)]);
        let result = NewtonCalibrator::default().calibrate(&problem, &[0.05]).unwrap();

        let df = result.curves.get_curve("OIS").unwrap().discount_factor(0.5).unwrap();
        assert!((df - 1.0 / (1.0 + 0.02 * 0.5)).abs() < 1e-12);
        assert!(result.iterations >= 1);
        assert!(result.max_residual() < 1e-10);
        assert!(result.jacobian.is_some());
    }

    #[test]
    fn test_converged_guess_takes_no_steps() {
        let problem = deposits(&[(1.0, 0.03)]);
        let exact = (1.03_f64).ln();
        let result = NewtonCalibrator::default().calibrate(&problem, &[exact]).unwrap();
        assert_eq!(result.iterations, 0);
        assert!(result.jacobian.is_none());
    }

    #[test]
    fn test_finite_difference_agrees() {
        let problem = deposits(&[(0.5, 0.02), (1.0, 0.022), (2.0, 0.025)]);
        let guess = problem.flat_guess(0.0);

        let analytic = NewtonCalibrator::default().calibrate(&problem, &guess).unwrap();
        let numeric = NewtonCalibrator::new(
            NewtonConfig::default().with_jacobian(JacobianMethod::FiniteDifference),
        )
        .calibrate(&problem, &guess)
        .unwrap();

        for (a, b) in analytic.node_values.iter().zip(&numeric.node_values) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_wrong_guess_length() {
        let problem = deposits(&[(0.5, 0.02), (1.0, 0.022)]);
        assert_eq!(
            NewtonCalibrator::default()
                .calibrate(&problem, &[0.02])
                .unwrap_err(),
            CalibrationError::dimension_mismatch("initial guess", 2, 1)
        );
    }

    #[test]
    fn test_iteration_limit() {
        let problem = deposits(&[(0.5, 0.02), (1.0, 0.022)]);
        let calibrator = NewtonCalibrator::new(
            NewtonConfig::default()
                .with_max_iterations(1)
                .with_tolerance(1e-15),
        );

        let err = calibrator.calibrate(&problem, &[0.2, 0.2]).unwrap_err();
        let CalibrationError::ConvergenceFailure {
            iterations, state, ..
        } = err
        else {
            panic!("expected a convergence failure");
        };
        assert_eq!(iterations, 1);
        assert_eq!(state.residuals.len(), 2);
        assert_eq!(state.node_values.len(), 2);
        assert_eq!(state.jacobian.map(|j| j.shape()), Some((2, 2)));
    }

    #[test]
    fn test_singular_jacobian() {
        // both deposits read only the first node
        let ois = UnknownCurve::new("OIS", vec![0.5, 1.0], CurveInterpolator::default()).unwrap();
        let problem = CalibrationProblem::builder()
            .unknown_curve(ois)
            .instrument(Cash::new(1.0, 0.0, 0.25, 0.25, 0.0, "OIS").unwrap(), 0.02)
            .instrument(Cash::new(1.0, 0.0, 0.5, 0.5, 0.0, "OIS").unwrap(), 0.03)
            .build()
            .unwrap();

        let err = NewtonCalibrator::default()
            .calibrate(&problem, &[0.01, 0.01])
            .unwrap_err();
        let CalibrationError::SingularJacobian {
            iterations,
            source,
            state,
        } = err
        else {
            panic!("expected a singular Jacobian");
        };
        assert_eq!(iterations, 0);
        assert_eq!(source, MathError::SingularMatrix);
        assert_eq!(state.node_values, vec![0.01, 0.01]);
        assert_eq!(state.residuals.len(), 2);
        let jacobian = state.jacobian.expect("singular Jacobian kept");
        assert_eq!(jacobian.shape(), (2, 2));
        assert!(jacobian.column(1).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_method_keys() {
        for method in [JacobianMethod::Analytic, JacobianMethod::FiniteDifference] {
            assert_eq!(method.key().parse::<JacobianMethod>().unwrap(), method);
        }
    }
}
