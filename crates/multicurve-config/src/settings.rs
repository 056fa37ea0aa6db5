//! Calibration settings.

use serde::{Deserialize, Serialize};

use multicurve_calibration::{
    CalibrationTarget, JacobianMethod, NewtonCalibrator, NewtonConfig, DEFAULT_BUMP,
};

use crate::error::{Validate, ValidationError};

/// Solver settings for a calibration run.
///
/// Every field has a default, so a problem file may omit any of them:
///
/// ```toml
/// [settings]
/// tolerance = 1e-12
/// target = "par-rate"
/// jacobian = "analytic"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationSettings {
    /// Convergence threshold on the largest absolute residual.
    pub tolerance: f64,

    /// Maximum Newton iterations.
    pub max_iterations: usize,

    /// What the instrument quotes mean.
    pub target: CalibrationTarget,

    /// Jacobian source.
    pub jacobian: JacobianMethod,

    /// Node bump for the finite-difference Jacobian.
    pub bump: f64,

    /// Spread instrument valuation over the rayon pool.
    pub parallel: bool,

    /// Step used to read the instantaneous rate of zero-length deposits.
    pub epsilon: f64,
}

impl Default for CalibrationSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-10,
            max_iterations: 50,
            target: CalibrationTarget::ParRate,
            jacobian: JacobianMethod::Analytic,
            bump: DEFAULT_BUMP,
            parallel: false,
            epsilon: 1e-8,
        }
    }
}

impl CalibrationSettings {
    /// Creates the default settings.
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

    /// Returns the Newton loop configuration.
    #[must_use]
    pub fn newton_config(&self) -> NewtonConfig {
        NewtonConfig::new()
            .with_tolerance(self.tolerance)
            .with_max_iterations(self.max_iterations)
            .with_jacobian(self.jacobian)
            .with_bump(self.bump)
    }

    /// Returns a calibrator configured from these settings.
    #[must_use]
    pub fn calibrator(&self) -> NewtonCalibrator {
        NewtonCalibrator::new(self.newton_config())
    }
}

impl Validate for CalibrationSettings {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.tolerance > 0.0 && self.tolerance.is_finite()) {
            errors.push(ValidationError::new(
                "tolerance",
                "Tolerance must be positive",
            ));
        }

        if self.max_iterations == 0 {
            errors.push(ValidationError::new(
                "max_iterations",
                "Max iterations must be at least 1",
            ));
        }

        if !(self.bump > 0.0 && self.bump.is_finite()) {
            errors.push(ValidationError::new("bump", "Bump must be positive"));
        }

        if !(self.epsilon > 0.0 && self.epsilon.is_finite()) {
            errors.push(ValidationError::new("epsilon", "Epsilon must be positive"));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CalibrationSettings::default();
        assert_eq!(settings.tolerance, 1e-10);
        assert_eq!(settings.max_iterations, 50);
        assert_eq!(settings.target, CalibrationTarget::ParRate);
        assert_eq!(settings.jacobian, JacobianMethod::Analytic);
        assert!(!settings.parallel);
        assert!(settings.is_valid());
    }

    #[test]
    fn test_validation() {
        let mut settings = CalibrationSettings::new()
            .with_tolerance(0.0)
            .with_max_iterations(0);
        settings.epsilon = -1.0;

        let fields: Vec<String> = settings.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["tolerance", "max_iterations", "epsilon"]);

        settings.tolerance = f64::NAN;
        assert!(!settings.is_valid());
    }

    #[test]
    fn test_partial_toml() {
        let settings: CalibrationSettings =
            toml::from_str("tolerance = 1e-12\njacobian = \"finite-difference\"").unwrap();
        assert_eq!(settings.tolerance, 1e-12);
        assert_eq!(settings.jacobian, JacobianMethod::FiniteDifference);
        assert_eq!(settings.max_iterations, 50);

        let config = settings.newton_config();
        assert_eq!(config.tolerance, 1e-12);
        assert_eq!(config.jacobian, JacobianMethod::FiniteDifference);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = CalibrationSettings::new().with_jacobian(JacobianMethod::FiniteDifference);
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"finite-difference\""));
        assert!(json.contains("\"par-rate\""));
        let back: CalibrationSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }
}
