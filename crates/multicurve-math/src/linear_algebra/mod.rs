//! Linear algebra utilities.
//!
//! Dense solves for the Newton calibration loop. Matrices are small (one row
//! per calibration instrument) so a pivoted LU decomposition is used directly.

use crate::error::{MathError, MathResult};
use log::trace;
use nalgebra::{DMatrix, DVector};

/// Solves a linear system `Ax = b` using LU decomposition with partial
/// pivoting.
///
/// # Errors
///
/// - [`MathError::DimensionMismatch`] if `a` is not square or `b` has the
///   wrong length
/// - [`MathError::SingularMatrix`] if `a` cannot be inverted or the solution
///   is not finite
pub fn solve_linear_system(a: &DMatrix<f64>, b: &DVector<f64>) -> MathResult<DVector<f64>> {
    let n = a.nrows();
    if n != a.ncols() || n != b.len() {
        return Err(MathError::DimensionMismatch {
            rows1: a.nrows(),
            cols1: a.ncols(),
            rows2: b.len(),
            cols2: 1,
        });
    }

    trace!("solving {n}x{n} dense system");

    let x = a.clone().lu().solve(b).ok_or(MathError::SingularMatrix)?;
    if x.iter().any(|v| !v.is_finite()) {
        return Err(MathError::SingularMatrix);
    }

    Ok(x)
}

/// Returns the largest absolute entry of a slice (0.0 when empty).
#[must_use]
pub fn max_abs(values: &[f64]) -> f64 {
    values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_linear_system() {
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_vec(vec![5.0, 5.0]);

        let x = solve_linear_system(&a, &b).unwrap();

        assert_relative_eq!(x[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_solve_needs_pivoting() {
        // zero in the leading position
        let a = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        let b = DVector::from_vec(vec![3.0, 4.0]);

        let x = solve_linear_system(&a, &b).unwrap();

        assert_relative_eq!(x[0], 4.0, epsilon = 1e-12);
        assert_relative_eq!(x[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_singular_matrix() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_vec(vec![1.0, 1.0]);

        assert_eq!(solve_linear_system(&a, &b), Err(MathError::SingularMatrix));
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = DMatrix::<f64>::identity(3, 3);
        let b = DVector::from_vec(vec![1.0, 1.0]);

        assert!(matches!(
            solve_linear_system(&a, &b),
            Err(MathError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_max_abs() {
        assert_eq!(max_abs(&[]), 0.0);
        assert_eq!(max_abs(&[0.1, -0.3, 0.2]), 0.3);
    }
}
