//! Core traits for yield curve operations.
//!
//! This module defines the [`Curve`] trait shared by every curve in a
//! [`CurveBundle`](crate::CurveBundle). Besides discount factors and rates, a
//! curve exposes its node values and the analytic derivative of each discount
//! factor with respect to them, which is what calibration differentiates
//! through.

use std::fmt::Debug;

use crate::error::{CurveError, CurveResult};

/// The core trait for yield curves.
///
/// Time is measured in year fractions from the valuation point. Negative
/// times are rejected with [`CurveError::Domain`].
///
/// # Required Methods
///
/// - [`discount_factor`](Curve::discount_factor)
/// - [`zero_rate`](Curve::zero_rate)
/// - [`node_times`](Curve::node_times) / [`node_values`](Curve::node_values)
/// - [`node_sensitivities`](Curve::node_sensitivities)
///
/// # Derived Methods
///
/// - [`forward_rate`](Curve::forward_rate): simply compounded forward between
///   two times
/// - [`node_count`](Curve::node_count)
///
/// # Example
///
/// ```rust
/// use multicurve_curves::prelude::*;
///
/// fn price_zero_coupon<C: Curve + ?Sized>(curve: &C, t: f64, notional: f64) -> CurveResult<f64> {
///     Ok(notional * curve.discount_factor(t)?)
/// }
///
/// let curve = InterpolatedCurve::flat(0.03).unwrap();
/// let pv = price_zero_coupon(&curve, 2.0, 100.0).unwrap();
/// assert!((pv - 100.0 * (-0.06_f64).exp()).abs() < 1e-12);
/// ```
pub trait Curve: Send + Sync + Debug {
    /// Returns the discount factor to time `t`.
    ///
    /// `discount_factor(0.0)` is exactly 1.
    fn discount_factor(&self, t: f64) -> CurveResult<f64>;

    /// Returns the continuously compounded zero rate at time `t`.
    fn zero_rate(&self, t: f64) -> CurveResult<f64>;

    /// Returns the simply compounded forward rate between `t1` and `t2`.
    ///
    /// `F(t1, t2) = (DF(t1) / DF(t2) - 1) / (t2 - t1)`
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::Domain`] unless `t2 > t1`.
    fn forward_rate(&self, t1: f64, t2: f64) -> CurveResult<f64> {
        if t2 <= t1 {
            return Err(CurveError::domain(format!(
                "forward period [{t1}, {t2}] is empty"
            )));
        }

        let df1 = self.discount_factor(t1)?;
        let df2 = self.discount_factor(t2)?;
        Ok((df1 / df2 - 1.0) / (t2 - t1))
    }

    /// Returns the node times, strictly increasing.
    fn node_times(&self) -> &[f64];

    /// Returns the node values (continuously compounded zero rates).
    fn node_values(&self) -> &[f64];

    /// Returns the number of nodes.
    fn node_count(&self) -> usize {
        self.node_times().len()
    }

    /// Returns `∂DF(t)/∂node_j` for each node that influences `DF(t)`.
    ///
    /// The result is sparse: nodes with zero influence may be omitted, and
    /// indices are in increasing order.
    fn node_sensitivities(&self, t: f64) -> CurveResult<Vec<(usize, f64)>>;
}
