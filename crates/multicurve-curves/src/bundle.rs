//! Named curve container.
//!
//! A [`CurveBundle`] maps curve names to curves. Instruments refer to curves
//! by name, so the same bundle prices every instrument in a calibration set.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{CurveError, CurveResult};
use crate::traits::Curve;

/// An immutable set of named curves.
///
/// Curves are held behind `Arc`, so cloning a bundle or sharing it across
/// threads does not copy curve data. Builder methods return a new bundle.
///
/// # Example
///
/// ```rust
/// use multicurve_curves::prelude::*;
///
/// let ois = InterpolatedCurve::flat(0.02).unwrap();
/// let libor = InterpolatedCurve::flat(0.025).unwrap();
///
/// let bundle = CurveBundle::new()
///     .with_curve("OIS", ois)
///     .with_curve("LIBOR-3M", libor);
///
/// assert_eq!(bundle.names(), vec!["LIBOR-3M", "OIS"]);
/// assert!(bundle.get_curve("EURIBOR").is_err());
/// ```
#[derive(Clone, Default)]
pub struct CurveBundle {
    curves: HashMap<String, Arc<dyn Curve>>,
}

impl std::fmt::Debug for CurveBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurveBundle")
            .field("curves", &self.names())
            .finish()
    }
}

impl CurveBundle {
    /// Creates an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bundle from named curves.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::DuplicateCurve`] if a name appears twice.
    pub fn from_curves<I, S>(curves: I) -> CurveResult<Self>
    where
        I: IntoIterator<Item = (S, Arc<dyn Curve>)>,
        S: Into<String>,
    {
        let mut map = HashMap::new();
        for (name, curve) in curves {
            let name = name.into();
            if map.contains_key(&name) {
                return Err(CurveError::duplicate_curve(name));
            }
            map.insert(name, curve);
        }
        Ok(Self { curves: map })
    }

    /// Returns a bundle with `curve` stored under `name`.
    ///
    /// An existing curve with the same name is replaced.
    #[must_use]
    pub fn with_curve<C>(self, name: impl Into<String>, curve: C) -> Self
    where
        C: Curve + 'static,
    {
        self.with_shared_curve(name, Arc::new(curve))
    }

    /// Returns a bundle with an already shared curve stored under `name`.
    #[must_use]
    pub fn with_shared_curve(mut self, name: impl Into<String>, curve: Arc<dyn Curve>) -> Self {
        self.curves.insert(name.into(), curve);
        self
    }

    /// Looks up a curve by name.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::UnknownCurve`] if no curve has that name.
    pub fn get_curve(&self, name: &str) -> CurveResult<&dyn Curve> {
        self.curves
            .get(name)
            .map(Arc::as_ref)
            .ok_or_else(|| CurveError::unknown_curve(name))
    }

    /// Looks up a curve by name, returning a shared handle.
    pub fn get_shared(&self, name: &str) -> CurveResult<Arc<dyn Curve>> {
        self.curves
            .get(name)
            .cloned()
            .ok_or_else(|| CurveError::unknown_curve(name))
    }

    /// Returns true if a curve with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.curves.contains_key(name)
    }

    /// Returns the curve names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.curves.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of curves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Returns true if the bundle holds no curves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Iterates over `(name, curve)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Curve)> {
        self.curves
            .iter()
            .map(|(name, curve)| (name.as_str(), curve.as_ref()))
    }

    /// Returns the union of two bundles.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::DuplicateCurve`] if both bundles hold a curve
    /// with the same name.
    pub fn merge(&self, other: &CurveBundle) -> CurveResult<Self> {
        let mut curves = self.curves.clone();
        for (name, curve) in &other.curves {
            if curves.contains_key(name) {
                return Err(CurveError::duplicate_curve(name.clone()));
            }
            curves.insert(name.clone(), Arc::clone(curve));
        }
        Ok(Self { curves })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InterpolatedCurve;
    use approx::assert_relative_eq;

    fn flat(rate: f64) -> InterpolatedCurve {
        InterpolatedCurve::flat(rate).unwrap()
    }

    #[test]
    fn test_lookup() {
        let bundle = CurveBundle::new().with_curve("OIS", flat(0.02));

        let curve = bundle.get_curve("OIS").unwrap();
        assert_relative_eq!(curve.zero_rate(3.0).unwrap(), 0.02, epsilon = 1e-15);
        assert_eq!(
            bundle.get_curve("SOFR").unwrap_err(),
            CurveError::unknown_curve("SOFR")
        );
    }

    #[test]
    fn test_with_curve_replaces() {
        let bundle = CurveBundle::new()
            .with_curve("OIS", flat(0.02))
            .with_curve("OIS", flat(0.03));

        assert_eq!(bundle.len(), 1);
        assert_relative_eq!(
            bundle.get_curve("OIS").unwrap().zero_rate(1.0).unwrap(),
            0.03,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_from_curves_rejects_duplicates() {
        let a: Arc<dyn Curve> = Arc::new(flat(0.01));
        let b: Arc<dyn Curve> = Arc::new(flat(0.02));

        let result = CurveBundle::from_curves(vec![("X", a.clone()), ("X", b.clone())]);
        assert!(matches!(result, Err(CurveError::DuplicateCurve { .. })));

        let bundle = CurveBundle::from_curves(vec![("X", a), ("Y", b)]).unwrap();
        assert_eq!(bundle.names(), vec!["X", "Y"]);
    }

    #[test]
    fn test_merge() {
        let left = CurveBundle::new().with_curve("OIS", flat(0.02));
        let right = CurveBundle::new().with_curve("LIBOR-3M", flat(0.025));

        let merged = left.merge(&right).unwrap();
        assert_eq!(merged.names(), vec!["LIBOR-3M", "OIS"]);
        // inputs are untouched
        assert_eq!(left.len(), 1);

        assert!(matches!(
            merged.merge(&left),
            Err(CurveError::DuplicateCurve { .. })
        ));
    }

    #[test]
    fn test_shared_handles() {
        let bundle = CurveBundle::new().with_curve("OIS", flat(0.02));
        let shared = bundle.get_shared("OIS").unwrap();
        let copy = bundle.clone();

        assert!(copy.contains("OIS"));
        assert_eq!(shared.node_count(), 1);
        assert!(!bundle.is_empty());
        assert_eq!(bundle.iter().count(), 1);
    }
}
