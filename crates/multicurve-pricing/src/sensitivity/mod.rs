//! Curve sensitivities.
//!
//! A [`CurveSensitivities`] lists, per curve, the derivative of a quantity
//! (present value or par rate) with respect to the discount factor at each
//! time the instrument reads:
//!
//! ```text
//! "USD-OIS"   -> [(0.5, ∂Q/∂P(0.5)), (1.0, ∂Q/∂P(1.0)), ...]
//! "LIBOR-3M"  -> [(0.25, ∂Q/∂P(0.25)), ...]
//! ```
//!
//! Times may repeat; entries are summed by whoever consumes them. The
//! calibration Jacobian chains these through
//! [`Curve::node_sensitivities`](multicurve_curves::Curve::node_sensitivities).

mod par_rate;
mod present_value;

use std::collections::BTreeMap;

pub use par_rate::ParRateSensitivityCalculator;
pub use present_value::PresentValueSensitivityCalculator;

/// Per-curve lists of `(time, ∂Q/∂DF(time))`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveSensitivities {
    entries: BTreeMap<String, Vec<(f64, f64)>>,
}

impl CurveSensitivities {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set with one entry.
    #[must_use]
    pub fn single(curve: &str, time: f64, value: f64) -> Self {
        let mut s = Self::new();
        s.add(curve, time, value);
        s
    }

    /// Appends `(time, value)` to the list for `curve`.
    pub fn add(&mut self, curve: &str, time: f64, value: f64) {
        self.entries
            .entry(curve.to_string())
            .or_default()
            .push((time, value));
    }

    /// Returns the union of both sets, concatenating per-curve lists.
    #[must_use]
    pub fn plus(mut self, other: CurveSensitivities) -> Self {
        for (curve, list) in other.entries {
            self.entries.entry(curve).or_default().extend(list);
        }
        self
    }

    /// Returns the set with every value multiplied by `factor`.
    #[must_use]
    pub fn scaled(mut self, factor: f64) -> Self {
        for list in self.entries.values_mut() {
            for (_, value) in list.iter_mut() {
                *value *= factor;
            }
        }
        self
    }

    /// Returns the entries for one curve.
    #[must_use]
    pub fn get(&self, curve: &str) -> Option<&[(f64, f64)]> {
        self.entries.get(curve).map(Vec::as_slice)
    }

    /// Returns the curve names with entries, sorted.
    #[must_use]
    pub fn curve_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Iterates over `(curve, entries)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[(f64, f64)])> {
        self.entries
            .iter()
            .map(|(name, list)| (name.as_str(), list.as_slice()))
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.values().all(Vec::is_empty)
    }

    /// Returns the sum of all values for one curve.
    #[must_use]
    pub fn total(&self, curve: &str) -> f64 {
        self.get(curve)
            .map_or(0.0, |list| list.iter().map(|(_, v)| v).sum())
    }
}

impl std::ops::Add for CurveSensitivities {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        self.plus(other)
    }
}

#[cfg(test)]
pub(crate) mod test_support;
