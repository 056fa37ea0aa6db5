//! Traits shared by every instrument and payment.

use std::collections::BTreeSet;

/// Curve references and time extent of an instrument.
pub trait CurveDependent {
    /// Adds the name of every curve the instrument reads to `names`.
    fn collect_curve_names<'a>(&'a self, names: &mut BTreeSet<&'a str>);

    /// Returns the latest time the instrument depends on.
    fn last_time(&self) -> f64;

    /// Returns the referenced curve names, sorted and without duplicates.
    fn curve_names(&self) -> Vec<&str> {
        let mut names = BTreeSet::new();
        self.collect_curve_names(&mut names);
        names.into_iter().collect()
    }
}
