//! Fixed cash amount.

use std::collections::BTreeSet;

use crate::error::InstrumentResult;
use crate::traits::CurveDependent;
use crate::validation::Checks;

/// A known amount paid at a single time.
///
/// Amounts are signed: a negative amount is a payment received by the
/// counterparty.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentFixed {
    payment_time: f64,
    amount: f64,
    funding_curve: String,
}

impl PaymentFixed {
    /// Creates a fixed payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the time is negative, the amount is not finite,
    /// or the curve name is empty.
    pub fn new(
        payment_time: f64,
        amount: f64,
        funding_curve: impl Into<String>,
    ) -> InstrumentResult<Self> {
        let funding_curve = funding_curve.into();
        let checks = Checks::new("PaymentFixed");
        checks.time("payment_time", payment_time)?;
        checks.finite("amount", amount)?;
        checks.curve("funding_curve", &funding_curve)?;

        Ok(Self {
            payment_time,
            amount,
            funding_curve,
        })
    }

    /// Returns the payment time.
    #[must_use]
    pub fn payment_time(&self) -> f64 {
        self.payment_time
    }

    /// Returns the signed amount.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Returns the discounting curve name.
    #[must_use]
    pub fn funding_curve(&self) -> &str {
        &self.funding_curve
    }
}

impl CurveDependent for PaymentFixed {
    fn collect_curve_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        names.insert(&self.funding_curve);
    }

    fn last_time(&self) -> f64 {
        self.payment_time
    }
}
