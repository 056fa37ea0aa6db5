//! Forward rate agreement.

use std::collections::BTreeSet;

use crate::error::InstrumentResult;
use crate::traits::CurveDependent;
use crate::validation::Checks;

/// A forward rate agreement settled at the start of its fixing period.
///
/// The settlement amount is the discounted difference between the forward
/// and the agreed rate:
///
/// ```text
/// N · τ · (F - K) / (1 + τ_fix · F)
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardRateAgreement {
    settlement_time: f64,
    funding_curve: String,
    payment_year_fraction: f64,
    notional: f64,
    fixing_time: f64,
    fixing_period_start: f64,
    fixing_period_end: f64,
    fixing_year_fraction: f64,
    rate: f64,
    forward_curve: String,
}

impl ForwardRateAgreement {
    /// Creates an FRA.
    ///
    /// # Errors
    ///
    /// Returns an error if a time is negative, the fixing times are out of
    /// order, the fixing year fraction is not positive, or a curve name is
    /// empty.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settlement_time: f64,
        funding_curve: impl Into<String>,
        payment_year_fraction: f64,
        notional: f64,
        fixing_time: f64,
        fixing_period_start: f64,
        fixing_period_end: f64,
        fixing_year_fraction: f64,
        rate: f64,
        forward_curve: impl Into<String>,
    ) -> InstrumentResult<Self> {
        let funding_curve = funding_curve.into();
        let forward_curve = forward_curve.into();
        let checks = Checks::new("ForwardRateAgreement");
        checks.time("settlement_time", settlement_time)?;
        checks.curve("funding_curve", &funding_curve)?;
        checks.non_negative("payment_year_fraction", payment_year_fraction)?;
        checks.finite("notional", notional)?;
        checks.time("fixing_time", fixing_time)?;
        checks.time("fixing_period_start", fixing_period_start)?;
        checks.time("fixing_period_end", fixing_period_end)?;
        checks.ordered(
            ("fixing_time", fixing_time),
            ("fixing_period_start", fixing_period_start),
        )?;
        checks.ordered(
            ("fixing_period_start", fixing_period_start),
            ("fixing_period_end", fixing_period_end),
        )?;
        checks.positive("fixing_year_fraction", fixing_year_fraction)?;
        checks.finite("rate", rate)?;
        checks.curve("forward_curve", &forward_curve)?;

        Ok(Self {
            settlement_time,
            funding_curve,
            payment_year_fraction,
            notional,
            fixing_time,
            fixing_period_start,
            fixing_period_end,
            fixing_year_fraction,
            rate,
            forward_curve,
        })
    }

    /// Creates a standard FRA fixing and settling at `start`.
    ///
    /// `year_fraction` serves as both payment and fixing accrual factor.
    pub fn standard(
        start: f64,
        end: f64,
        year_fraction: f64,
        notional: f64,
        rate: f64,
        funding_curve: impl Into<String>,
        forward_curve: impl Into<String>,
    ) -> InstrumentResult<Self> {
        Self::new(
            start,
            funding_curve,
            year_fraction,
            notional,
            start,
            start,
            end,
            year_fraction,
            rate,
            forward_curve,
        )
    }

    /// Returns the settlement (payment) time.
    #[must_use]
    pub fn settlement_time(&self) -> f64 {
        self.settlement_time
    }

    /// Returns the discounting curve name.
    #[must_use]
    pub fn funding_curve(&self) -> &str {
        &self.funding_curve
    }

    /// Returns the accrual factor of the settlement amount.
    #[must_use]
    pub fn payment_year_fraction(&self) -> f64 {
        self.payment_year_fraction
    }

    /// Returns the notional.
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Returns the fixing time.
    #[must_use]
    pub fn fixing_time(&self) -> f64 {
        self.fixing_time
    }

    /// Returns the start of the fixing period.
    #[must_use]
    pub fn fixing_period_start(&self) -> f64 {
        self.fixing_period_start
    }

    /// Returns the end of the fixing period.
    #[must_use]
    pub fn fixing_period_end(&self) -> f64 {
        self.fixing_period_end
    }

    /// Returns the accrual factor of the fixing period.
    #[must_use]
    pub fn fixing_year_fraction(&self) -> f64 {
        self.fixing_year_fraction
    }

    /// Returns the agreed rate.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Returns the forward (projection) curve name.
    #[must_use]
    pub fn forward_curve(&self) -> &str {
        &self.forward_curve
    }
}

impl CurveDependent for ForwardRateAgreement {
    fn collect_curve_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        names.insert(&self.funding_curve);
        names.insert(&self.forward_curve);
    }

    fn last_time(&self) -> f64 {
        self.settlement_time.max(self.fixing_period_end)
    }
}
