//! The closed set of priceable instruments.

use std::collections::BTreeSet;
use std::fmt;

use crate::annuity::{FixedCouponAnnuity, GenericAnnuity, IborAnnuity};
use crate::bond::Bond;
use crate::cash::Cash;
use crate::fra::ForwardRateAgreement;
use crate::future::InterestRateFuture;
use crate::payments::Payment;
use crate::swap::{FixedCouponSwap, FixedFloatSwap, FloatingRateNote, GenericSwap, TenorSwap};
use crate::traits::CurveDependent;

/// Names every instrument and payment type a visitor can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InstrumentKind {
    /// Cash deposit.
    Cash,
    /// Forward rate agreement.
    ForwardRateAgreement,
    /// Interest rate future.
    InterestRateFuture,
    /// Fixed coupon bond.
    Bond,
    /// Annuity of arbitrary payments.
    GenericAnnuity,
    /// Annuity of fixed coupons.
    FixedCouponAnnuity,
    /// Annuity of Ibor coupons.
    IborAnnuity,
    /// Swap of arbitrary legs.
    GenericSwap,
    /// Fixed leg against an arbitrary leg.
    FixedCouponSwap,
    /// Fixed against Ibor.
    FixedFloatSwap,
    /// Ibor against Ibor.
    TenorSwap,
    /// Floating rate note.
    FloatingRateNote,
    /// Fixed amount.
    FixedPayment,
    /// Fixed-rate coupon.
    FixedCoupon,
    /// Ibor coupon.
    IborCoupon,
    /// CMS coupon.
    CmsCoupon,
    /// Continuously averaged rate payment.
    ContinuouslyAveragedPayment,
}

impl InstrumentKind {
    /// Returns a short name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::ForwardRateAgreement => "forward rate agreement",
            Self::InterestRateFuture => "interest rate future",
            Self::Bond => "bond",
            Self::GenericAnnuity => "generic annuity",
            Self::FixedCouponAnnuity => "fixed coupon annuity",
            Self::IborAnnuity => "ibor annuity",
            Self::GenericSwap => "generic swap",
            Self::FixedCouponSwap => "fixed coupon swap",
            Self::FixedFloatSwap => "fixed/float swap",
            Self::TenorSwap => "tenor swap",
            Self::FloatingRateNote => "floating rate note",
            Self::FixedPayment => "fixed payment",
            Self::FixedCoupon => "fixed coupon",
            Self::IborCoupon => "ibor coupon",
            Self::CmsCoupon => "CMS coupon",
            Self::ContinuouslyAveragedPayment => "continuously averaged payment",
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Any priceable instrument.
#[derive(Debug, Clone, PartialEq)]
pub enum Instrument {
    /// Cash deposit.
    Cash(Cash),
    /// Forward rate agreement.
    ForwardRateAgreement(ForwardRateAgreement),
    /// Interest rate future.
    InterestRateFuture(InterestRateFuture),
    /// Fixed coupon bond.
    Bond(Bond),
    /// Annuity of arbitrary payments.
    GenericAnnuity(GenericAnnuity),
    /// Annuity of fixed coupons.
    FixedCouponAnnuity(FixedCouponAnnuity),
    /// Annuity of Ibor coupons.
    IborAnnuity(IborAnnuity),
    /// Swap of arbitrary legs.
    GenericSwap(GenericSwap),
    /// Fixed leg against an arbitrary leg.
    FixedCouponSwap(FixedCouponSwap),
    /// Fixed against Ibor.
    FixedFloatSwap(FixedFloatSwap),
    /// Ibor against Ibor.
    TenorSwap(TenorSwap),
    /// Floating rate note.
    FloatingRateNote(FloatingRateNote),
    /// A single payment.
    Payment(Payment),
}

impl CurveDependent for Instrument {
    fn collect_curve_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Self::Cash(i) => i.collect_curve_names(names),
            Self::ForwardRateAgreement(i) => i.collect_curve_names(names),
            Self::InterestRateFuture(i) => i.collect_curve_names(names),
            Self::Bond(i) => i.collect_curve_names(names),
            Self::GenericAnnuity(i) => i.collect_curve_names(names),
            Self::FixedCouponAnnuity(i) => i.collect_curve_names(names),
            Self::IborAnnuity(i) => i.collect_curve_names(names),
            Self::GenericSwap(i) => i.collect_curve_names(names),
            Self::FixedCouponSwap(i) => i.collect_curve_names(names),
            Self::FixedFloatSwap(i) => i.collect_curve_names(names),
            Self::TenorSwap(i) => i.collect_curve_names(names),
            Self::FloatingRateNote(i) => i.collect_curve_names(names),
            Self::Payment(i) => i.collect_curve_names(names),
        }
    }

    fn last_time(&self) -> f64 {
        match self {
            Self::Cash(i) => i.last_time(),
            Self::ForwardRateAgreement(i) => i.last_time(),
            Self::InterestRateFuture(i) => i.last_time(),
            Self::Bond(i) => i.last_time(),
            Self::GenericAnnuity(i) => i.last_time(),
            Self::FixedCouponAnnuity(i) => i.last_time(),
            Self::IborAnnuity(i) => i.last_time(),
            Self::GenericSwap(i) => i.last_time(),
            Self::FixedCouponSwap(i) => i.last_time(),
            Self::FixedFloatSwap(i) => i.last_time(),
            Self::TenorSwap(i) => i.last_time(),
            Self::FloatingRateNote(i) => i.last_time(),
            Self::Payment(i) => i.last_time(),
        }
    }
}

macro_rules! impl_from_instrument {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Instrument {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_from_instrument! {
    Cash => Cash,
    ForwardRateAgreement => ForwardRateAgreement,
    InterestRateFuture => InterestRateFuture,
    Bond => Bond,
    GenericAnnuity => GenericAnnuity,
    FixedCouponAnnuity => FixedCouponAnnuity,
    IborAnnuity => IborAnnuity,
    GenericSwap => GenericSwap,
    FixedCouponSwap => FixedCouponSwap,
    FixedFloatSwap => FixedFloatSwap,
    TenorSwap => TenorSwap,
    FloatingRateNote => FloatingRateNote,
    Payment => Payment,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visitor::Visitable;

    #[test]
    fn test_instrument_curve_names() {
        let swap = FixedFloatSwap::from_schedules(
            0.0,
            &[1.0],
            &[1.0],
            &[0.5, 1.0],
            &[0.5, 0.5],
            1.0,
            0.03,
            "OIS",
            "LIBOR-6M",
        )
        .unwrap();
        let instrument = Instrument::from(swap);

        assert_eq!(instrument.kind(), InstrumentKind::FixedFloatSwap);
        assert_eq!(instrument.curve_names(), vec!["LIBOR-6M", "OIS"]);
        assert_eq!(instrument.last_time(), 1.0);
    }

    #[test]
    fn test_kind_display() {
        let cash = Instrument::from(Cash::new(1.0, 0.0, 0.5, 0.5, 0.02, "OIS").unwrap());
        assert_eq!(cash.kind().to_string(), "cash");
        assert_eq!(InstrumentKind::CmsCoupon.to_string(), "CMS coupon");
    }
}
