//! Double dispatch over the instrument model.
//!
//! A calculator implements [`InstrumentVisitor`] once per operation (present
//! value, par rate, sensitivities, ...). Every instrument and payment type
//! implements [`Visitable`], so `instrument.accept(&calculator, &curves)`
//! lands on the method for its concrete type. Composites call `accept` on
//! their parts with the same visitor.
//!
//! The trait has no default methods: adding an instrument type forces every
//! calculator to decide what to do with it.

use crate::annuity::{FixedCouponAnnuity, GenericAnnuity, IborAnnuity};
use crate::bond::Bond;
use crate::cash::Cash;
use crate::fra::ForwardRateAgreement;
use crate::future::InterestRateFuture;
use crate::instrument::{Instrument, InstrumentKind};
use crate::payments::{
    ContinuouslyAveragedPayment, CouponCms, CouponFixed, CouponIbor, Payment, PaymentFixed,
};
use crate::swap::{FixedCouponSwap, FixedFloatSwap, FloatingRateNote, GenericSwap, TenorSwap};

/// One operation over every instrument type.
///
/// `D` is the data the operation reads (typically a curve bundle).
pub trait InstrumentVisitor<D: ?Sized> {
    /// Result of the operation.
    type Output;
    /// Failure of the operation.
    type Error;

    /// Visits a cash deposit.
    fn visit_cash(&self, cash: &Cash, data: &D) -> Result<Self::Output, Self::Error>;

    /// Visits an FRA.
    fn visit_forward_rate_agreement(
        &self,
        fra: &ForwardRateAgreement,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;

    /// Visits an interest rate future.
    fn visit_interest_rate_future(
        &self,
        future: &InterestRateFuture,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;

    /// Visits a bond.
    fn visit_bond(&self, bond: &Bond, data: &D) -> Result<Self::Output, Self::Error>;

    /// Visits an annuity of arbitrary payments.
    fn visit_generic_annuity(
        &self,
        annuity: &GenericAnnuity,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;

    /// Visits a fixed coupon annuity.
    fn visit_fixed_coupon_annuity(
        &self,
        annuity: &FixedCouponAnnuity,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;

    /// Visits an Ibor annuity.
    fn visit_ibor_annuity(
        &self,
        annuity: &IborAnnuity,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;

    /// Visits a swap of arbitrary legs.
    fn visit_generic_swap(&self, swap: &GenericSwap, data: &D)
        -> Result<Self::Output, Self::Error>;

    /// Visits a fixed coupon swap.
    fn visit_fixed_coupon_swap(
        &self,
        swap: &FixedCouponSwap,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;

    /// Visits a fixed/float swap.
    fn visit_fixed_float_swap(
        &self,
        swap: &FixedFloatSwap,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;

    /// Visits a tenor swap.
    fn visit_tenor_swap(&self, swap: &TenorSwap, data: &D) -> Result<Self::Output, Self::Error>;

    /// Visits a floating rate note.
    fn visit_floating_rate_note(
        &self,
        frn: &FloatingRateNote,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;

    /// Visits a fixed payment.
    fn visit_fixed_payment(
        &self,
        payment: &PaymentFixed,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;

    /// Visits a fixed coupon.
    fn visit_fixed_coupon(
        &self,
        coupon: &CouponFixed,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;

    /// Visits an Ibor coupon.
    fn visit_ibor_coupon(&self, coupon: &CouponIbor, data: &D)
        -> Result<Self::Output, Self::Error>;

    /// Visits a CMS coupon.
    fn visit_cms_coupon(&self, coupon: &CouponCms, data: &D) -> Result<Self::Output, Self::Error>;

    /// Visits a continuously averaged payment.
    fn visit_continuously_averaged_payment(
        &self,
        payment: &ContinuouslyAveragedPayment,
        data: &D,
    ) -> Result<Self::Output, Self::Error>;
}

/// A type an [`InstrumentVisitor`] can be dispatched on.
pub trait Visitable {
    /// Calls the visitor method for this type.
    fn accept<V, D>(&self, visitor: &V, data: &D) -> Result<V::Output, V::Error>
    where
        V: InstrumentVisitor<D> + ?Sized,
        D: ?Sized;

    /// Returns the concrete type tag.
    fn kind(&self) -> InstrumentKind;
}

macro_rules! impl_visitable {
    ($($ty:ty => $method:ident, $kind:ident;)*) => {
        $(
            impl Visitable for $ty {
                fn accept<V, D>(&self, visitor: &V, data: &D) -> Result<V::Output, V::Error>
                where
                    V: InstrumentVisitor<D> + ?Sized,
                    D: ?Sized,
                {
                    visitor.$method(self, data)
                }

                fn kind(&self) -> InstrumentKind {
                    InstrumentKind::$kind
                }
            }
        )*
    };
}

impl_visitable! {
    Cash => visit_cash, Cash;
    ForwardRateAgreement => visit_forward_rate_agreement, ForwardRateAgreement;
    InterestRateFuture => visit_interest_rate_future, InterestRateFuture;
    Bond => visit_bond, Bond;
    GenericAnnuity => visit_generic_annuity, GenericAnnuity;
    FixedCouponAnnuity => visit_fixed_coupon_annuity, FixedCouponAnnuity;
    IborAnnuity => visit_ibor_annuity, IborAnnuity;
    GenericSwap => visit_generic_swap, GenericSwap;
    FixedCouponSwap => visit_fixed_coupon_swap, FixedCouponSwap;
    FixedFloatSwap => visit_fixed_float_swap, FixedFloatSwap;
    TenorSwap => visit_tenor_swap, TenorSwap;
    FloatingRateNote => visit_floating_rate_note, FloatingRateNote;
    PaymentFixed => visit_fixed_payment, FixedPayment;
    CouponFixed => visit_fixed_coupon, FixedCoupon;
    CouponIbor => visit_ibor_coupon, IborCoupon;
    CouponCms => visit_cms_coupon, CmsCoupon;
    ContinuouslyAveragedPayment => visit_continuously_averaged_payment, ContinuouslyAveragedPayment;
}

impl Visitable for Payment {
    fn accept<V, D>(&self, visitor: &V, data: &D) -> Result<V::Output, V::Error>
    where
        V: InstrumentVisitor<D> + ?Sized,
        D: ?Sized,
    {
        match self {
            Self::Fixed(p) => p.accept(visitor, data),
            Self::FixedCoupon(p) => p.accept(visitor, data),
            Self::Ibor(p) => p.accept(visitor, data),
            Self::Cms(p) => p.accept(visitor, data),
            Self::ContinuouslyAveraged(p) => p.accept(visitor, data),
        }
    }

    fn kind(&self) -> InstrumentKind {
        match self {
            Self::Fixed(p) => p.kind(),
            Self::FixedCoupon(p) => p.kind(),
            Self::Ibor(p) => p.kind(),
            Self::Cms(p) => p.kind(),
            Self::ContinuouslyAveraged(p) => p.kind(),
        }
    }
}

impl Visitable for Instrument {
    fn accept<V, D>(&self, visitor: &V, data: &D) -> Result<V::Output, V::Error>
    where
        V: InstrumentVisitor<D> + ?Sized,
        D: ?Sized,
    {
        match self {
            Self::Cash(i) => i.accept(visitor, data),
            Self::ForwardRateAgreement(i) => i.accept(visitor, data),
            Self::InterestRateFuture(i) => i.accept(visitor, data),
            Self::Bond(i) => i.accept(visitor, data),
            Self::GenericAnnuity(i) => i.accept(visitor, data),
            Self::FixedCouponAnnuity(i) => i.accept(visitor, data),
            Self::IborAnnuity(i) => i.accept(visitor, data),
            Self::GenericSwap(i) => i.accept(visitor, data),
            Self::FixedCouponSwap(i) => i.accept(visitor, data),
            Self::FixedFloatSwap(i) => i.accept(visitor, data),
            Self::TenorSwap(i) => i.accept(visitor, data),
            Self::FloatingRateNote(i) => i.accept(visitor, data),
            Self::Payment(i) => i.accept(visitor, data),
        }
    }

    fn kind(&self) -> InstrumentKind {
        match self {
            Self::Cash(i) => i.kind(),
            Self::ForwardRateAgreement(i) => i.kind(),
            Self::InterestRateFuture(i) => i.kind(),
            Self::Bond(i) => i.kind(),
            Self::GenericAnnuity(i) => i.kind(),
            Self::FixedCouponAnnuity(i) => i.kind(),
            Self::IborAnnuity(i) => i.kind(),
            Self::GenericSwap(i) => i.kind(),
            Self::FixedCouponSwap(i) => i.kind(),
            Self::FixedFloatSwap(i) => i.kind(),
            Self::TenorSwap(i) => i.kind(),
            Self::FloatingRateNote(i) => i.kind(),
            Self::Payment(i) => i.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts leaf payments, recursing through composites.
    struct PaymentCounter;

    type Count = Result<usize, ()>;

    impl PaymentCounter {
        fn legs<P: Visitable, R: Visitable>(
            &self,
            pay: &crate::annuity::Annuity<P>,
            receive: &crate::annuity::Annuity<R>,
        ) -> Count {
            Ok(self.annuity(pay)? + self.annuity(receive)?)
        }

        fn annuity<P: Visitable>(&self, annuity: &crate::annuity::Annuity<P>) -> Count {
            annuity.iter().map(|p| p.accept(self, &())).sum()
        }
    }

    impl InstrumentVisitor<()> for PaymentCounter {
        type Output = usize;
        type Error = ();

        fn visit_cash(&self, _: &Cash, _: &()) -> Count {
            Ok(2)
        }
        fn visit_forward_rate_agreement(&self, _: &ForwardRateAgreement, _: &()) -> Count {
            Ok(1)
        }
        fn visit_interest_rate_future(&self, _: &InterestRateFuture, _: &()) -> Count {
            Err(())
        }
        fn visit_bond(&self, bond: &Bond, data: &()) -> Count {
            Ok(self.annuity(bond.coupons())? + bond.principal().accept(self, data)?)
        }
        fn visit_generic_annuity(&self, a: &GenericAnnuity, _: &()) -> Count {
            self.annuity(a)
        }
        fn visit_fixed_coupon_annuity(&self, a: &FixedCouponAnnuity, _: &()) -> Count {
            self.annuity(a)
        }
        fn visit_ibor_annuity(&self, a: &IborAnnuity, _: &()) -> Count {
            self.annuity(a)
        }
        fn visit_generic_swap(&self, s: &GenericSwap, _: &()) -> Count {
            self.legs(s.pay_leg(), s.receive_leg())
        }
        fn visit_fixed_coupon_swap(&self, s: &FixedCouponSwap, _: &()) -> Count {
            self.legs(s.pay_leg(), s.receive_leg())
        }
        fn visit_fixed_float_swap(&self, s: &FixedFloatSwap, _: &()) -> Count {
            self.legs(s.pay_leg(), s.receive_leg())
        }
        fn visit_tenor_swap(&self, s: &TenorSwap, _: &()) -> Count {
            self.legs(s.pay_leg(), s.receive_leg())
        }
        fn visit_floating_rate_note(&self, s: &FloatingRateNote, _: &()) -> Count {
            self.legs(s.pay_leg(), s.receive_leg())
        }
        fn visit_fixed_payment(&self, _: &PaymentFixed, _: &()) -> Count {
            Ok(1)
        }
        fn visit_fixed_coupon(&self, _: &CouponFixed, _: &()) -> Count {
            Ok(1)
        }
        fn visit_ibor_coupon(&self, _: &CouponIbor, _: &()) -> Count {
            Ok(1)
        }
        fn visit_cms_coupon(&self, _: &CouponCms, _: &()) -> Count {
            Ok(1)
        }
        fn visit_continuously_averaged_payment(
            &self,
            _: &ContinuouslyAveragedPayment,
            _: &(),
        ) -> Count {
            Ok(1)
        }
    }

    #[test]
    fn test_dispatch_reaches_concrete_type() {
        let bond: Instrument = Bond::from_schedule(&[1.0, 2.0], &[1.0, 1.0], 0.04, "GOVT")
            .unwrap()
            .into();
        assert_eq!(bond.accept(&PaymentCounter, &()), Ok(3));
        assert_eq!(bond.kind(), InstrumentKind::Bond);

        let cash: Instrument = Cash::new(1.0, 0.0, 1.0, 1.0, 0.02, "OIS").unwrap().into();
        assert_eq!(cash.accept(&PaymentCounter, &()), Ok(2));
    }

    #[test]
    fn test_composites_recurse() {
        let swap = FixedFloatSwap::from_schedules(
            0.0,
            &[1.0, 2.0],
            &[1.0, 1.0],
            &[0.5, 1.0, 1.5, 2.0],
            &[0.5; 4],
            1.0,
            0.03,
            "OIS",
            "LIBOR-6M",
        )
        .unwrap();
        assert_eq!(swap.accept(&PaymentCounter, &()), Ok(6));

        let generic: Instrument = Instrument::FixedCouponSwap(swap.to_fixed_coupon_swap());
        assert_eq!(generic.accept(&PaymentCounter, &()), Ok(6));
    }

    #[test]
    fn test_errors_propagate() {
        let future: Instrument = InterestRateFuture::new(0.5, 0.5, 0.75, 0.25, 0.25, 0.97, 1.0, "L")
            .unwrap()
            .into();
        assert_eq!(future.accept(&PaymentCounter, &()), Err(()));
        assert_eq!(future.kind(), InstrumentKind::InterestRateFuture);
    }

    #[test]
    fn test_payment_kinds() {
        let p: Payment = PaymentFixed::new(1.0, 1.0, "OIS").unwrap().into();
        assert_eq!(p.kind(), InstrumentKind::FixedPayment);
        assert_eq!(p.accept(&PaymentCounter, &()), Ok(1));
    }
}
