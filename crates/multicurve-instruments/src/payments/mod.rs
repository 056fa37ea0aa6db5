//! Single-payment building blocks.
//!
//! Every leg of every composite instrument is a sequence of these.
//!
//! - [`PaymentFixed`]: a known amount
//! - [`CouponFixed`]: fixed-rate accrual
//! - [`CouponIbor`]: forward-rate accrual plus spread
//! - [`CouponCms`]: swap-rate accrual
//! - [`ContinuouslyAveragedPayment`]: averaged short-rate accrual plus spread

mod continuously_averaged;
mod coupon_cms;
mod coupon_fixed;
mod coupon_ibor;
mod fixed;

use std::collections::BTreeSet;

pub use continuously_averaged::ContinuouslyAveragedPayment;
pub use coupon_cms::CouponCms;
pub use coupon_fixed::CouponFixed;
pub use coupon_ibor::CouponIbor;
pub use fixed::PaymentFixed;

use crate::traits::CurveDependent;

/// Any single payment.
#[derive(Debug, Clone, PartialEq)]
pub enum Payment {
    /// Known amount.
    Fixed(PaymentFixed),
    /// Fixed-rate coupon.
    FixedCoupon(CouponFixed),
    /// Ibor coupon.
    Ibor(CouponIbor),
    /// CMS coupon.
    Cms(CouponCms),
    /// Continuously averaged rate payment.
    ContinuouslyAveraged(ContinuouslyAveragedPayment),
}

impl Payment {
    /// Returns the payment time.
    #[must_use]
    pub fn payment_time(&self) -> f64 {
        match self {
            Self::Fixed(p) => p.payment_time(),
            Self::FixedCoupon(p) => p.payment_time(),
            Self::Ibor(p) => p.payment_time(),
            Self::Cms(p) => p.payment_time(),
            Self::ContinuouslyAveraged(p) => p.payment_time(),
        }
    }

    /// Returns the discounting curve name.
    #[must_use]
    pub fn funding_curve(&self) -> &str {
        match self {
            Self::Fixed(p) => p.funding_curve(),
            Self::FixedCoupon(p) => p.funding_curve(),
            Self::Ibor(p) => p.funding_curve(),
            Self::Cms(p) => p.funding_curve(),
            Self::ContinuouslyAveraged(p) => p.funding_curve(),
        }
    }
}

impl CurveDependent for Payment {
    fn collect_curve_names<'a>(&'a self, names: &mut BTreeSet<&'a str>) {
        match self {
            Self::Fixed(p) => p.collect_curve_names(names),
            Self::FixedCoupon(p) => p.collect_curve_names(names),
            Self::Ibor(p) => p.collect_curve_names(names),
            Self::Cms(p) => p.collect_curve_names(names),
            Self::ContinuouslyAveraged(p) => p.collect_curve_names(names),
        }
    }

    fn last_time(&self) -> f64 {
        match self {
            Self::Fixed(p) => p.last_time(),
            Self::FixedCoupon(p) => p.last_time(),
            Self::Ibor(p) => p.last_time(),
            Self::Cms(p) => p.last_time(),
            Self::ContinuouslyAveraged(p) => p.last_time(),
        }
    }
}

impl From<PaymentFixed> for Payment {
    fn from(p: PaymentFixed) -> Self {
        Self::Fixed(p)
    }
}

impl From<CouponFixed> for Payment {
    fn from(p: CouponFixed) -> Self {
        Self::FixedCoupon(p)
    }
}

impl From<CouponIbor> for Payment {
    fn from(p: CouponIbor) -> Self {
        Self::Ibor(p)
    }
}

impl From<CouponCms> for Payment {
    fn from(p: CouponCms) -> Self {
        Self::Cms(p)
    }
}

impl From<ContinuouslyAveragedPayment> for Payment {
    fn from(p: ContinuouslyAveragedPayment) -> Self {
        Self::ContinuouslyAveraged(p)
    }
}
