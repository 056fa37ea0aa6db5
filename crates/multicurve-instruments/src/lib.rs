//! # Multicurve Instruments
//!
//! The closed set of interest rate instruments priced and calibrated by the
//! Multicurve library, and the visitor contract calculators implement.
//!
//! ## Model
//!
//! - **Payments** ([`payments`]): fixed amounts, fixed and Ibor coupons, CMS
//!   coupons and continuously averaged payments
//! - **Annuities** ([`Annuity`]): ordered, non-empty payment sequences
//! - **Swaps** ([`Swap`]): a paid and a received annuity, valued as
//!   `PV(receive) - PV(pay)`
//! - **Market instruments**: [`Cash`], [`ForwardRateAgreement`],
//!   [`InterestRateFuture`], [`Bond`]
//!
//! All times are year fractions from the valuation date. Instruments are
//! immutable; constructors validate their invariants and return
//! [`InstrumentError::InvalidInstrument`] on violation.
//!
//! ## Dispatch
//!
//! [`Instrument`] wraps every type. Calculators implement
//! [`InstrumentVisitor`] and are applied with [`Visitable::accept`]:
//!
//! ```rust
//! use multicurve_instruments::prelude::*;
//!
//! let cash = Cash::new(1.0, 0.0, 0.5, 0.5, 0.02, "USD-OIS").unwrap();
//! let instrument = Instrument::from(cash);
//!
//! assert_eq!(instrument.kind(), InstrumentKind::Cash);
//! assert_eq!(instrument.curve_names(), vec!["USD-OIS"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)]

pub mod annuity;
pub mod bond;
pub mod cash;
pub mod error;
pub mod fra;
pub mod future;
pub mod instrument;
pub mod payments;
pub mod swap;
pub mod traits;
mod validation;
pub mod visitor;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::annuity::{Annuity, FixedCouponAnnuity, GenericAnnuity, IborAnnuity};
    pub use crate::bond::Bond;
    pub use crate::cash::Cash;
    pub use crate::error::{InstrumentError, InstrumentResult};
    pub use crate::fra::ForwardRateAgreement;
    pub use crate::future::InterestRateFuture;
    pub use crate::instrument::{Instrument, InstrumentKind};
    pub use crate::payments::{
        ContinuouslyAveragedPayment, CouponCms, CouponFixed, CouponIbor, Payment, PaymentFixed,
    };
    pub use crate::swap::{
        FixedCouponSwap, FixedFloatSwap, FloatingRateNote, GenericSwap, Swap, TenorSwap,
    };
    pub use crate::traits::CurveDependent;
    pub use crate::visitor::{InstrumentVisitor, Visitable};
}

pub use annuity::{Annuity, FixedCouponAnnuity, GenericAnnuity, IborAnnuity};
pub use bond::Bond;
pub use cash::Cash;
pub use error::{InstrumentError, InstrumentResult};
pub use fra::ForwardRateAgreement;
pub use future::InterestRateFuture;
pub use instrument::{Instrument, InstrumentKind};
pub use payments::{
    ContinuouslyAveragedPayment, CouponCms, CouponFixed, CouponIbor, Payment, PaymentFixed,
};
pub use swap::{FixedCouponSwap, FixedFloatSwap, FloatingRateNote, GenericSwap, Swap, TenorSwap};
pub use traits::CurveDependent;
pub use visitor::{InstrumentVisitor, Visitable};
