//! Forward and averaged rates shared by the calculators.
//!
//! Each rate comes with its derivative with respect to the discount factors
//! it reads, scaled by the caller's outer derivative.

use multicurve_curves::CurveBundle;

use crate::error::PricingResult;
use crate::sensitivity::CurveSensitivities;

/// Simply compounded forward `(P(start) / P(end) - 1) / tau`.
pub(crate) fn forward(
    curves: &CurveBundle,
    curve: &str,
    start: f64,
    end: f64,
    tau: f64,
) -> PricingResult<f64> {
    let c = curves.get_curve(curve)?;
    let ps = c.discount_factor(start)?;
    let pe = c.discount_factor(end)?;
    Ok((ps / pe - 1.0) / tau)
}

/// `scale · ∂F/∂P` for the forward above.
pub(crate) fn forward_sensitivities(
    curves: &CurveBundle,
    curve: &str,
    start: f64,
    end: f64,
    tau: f64,
    scale: f64,
) -> PricingResult<CurveSensitivities> {
    let c = curves.get_curve(curve)?;
    let ps = c.discount_factor(start)?;
    let pe = c.discount_factor(end)?;

    let mut sens = CurveSensitivities::new();
    sens.add(curve, start, scale / (tau * pe));
    sens.add(curve, end, -scale * ps / (tau * pe * pe));
    Ok(sens)
}

/// Averaged continuously compounded rate `ln(P(start) / P(end)) / tau`.
pub(crate) fn averaged_rate(
    curves: &CurveBundle,
    curve: &str,
    start: f64,
    end: f64,
    tau: f64,
) -> PricingResult<f64> {
    let c = curves.get_curve(curve)?;
    let ps = c.discount_factor(start)?;
    let pe = c.discount_factor(end)?;
    Ok((ps / pe).ln() / tau)
}

/// `scale · ∂R/∂P` for the averaged rate above.
pub(crate) fn averaged_rate_sensitivities(
    curves: &CurveBundle,
    curve: &str,
    start: f64,
    end: f64,
    tau: f64,
    scale: f64,
) -> PricingResult<CurveSensitivities> {
    let c = curves.get_curve(curve)?;
    let ps = c.discount_factor(start)?;
    let pe = c.discount_factor(end)?;

    let mut sens = CurveSensitivities::new();
    sens.add(curve, start, scale / (tau * ps));
    sens.add(curve, end, -scale / (tau * pe));
    Ok(sens)
}

/// Discount factor on a named curve.
pub(crate) fn discount(curves: &CurveBundle, curve: &str, t: f64) -> PricingResult<f64> {
    Ok(curves.get_curve(curve)?.discount_factor(t)?)
}
