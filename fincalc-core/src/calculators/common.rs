//! Shared helpers for the guarded formula evaluators.
//!
//! All monetary math is [`Decimal`]; the overflow guards the calculators
//! need are expressed as `checked_*` operations returning `None`, which the
//! evaluators surface as a generic calculation error.

use rust_decimal::{Decimal, MathematicalOps};

/// Rounds a decimal value to exactly two decimal places using half-up
/// rounding (midpoint away from zero), the standard convention for
/// monetary and percentage outputs.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculators::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1199.101)), dec!(1199.10));
/// assert_eq!(round_half_up(dec!(1199.105)), dec!(1199.11));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Computes the growth factor `(1 + rate)^periods`.
///
/// Returns `None` when the power overflows.
pub fn compound_factor(
    rate_per_period: Decimal,
    periods: u32,
) -> Option<Decimal> {
    (Decimal::ONE + rate_per_period).checked_powi(i64::from(periods))
}

/// Computes the ordinary-annuity factor `((1 + r)^n - 1) / r`, the future
/// value of one currency unit contributed at the end of each period.
///
/// Zero-rate branch: with no growth the factor collapses to `n`.
/// Returns `None` on overflow.
pub fn annuity_factor(
    rate_per_period: Decimal,
    periods: u32,
) -> Option<Decimal> {
    if rate_per_period.is_zero() {
        return Some(Decimal::from(periods));
    }
    let growth = compound_factor(rate_per_period, periods)?;
    (growth - Decimal::ONE).checked_div(rate_per_period)
}

/// Computes the level payment that amortizes `principal` over `periods`
/// at `rate_per_period`: `P * r * (1+r)^n / ((1+r)^n - 1)`.
///
/// Guards:
/// - zero periods: undefined, `None`;
/// - zero rate: the formula would divide by zero, so the payment is the
///   direct linear split `P / n`;
/// - denominator `(1+r)^n - 1` zero or negative: `None`;
/// - any overflowing step: `None`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculators::common::{amortized_payment, round_half_up};
///
/// // Zero-rate branch: 1200 over 12 months is exactly 100 a month.
/// let payment = amortized_payment(dec!(1200), dec!(0), 12).unwrap();
/// assert_eq!(payment, dec!(100));
///
/// // Standard case: 200,000 at 0.5% monthly over 360 months.
/// let payment = amortized_payment(dec!(200000), dec!(0.005), 360).unwrap();
/// assert_eq!(round_half_up(payment), dec!(1199.10));
/// ```
pub fn amortized_payment(
    principal: Decimal,
    rate_per_period: Decimal,
    periods: u32,
) -> Option<Decimal> {
    if periods == 0 {
        return None;
    }
    if rate_per_period.is_zero() {
        return principal.checked_div(Decimal::from(periods));
    }
    let growth = compound_factor(rate_per_period, periods)?;
    let denominator = growth - Decimal::ONE;
    if denominator <= Decimal::ZERO {
        return None;
    }
    principal
        .checked_mul(rate_per_period)?
        .checked_mul(growth)?
        .checked_div(denominator)
}
