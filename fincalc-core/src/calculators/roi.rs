//! Return-on-investment calculator.
//!
//! ```text
//! roi%         (final - totalInvested) / totalInvested * 100
//! annualized%  ((final / totalInvested)^(1 / years) - 1) * 100
//! ```
//!
//! where `totalInvested = initial investment + additional contributions`.
//! The annualized rate is computed only when a holding period is given and
//! the value ratio is positive; otherwise it is absent, never zero.
//!
//! Dependency rule: a final value without an initial investment is a
//! field-tagged dependency error on the initial investment, not a crash and
//! not a division by zero.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculators::common::round_half_up;
use crate::fields::{Calculator, EvalError, FieldError, FieldKey, FieldSpec, FieldValues};

/// Input fields of the ROI calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoiField {
    /// Required in effect, but validated as a dependency of the final value
    /// so the message names the relationship.
    InitialInvestment,
    AdditionalContributions,
    FinalValue,
    /// Holding period in years; absent skips the annualized rate.
    Years,
}

impl FieldKey for RoiField {
    const ALL: &'static [Self] = &[
        Self::InitialInvestment,
        Self::AdditionalContributions,
        Self::FinalValue,
        Self::Years,
    ];
}

/// Static bound constants: the ROI calculator's configuration surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiLimits {
    pub max_invested: Decimal,
    pub max_final_value: Decimal,
    pub max_years: Decimal,
}

impl Default for RoiLimits {
    fn default() -> Self {
        Self {
            max_invested: dec!(1000000000),
            max_final_value: dec!(1000000000),
            max_years: dec!(100),
        }
    }
}

/// Result of an ROI calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiResult {
    pub initial_investment: Decimal,
    pub additional_contributions: Decimal,
    pub total_invested: Decimal,
    pub final_value: Decimal,
    /// Absolute gain (or loss, when negative).
    pub gain: Decimal,
    /// Simple return, in percent.
    pub roi_percent: Decimal,
    /// Constant per-year rate producing the same total growth, in percent.
    /// Absent without a positive holding period and value ratio.
    pub annualized_percent: Option<Decimal>,
}

/// Guarded evaluator for the ROI formulas.
#[derive(Debug, Clone)]
pub struct RoiCalculator {
    limits: RoiLimits,
}

impl RoiCalculator {
    pub fn new(limits: RoiLimits) -> Self {
        Self { limits }
    }
}

impl Default for RoiCalculator {
    fn default() -> Self {
        Self::new(RoiLimits::default())
    }
}

impl Calculator for RoiCalculator {
    type Field = RoiField;
    type Output = RoiResult;

    fn spec(
        &self,
        field: RoiField,
    ) -> FieldSpec {
        match field {
            RoiField::InitialInvestment => {
                FieldSpec::new("initial investment", dec!(0.01), self.limits.max_invested)
                    .optional()
            }
            RoiField::AdditionalContributions => FieldSpec::new(
                "additional contributions",
                Decimal::ZERO,
                self.limits.max_invested,
            )
            .optional(),
            RoiField::FinalValue => {
                FieldSpec::new("final value", Decimal::ZERO, self.limits.max_final_value)
            }
            RoiField::Years => {
                FieldSpec::new("holding period in years", dec!(0.01), self.limits.max_years)
                    .optional()
            }
        }
    }

    fn evaluate(
        &self,
        values: &FieldValues<RoiField>,
    ) -> Result<RoiResult, EvalError<RoiField>> {
        let final_value = values.required(RoiField::FinalValue)?;
        let initial_investment =
            values
                .get(RoiField::InitialInvestment)
                .ok_or_else(|| EvalError::Field {
                    field: RoiField::InitialInvestment,
                    error: FieldError::Dependency(
                        "final value requires an initial investment".to_string(),
                    ),
                })?;
        let additional_contributions = values.get_or_zero(RoiField::AdditionalContributions);

        // Field minimums keep initial_investment positive, so the divisor
        // below cannot be zero.
        let total_invested = initial_investment + additional_contributions;
        let gain = final_value - total_invested;
        let roi_percent = round_half_up(
            gain.checked_div(total_invested)
                .ok_or(EvalError::Numerical)?
                * dec!(100),
        );

        let annualized_percent = match values.get(RoiField::Years) {
            Some(years) if years > Decimal::ZERO => {
                let ratio = final_value
                    .checked_div(total_invested)
                    .ok_or(EvalError::Numerical)?;
                if ratio > Decimal::ZERO {
                    let root = ratio
                        .checked_powd(Decimal::ONE / years)
                        .ok_or(EvalError::Numerical)?;
                    Some(round_half_up((root - Decimal::ONE) * dec!(100)))
                } else {
                    None
                }
            }
            _ => None,
        };

        Ok(RoiResult {
            initial_investment,
            additional_contributions,
            total_invested,
            final_value,
            gain: round_half_up(gain),
            roi_percent,
            annualized_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn values(
        initial: Option<Decimal>,
        additional: Option<Decimal>,
        final_value: Decimal,
        years: Option<Decimal>,
    ) -> FieldValues<RoiField> {
        let mut values = FieldValues::new();
        if let Some(initial) = initial {
            values.insert(RoiField::InitialInvestment, initial);
        }
        if let Some(additional) = additional {
            values.insert(RoiField::AdditionalContributions, additional);
        }
        values.insert(RoiField::FinalValue, final_value);
        if let Some(years) = years {
            values.insert(RoiField::Years, years);
        }
        values
    }

    #[test]
    fn simple_positive_return() {
        let calc = RoiCalculator::default();

        let result = calc
            .evaluate(&values(Some(dec!(10000)), None, dec!(12500), None))
            .unwrap();

        assert_eq!(result.total_invested, dec!(10000));
        assert_eq!(result.gain, dec!(2500.00));
        assert_eq!(result.roi_percent, dec!(25.00));
        assert_eq!(result.annualized_percent, None);
    }

    #[test]
    fn final_value_without_initial_investment_is_a_dependency_error() {
        let calc = RoiCalculator::default();

        let result = calc.evaluate(&values(None, None, dec!(12500), None));

        assert_eq!(
            result,
            Err(EvalError::Field {
                field: RoiField::InitialInvestment,
                error: FieldError::Dependency(
                    "final value requires an initial investment".to_string()
                ),
            })
        );
    }

    #[test]
    fn additional_contributions_count_as_invested() {
        let calc = RoiCalculator::default();

        let result = calc
            .evaluate(&values(
                Some(dec!(8000)),
                Some(dec!(2000)),
                dec!(12500),
                None,
            ))
            .unwrap();

        assert_eq!(result.total_invested, dec!(10000));
        assert_eq!(result.roi_percent, dec!(25.00));
    }

    #[test]
    fn annualized_rate_over_two_years() {
        let calc = RoiCalculator::default();

        // 10000 -> 12100 over 2 years is exactly 10% a year.
        let result = calc
            .evaluate(&values(Some(dec!(10000)), None, dec!(12100), Some(dec!(2))))
            .unwrap();

        assert_eq!(result.roi_percent, dec!(21.00));
        assert_eq!(result.annualized_percent, Some(dec!(10.00)));
    }

    #[test]
    fn one_year_annualized_equals_simple_roi() {
        let calc = RoiCalculator::default();

        let result = calc
            .evaluate(&values(Some(dec!(10000)), None, dec!(12500), Some(dec!(1))))
            .unwrap();

        assert_eq!(result.annualized_percent, Some(result.roi_percent));
    }

    #[test]
    fn total_loss_skips_annualized_rate() {
        let calc = RoiCalculator::default();

        let result = calc
            .evaluate(&values(Some(dec!(10000)), None, dec!(0), Some(dec!(3))))
            .unwrap();

        assert_eq!(result.roi_percent, dec!(-100.00));
        assert_eq!(result.annualized_percent, None);
    }

    #[test]
    fn loss_yields_negative_roi() {
        let calc = RoiCalculator::default();

        let result = calc
            .evaluate(&values(Some(dec!(10000)), None, dec!(7500), None))
            .unwrap();

        assert_eq!(result.gain, dec!(-2500.00));
        assert_eq!(result.roi_percent, dec!(-25.00));
    }

    #[test]
    fn evaluate_is_idempotent() {
        let calc = RoiCalculator::default();
        let inputs = values(Some(dec!(5000)), Some(dec!(500)), dec!(8000), Some(dec!(4)));

        assert_eq!(calc.evaluate(&inputs), calc.evaluate(&inputs));
    }
}
