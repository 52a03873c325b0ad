//! Compound interest calculator, with an optional periodic contribution.
//!
//! Two independent growth streams are summed:
//!
//! ```text
//! principal growth      P * (1 + r/m)^(m*t)
//! contribution value    A * ((1 + r/k)^(k*t) - 1) / (r/k)    (ordinary annuity)
//! ```
//!
//! where `r` is the annual rate as a fraction, `m` the compounding periods
//! per year, `k` the contributions per year, and `t` the term in years.
//! Contributions are valued as an ordinary annuity: each payment lands at
//! the end of its period. The zero-rate contribution branch collapses to
//! `A * k * t`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::calculators::{CompoundCalculator, CompoundField};
//! use fincalc_core::fields::{Calculator, FieldValues};
//!
//! let mut values = FieldValues::new();
//! values.insert(CompoundField::Principal, dec!(1000));
//! values.insert(CompoundField::AnnualRate, dec!(5));
//! values.insert(CompoundField::Years, dec!(10));
//! values.insert(CompoundField::CompoundsPerYear, dec!(1));
//!
//! let result = CompoundCalculator::default().evaluate(&values).unwrap();
//!
//! assert_eq!(result.final_amount, dec!(1628.89));
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculators::common::{annuity_factor, compound_factor, round_half_up};
use crate::fields::{Calculator, EvalError, FieldKey, FieldSpec, FieldValues};

/// Input fields of the compound interest calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CompoundField {
    Principal,
    AnnualRate,
    Years,
    /// Compounding periods per year; absent means annual compounding.
    CompoundsPerYear,
    /// Periodic contribution amount; absent means no contributions.
    Contribution,
    /// Contributions per year; absent means monthly.
    ContributionsPerYear,
}

impl FieldKey for CompoundField {
    const ALL: &'static [Self] = &[
        Self::Principal,
        Self::AnnualRate,
        Self::Years,
        Self::CompoundsPerYear,
        Self::Contribution,
        Self::ContributionsPerYear,
    ];
}

/// Static bound constants: the compound calculator's configuration surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundLimits {
    pub max_principal: Decimal,
    /// Maximum annual interest rate, in percent.
    pub max_rate: Decimal,
    pub max_years: u32,
    pub max_periods_per_year: u32,
    pub max_contribution: Decimal,
}

impl Default for CompoundLimits {
    fn default() -> Self {
        Self {
            max_principal: dec!(1000000000),
            max_rate: dec!(50),
            max_years: 100,
            max_periods_per_year: 365,
            max_contribution: dec!(1000000),
        }
    }
}

/// Result of a compound interest calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundResult {
    pub principal: Decimal,
    /// Annual interest rate, in percent.
    pub annual_rate: Decimal,
    pub years: u32,
    pub compounds_per_year: u32,
    pub contribution: Decimal,
    pub contributions_per_year: u32,
    pub final_amount: Decimal,
    pub total_contributions: Decimal,
    /// Growth beyond principal and contributions.
    pub interest_earned: Decimal,
}

/// Guarded evaluator for compound growth with periodic contributions.
#[derive(Debug, Clone)]
pub struct CompoundCalculator {
    limits: CompoundLimits,
}

impl CompoundCalculator {
    pub fn new(limits: CompoundLimits) -> Self {
        Self { limits }
    }
}

impl Default for CompoundCalculator {
    fn default() -> Self {
        Self::new(CompoundLimits::default())
    }
}

impl Calculator for CompoundCalculator {
    type Field = CompoundField;
    type Output = CompoundResult;

    fn spec(
        &self,
        field: CompoundField,
    ) -> FieldSpec {
        match field {
            CompoundField::Principal => {
                FieldSpec::new("initial principal", Decimal::ZERO, self.limits.max_principal)
            }
            CompoundField::AnnualRate => {
                FieldSpec::new("annual interest rate", Decimal::ZERO, self.limits.max_rate)
            }
            CompoundField::Years => {
                FieldSpec::new("years", dec!(1), Decimal::from(self.limits.max_years)).integer()
            }
            CompoundField::CompoundsPerYear => FieldSpec::new(
                "compounds per year",
                dec!(1),
                Decimal::from(self.limits.max_periods_per_year),
            )
            .integer()
            .optional(),
            CompoundField::Contribution => {
                FieldSpec::new("periodic contribution", Decimal::ZERO, self.limits.max_contribution)
                    .optional()
            }
            CompoundField::ContributionsPerYear => FieldSpec::new(
                "contributions per year",
                dec!(1),
                Decimal::from(self.limits.max_periods_per_year),
            )
            .integer()
            .optional(),
        }
    }

    fn evaluate(
        &self,
        values: &FieldValues<CompoundField>,
    ) -> Result<CompoundResult, EvalError<CompoundField>> {
        let principal = values.required(CompoundField::Principal)?;
        let annual_rate = values.required(CompoundField::AnnualRate)?;
        let years = values
            .required(CompoundField::Years)?
            .to_u32()
            .ok_or(EvalError::Numerical)?;
        let compounds_per_year = values
            .get_or(CompoundField::CompoundsPerYear, Decimal::ONE)
            .to_u32()
            .ok_or(EvalError::Numerical)?;
        let contribution = values.get_or_zero(CompoundField::Contribution);
        let contributions_per_year = values
            .get_or(CompoundField::ContributionsPerYear, dec!(12))
            .to_u32()
            .ok_or(EvalError::Numerical)?;

        let rate = annual_rate / dec!(100);

        let compound_periods = compounds_per_year
            .checked_mul(years)
            .ok_or(EvalError::Numerical)?;
        let growth_factor = compound_factor(
            rate / Decimal::from(compounds_per_year),
            compound_periods,
        )
        .ok_or(EvalError::Numerical)?;
        let principal_value = principal
            .checked_mul(growth_factor)
            .ok_or(EvalError::Numerical)?;

        let contribution_periods = contributions_per_year
            .checked_mul(years)
            .ok_or(EvalError::Numerical)?;
        let contribution_value = if contribution.is_zero() {
            Decimal::ZERO
        } else {
            let factor = annuity_factor(
                rate / Decimal::from(contributions_per_year),
                contribution_periods,
            )
            .ok_or(EvalError::Numerical)?;
            contribution.checked_mul(factor).ok_or(EvalError::Numerical)?
        };

        let final_amount = round_half_up(
            principal_value
                .checked_add(contribution_value)
                .ok_or(EvalError::Numerical)?,
        );
        let total_contributions =
            round_half_up(contribution * Decimal::from(contribution_periods));
        let interest_earned = round_half_up(final_amount - principal - total_contributions);

        Ok(CompoundResult {
            principal,
            annual_rate,
            years,
            compounds_per_year,
            contribution,
            contributions_per_year,
            final_amount,
            total_contributions,
            interest_earned,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn base_values() -> FieldValues<CompoundField> {
        let mut values = FieldValues::new();
        values.insert(CompoundField::Principal, dec!(1000));
        values.insert(CompoundField::AnnualRate, dec!(5));
        values.insert(CompoundField::Years, dec!(10));
        values.insert(CompoundField::CompoundsPerYear, dec!(1));
        values
    }

    #[test]
    fn annual_compounding_without_contributions() {
        let calc = CompoundCalculator::default();

        let result = calc.evaluate(&base_values()).unwrap();

        assert_eq!(result.final_amount, dec!(1628.89));
        assert_eq!(result.total_contributions, dec!(0.00));
        assert_eq!(result.interest_earned, dec!(628.89));
    }

    #[test]
    fn compounds_per_year_defaults_to_annual() {
        let calc = CompoundCalculator::default();
        let mut values = base_values();
        values.insert(CompoundField::Principal, dec!(1000));
        // Rebuild without the CompoundsPerYear entry.
        let mut absent = FieldValues::new();
        absent.insert(CompoundField::Principal, dec!(1000));
        absent.insert(CompoundField::AnnualRate, dec!(5));
        absent.insert(CompoundField::Years, dec!(10));

        assert_eq!(
            calc.evaluate(&values).unwrap().final_amount,
            calc.evaluate(&absent).unwrap().final_amount
        );
    }

    #[test]
    fn monthly_compounding_grows_faster_than_annual() {
        let calc = CompoundCalculator::default();
        let annual = calc.evaluate(&base_values()).unwrap();

        let mut monthly = base_values();
        monthly.insert(CompoundField::CompoundsPerYear, dec!(12));
        let monthly = calc.evaluate(&monthly).unwrap();

        assert!(monthly.final_amount > annual.final_amount);
    }

    #[test]
    fn zero_rate_contributions_sum_linearly() {
        let calc = CompoundCalculator::default();
        let mut values = FieldValues::new();
        values.insert(CompoundField::Principal, dec!(0));
        values.insert(CompoundField::AnnualRate, dec!(0));
        values.insert(CompoundField::Years, dec!(2));
        values.insert(CompoundField::Contribution, dec!(100));
        values.insert(CompoundField::ContributionsPerYear, dec!(12));

        let result = calc.evaluate(&values).unwrap();

        // 24 contributions of 100 with no growth.
        assert_eq!(result.final_amount, dec!(2400.00));
        assert_eq!(result.total_contributions, dec!(2400.00));
        assert_eq!(result.interest_earned, dec!(0.00));
    }

    #[test]
    fn contributions_earn_annuity_interest() {
        let calc = CompoundCalculator::default();
        let mut values = FieldValues::new();
        values.insert(CompoundField::Principal, dec!(0));
        values.insert(CompoundField::AnnualRate, dec!(10));
        values.insert(CompoundField::Years, dec!(2));
        values.insert(CompoundField::Contribution, dec!(100));
        values.insert(CompoundField::ContributionsPerYear, dec!(1));

        let result = calc.evaluate(&values).unwrap();

        // Ordinary annuity: 100 * ((1.1)^2 - 1) / 0.1 = 210.
        assert_eq!(result.final_amount, dec!(210.00));
        assert_eq!(result.interest_earned, dec!(10.00));
    }

    #[test]
    fn evaluate_is_idempotent() {
        let calc = CompoundCalculator::default();
        let values = base_values();

        assert_eq!(calc.evaluate(&values), calc.evaluate(&values));
    }

    #[test]
    fn interest_increases_strictly_with_rate() {
        let calc = CompoundCalculator::default();

        let mut previous = Decimal::MIN;
        for rate in [dec!(1), dec!(3), dec!(5), dec!(9), dec!(15)] {
            let mut values = base_values();
            values.insert(CompoundField::AnnualRate, rate);
            let result = calc.evaluate(&values).unwrap();
            assert!(result.interest_earned > previous);
            previous = result.interest_earned;
        }
    }
}
