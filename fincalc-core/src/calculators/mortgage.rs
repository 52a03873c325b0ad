//! Mortgage payment calculator.
//!
//! Same amortization formula as the loan calculator, applied to the financed
//! principal `loan amount - down payment` over `years * 12` months. The down
//! payment is optional (absent means zero) and must not exceed the loan
//! amount; that dependency is checked here, not in the shared field
//! validation, so the error lands on the down payment field.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::calculators::{MortgageCalculator, MortgageField};
//! use fincalc_core::fields::{FormEvent, FormState};
//!
//! let form = FormState::new(MortgageCalculator::default())
//!     .reduce(FormEvent::input(MortgageField::LoanAmount, "250,000"))
//!     .reduce(FormEvent::input(MortgageField::DownPayment, "50,000"))
//!     .reduce(FormEvent::input(MortgageField::InterestRate, "6"))
//!     .reduce(FormEvent::input(MortgageField::TermYears, "30"))
//!     .reduce(FormEvent::Calculate);
//!
//! let result = form.result().unwrap();
//! assert_eq!(result.principal, dec!(200000));
//! assert_eq!(result.monthly_payment, dec!(1199.10));
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculators::common::{amortized_payment, round_half_up};
use crate::fields::{Calculator, EvalError, FieldError, FieldKey, FieldSpec, FieldValues};

/// Input fields of the mortgage calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MortgageField {
    LoanAmount,
    DownPayment,
    InterestRate,
    TermYears,
}

impl FieldKey for MortgageField {
    const ALL: &'static [Self] = &[
        Self::LoanAmount,
        Self::DownPayment,
        Self::InterestRate,
        Self::TermYears,
    ];
}

/// Static bound constants: the mortgage calculator's configuration surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageLimits {
    pub max_loan_amount: Decimal,
    /// Maximum annual interest rate, in percent.
    pub max_rate: Decimal,
    pub max_term_years: u32,
}

impl Default for MortgageLimits {
    fn default() -> Self {
        Self {
            max_loan_amount: dec!(100000000),
            max_rate: dec!(30),
            max_term_years: 50,
        }
    }
}

/// Result of a mortgage calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageResult {
    pub loan_amount: Decimal,
    pub down_payment: Decimal,
    /// Financed amount: loan amount minus down payment.
    pub principal: Decimal,
    /// Annual interest rate, in percent.
    pub annual_rate: Decimal,
    pub term_months: u32,
    pub monthly_payment: Decimal,
    pub total_paid: Decimal,
    pub total_interest: Decimal,
}

/// Guarded evaluator for the mortgage payment formula.
#[derive(Debug, Clone)]
pub struct MortgageCalculator {
    limits: MortgageLimits,
}

impl MortgageCalculator {
    pub fn new(limits: MortgageLimits) -> Self {
        Self { limits }
    }
}

impl Default for MortgageCalculator {
    fn default() -> Self {
        Self::new(MortgageLimits::default())
    }
}

impl Calculator for MortgageCalculator {
    type Field = MortgageField;
    type Output = MortgageResult;

    fn spec(
        &self,
        field: MortgageField,
    ) -> FieldSpec {
        match field {
            MortgageField::LoanAmount => {
                FieldSpec::new("loan amount", dec!(1), self.limits.max_loan_amount)
            }
            MortgageField::DownPayment => {
                FieldSpec::new("down payment", Decimal::ZERO, self.limits.max_loan_amount)
                    .optional()
            }
            MortgageField::InterestRate => {
                FieldSpec::new("annual interest rate", Decimal::ZERO, self.limits.max_rate)
            }
            MortgageField::TermYears => FieldSpec::new(
                "term in years",
                dec!(1),
                Decimal::from(self.limits.max_term_years),
            )
            .integer(),
        }
    }

    fn evaluate(
        &self,
        values: &FieldValues<MortgageField>,
    ) -> Result<MortgageResult, EvalError<MortgageField>> {
        let loan_amount = values.required(MortgageField::LoanAmount)?;
        let down_payment = values.get_or_zero(MortgageField::DownPayment);
        let annual_rate = values.required(MortgageField::InterestRate)?;
        let term_years = values
            .required(MortgageField::TermYears)?
            .to_u32()
            .ok_or(EvalError::Numerical)?;

        if down_payment > loan_amount {
            return Err(EvalError::Field {
                field: MortgageField::DownPayment,
                error: FieldError::Dependency(
                    "down payment cannot exceed loan amount".to_string(),
                ),
            });
        }

        let principal = loan_amount - down_payment;
        let term_months = term_years.checked_mul(12).ok_or(EvalError::Numerical)?;
        let monthly_rate = annual_rate / dec!(100) / dec!(12);
        let payment =
            amortized_payment(principal, monthly_rate, term_months).ok_or(EvalError::Numerical)?;

        let monthly_payment = round_half_up(payment);
        let total_paid = round_half_up(monthly_payment * Decimal::from(term_months));
        let total_interest = round_half_up(total_paid - principal);

        Ok(MortgageResult {
            loan_amount,
            down_payment,
            principal,
            annual_rate,
            term_months,
            monthly_payment,
            total_paid,
            total_interest,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn values(
        loan: Decimal,
        down: Option<Decimal>,
        rate: Decimal,
        years: Decimal,
    ) -> FieldValues<MortgageField> {
        let mut values = FieldValues::new();
        values.insert(MortgageField::LoanAmount, loan);
        if let Some(down) = down {
            values.insert(MortgageField::DownPayment, down);
        }
        values.insert(MortgageField::InterestRate, rate);
        values.insert(MortgageField::TermYears, years);
        values
    }

    #[test]
    fn standard_mortgage_case() {
        let calc = MortgageCalculator::default();

        let result = calc
            .evaluate(&values(dec!(200000), None, dec!(6), dec!(30)))
            .unwrap();

        assert_eq!(result.principal, dec!(200000));
        assert_eq!(result.term_months, 360);
        assert_eq!(result.monthly_payment, dec!(1199.10));
    }

    #[test]
    fn down_payment_reduces_financed_principal() {
        let calc = MortgageCalculator::default();

        let result = calc
            .evaluate(&values(dec!(250000), Some(dec!(50000)), dec!(6), dec!(30)))
            .unwrap();

        assert_eq!(result.principal, dec!(200000));
        assert_eq!(result.monthly_payment, dec!(1199.10));
    }

    #[test]
    fn down_payment_exceeding_loan_amount_is_a_dependency_error() {
        let calc = MortgageCalculator::default();

        let result = calc.evaluate(&values(dec!(100000), Some(dec!(150000)), dec!(5), dec!(15)));

        assert_eq!(
            result,
            Err(EvalError::Field {
                field: MortgageField::DownPayment,
                error: FieldError::Dependency(
                    "down payment cannot exceed loan amount".to_string()
                ),
            })
        );
    }

    #[test]
    fn down_payment_equal_to_loan_amount_finances_nothing() {
        let calc = MortgageCalculator::default();

        let result = calc
            .evaluate(&values(dec!(100000), Some(dec!(100000)), dec!(5), dec!(15)))
            .unwrap();

        assert_eq!(result.principal, dec!(0));
        assert_eq!(result.monthly_payment, dec!(0.00));
        assert_eq!(result.total_interest, dec!(0.00));
    }

    #[test]
    fn zero_rate_mortgage_splits_principal_exactly() {
        let calc = MortgageCalculator::default();

        let result = calc
            .evaluate(&values(dec!(120000), None, dec!(0), dec!(10)))
            .unwrap();

        assert_eq!(result.monthly_payment, dec!(1000.00));
        assert_eq!(result.total_interest, dec!(0.00));
    }

    #[test]
    fn evaluate_is_idempotent() {
        let calc = MortgageCalculator::default();
        let inputs = values(dec!(325000), Some(dec!(65000)), dec!(5.5), dec!(25));

        assert_eq!(calc.evaluate(&inputs), calc.evaluate(&inputs));
    }

    #[test]
    fn total_interest_increases_strictly_with_rate() {
        let calc = MortgageCalculator::default();

        let mut previous = Decimal::MIN;
        for rate in [dec!(2), dec!(3.5), dec!(5), dec!(6.5), dec!(8)] {
            let result = calc
                .evaluate(&values(dec!(200000), None, rate, dec!(30)))
                .unwrap();
            assert!(result.total_interest > previous);
            previous = result.total_interest;
        }
    }
}
