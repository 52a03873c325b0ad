//! Loan payment calculator.
//!
//! Computes the level monthly payment for a fully amortized loan:
//!
//! ```text
//! M = P * r * (1+r)^n / ((1+r)^n - 1)
//! ```
//!
//! where `r` is the monthly rate (`annual% / 100 / 12`) and `n` the term in
//! months. The zero-rate branch substitutes the direct split `M = P / n`.
//!
//! Rounding policy: intermediates keep full precision; the monthly payment
//! is rounded once, and the totals derive from the rounded payment so the
//! displayed figures are internally consistent.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::calculators::{LoanCalculator, LoanField};
//! use fincalc_core::fields::{Calculator, FieldValues};
//!
//! let mut values = FieldValues::new();
//! values.insert(LoanField::Amount, dec!(200000));
//! values.insert(LoanField::InterestRate, dec!(6));
//! values.insert(LoanField::TermMonths, dec!(360));
//!
//! let result = LoanCalculator::default().evaluate(&values).unwrap();
//!
//! assert_eq!(result.monthly_payment, dec!(1199.10));
//! assert_eq!(result.total_interest, dec!(231676.00));
//! ```

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculators::common::{amortized_payment, round_half_up};
use crate::fields::{Calculator, EvalError, FieldKey, FieldSpec, FieldValues};

/// Input fields of the loan calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LoanField {
    Amount,
    InterestRate,
    TermMonths,
}

impl FieldKey for LoanField {
    const ALL: &'static [Self] = &[Self::Amount, Self::InterestRate, Self::TermMonths];
}

/// Static bound constants: the loan calculator's configuration surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanLimits {
    pub max_amount: Decimal,
    /// Maximum annual interest rate, in percent.
    pub max_rate: Decimal,
    pub max_term_months: u32,
}

impl Default for LoanLimits {
    fn default() -> Self {
        Self {
            max_amount: dec!(100000000),
            max_rate: dec!(30),
            max_term_months: 600,
        }
    }
}

/// Result of a loan calculation: echoed validated inputs plus derived
/// outputs, every monetary member rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanResult {
    pub amount: Decimal,
    /// Annual interest rate, in percent.
    pub annual_rate: Decimal,
    pub term_months: u32,
    pub monthly_payment: Decimal,
    pub total_paid: Decimal,
    pub total_interest: Decimal,
}

/// Guarded evaluator for the loan payment formula.
#[derive(Debug, Clone)]
pub struct LoanCalculator {
    limits: LoanLimits,
}

impl LoanCalculator {
    pub fn new(limits: LoanLimits) -> Self {
        Self { limits }
    }
}

impl Default for LoanCalculator {
    fn default() -> Self {
        Self::new(LoanLimits::default())
    }
}

impl Calculator for LoanCalculator {
    type Field = LoanField;
    type Output = LoanResult;

    fn spec(
        &self,
        field: LoanField,
    ) -> FieldSpec {
        match field {
            LoanField::Amount => FieldSpec::new("loan amount", dec!(1), self.limits.max_amount),
            LoanField::InterestRate => {
                FieldSpec::new("annual interest rate", Decimal::ZERO, self.limits.max_rate)
            }
            LoanField::TermMonths => FieldSpec::new(
                "term in months",
                dec!(1),
                Decimal::from(self.limits.max_term_months),
            )
            .integer(),
        }
    }

    fn evaluate(
        &self,
        values: &FieldValues<LoanField>,
    ) -> Result<LoanResult, EvalError<LoanField>> {
        let amount = values.required(LoanField::Amount)?;
        let annual_rate = values.required(LoanField::InterestRate)?;
        let term_months = values
            .required(LoanField::TermMonths)?
            .to_u32()
            .ok_or(EvalError::Numerical)?;

        let monthly_rate = annual_rate / dec!(100) / dec!(12);
        let payment =
            amortized_payment(amount, monthly_rate, term_months).ok_or(EvalError::Numerical)?;

        let monthly_payment = round_half_up(payment);
        let total_paid = round_half_up(monthly_payment * Decimal::from(term_months));
        let total_interest = round_half_up(total_paid - amount);

        Ok(LoanResult {
            amount,
            annual_rate,
            term_months,
            monthly_payment,
            total_paid,
            total_interest,
        })
    }
}
