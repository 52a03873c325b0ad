//! Guarded formula evaluators for the calculator suite.
//!
//! Each calculator declares its fields, its static bound limits, and a
//! result record of echoed inputs plus derived outputs; degenerate cases
//! (zero rate, zero periods, zero denominators, overflow) are handled with
//! explicit branches before any result is exposed.

pub mod common;

mod age;
mod compound;
mod loan;
mod mortgage;
mod roi;

pub use age::{AgeError, AgeResult, calculate_age};
pub use compound::{CompoundCalculator, CompoundField, CompoundLimits, CompoundResult};
pub use loan::{LoanCalculator, LoanField, LoanLimits, LoanResult};
pub use mortgage::{MortgageCalculator, MortgageField, MortgageLimits, MortgageResult};
pub use roi::{RoiCalculator, RoiField, RoiLimits, RoiResult};
