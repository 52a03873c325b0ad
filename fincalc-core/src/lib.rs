pub mod calculators;
pub mod fields;

pub use calculators::{
    CompoundCalculator, LoanCalculator, MortgageCalculator, RoiCalculator, calculate_age,
};
pub use fields::{Calculator, FormEvent, FormPhase, FormState};
