//! Generic calculator form: validated field set plus a pure reducer.
//!
//! Every calculator is driven through the same state machine:
//!
//! ```text
//! Idle -> (valid   -> Result)
//!      -> (invalid -> ErrorDisplayed)
//! Clear returns unconditionally to Idle.
//! ```
//!
//! `Validating` and `Computing` are transient inside [`FormState::reduce`];
//! a calculation either completes synchronously or is replaced by the next
//! one, so there is nothing to cancel or observe mid-flight.
//!
//! A calculator plugs in by declaring a closed field enum ([`FieldKey`]) and
//! implementing [`Calculator::evaluate`] over the validated [`FieldValues`].
//! Presence and range validation is shared; dependency rules and numerical
//! guards live in the evaluator.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::calculators::{LoanCalculator, LoanField};
//! use fincalc_core::fields::{FormEvent, FormPhase, FormState};
//!
//! let form = FormState::new(LoanCalculator::default())
//!     .reduce(FormEvent::input(LoanField::Amount, "1200"))
//!     .reduce(FormEvent::input(LoanField::InterestRate, "0"))
//!     .reduce(FormEvent::input(LoanField::TermMonths, "12"))
//!     .reduce(FormEvent::Calculate);
//!
//! assert_eq!(form.phase(), FormPhase::Result);
//! assert_eq!(form.result().unwrap().monthly_payment, dec!(100.00));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::fields::errors::{FieldError, FieldErrors};
use crate::fields::spec::FieldSpec;
use crate::fields::value::NumericField;

/// Closed enum of a calculator's input fields.
pub trait FieldKey: Copy + Eq + Ord + fmt::Debug + 'static {
    /// Every field of the form, in display order.
    const ALL: &'static [Self];
}

/// The validated values of a form, keyed by field.
///
/// Only fields that passed validation and were present appear; optional
/// absent fields are simply missing from the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldValues<K: FieldKey>(BTreeMap<K, Decimal>);

impl<K: FieldKey> FieldValues<K> {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(
        &mut self,
        field: K,
        value: Decimal,
    ) {
        self.0.insert(field, value);
    }

    pub fn get(
        &self,
        field: K,
    ) -> Option<Decimal> {
        self.0.get(&field).copied()
    }

    /// The field's value, or zero when the (optional) field is absent.
    pub fn get_or_zero(
        &self,
        field: K,
    ) -> Decimal {
        self.get(field).unwrap_or(Decimal::ZERO)
    }

    /// The field's value, or `default` when the (optional) field is absent.
    pub fn get_or(
        &self,
        field: K,
        default: Decimal,
    ) -> Decimal {
        self.get(field).unwrap_or(default)
    }

    /// The field's value, or a field-tagged missing error.
    ///
    /// Shared validation already rejects absent required fields, so this is
    /// a belt for evaluators called directly with hand-built values.
    pub fn required(
        &self,
        field: K,
    ) -> Result<Decimal, EvalError<K>> {
        self.get(field).ok_or(EvalError::Field {
            field,
            error: FieldError::Missing,
        })
    }
}

impl<K: FieldKey> Default for FieldValues<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure of a guarded formula evaluation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvalError<K: FieldKey> {
    /// A field-tagged error (dependency violations, missing values).
    #[error("{error}")]
    Field { field: K, error: FieldError },

    /// A non-finite intermediate, zero denominator, or overflow.
    /// Rendered as a generic message; internal detail is never surfaced.
    #[error("calculation error: please check your inputs")]
    Numerical,
}

/// A guarded formula evaluator over a closed set of fields.
pub trait Calculator {
    type Field: FieldKey;
    type Output: Clone + PartialEq + fmt::Debug;

    /// The field's declarative spec (bounds, decimal-allowed, required).
    fn spec(
        &self,
        field: Self::Field,
    ) -> FieldSpec;

    /// Computes the domain formula over validated inputs.
    ///
    /// Idempotent: the same values always produce an identical result.
    fn evaluate(
        &self,
        values: &FieldValues<Self::Field>,
    ) -> Result<Self::Output, EvalError<Self::Field>>;
}

/// Event consumed by [`FormState::reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent<K> {
    /// A field changed (keystroke-level update).
    Input { field: K, raw: String },
    /// The explicit "Calculate" trigger.
    Calculate,
    /// Reset everything to the initial state.
    Clear,
}

impl<K> FormEvent<K> {
    pub fn input(
        field: K,
        raw: impl Into<String>,
    ) -> Self {
        Self::Input {
            field,
            raw: raw.into(),
        }
    }
}

/// Observable phase of a calculator form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Result,
    ErrorDisplayed,
}

/// Full state of one calculator form.
///
/// Invariants:
/// - presence of any active error implies `result()` is `None`;
/// - a result is immutable once produced; a new calculation replaces it
///   wholesale, never mutates it.
#[derive(Debug, Clone)]
pub struct FormState<C: Calculator> {
    calculator: C,
    fields: BTreeMap<C::Field, NumericField>,
    errors: FieldErrors<C::Field>,
    calculation_failed: bool,
    result: Option<C::Output>,
    phase: FormPhase,
}

impl<C: Calculator> FormState<C> {
    pub fn new(calculator: C) -> Self {
        let fields = C::Field::ALL
            .iter()
            .map(|&field| (field, NumericField::new(calculator.spec(field))))
            .collect();
        Self {
            calculator,
            fields,
            errors: FieldErrors::new(),
            calculation_failed: false,
            result: None,
            phase: FormPhase::Idle,
        }
    }

    /// Applies one event and returns the next state. Pure transition
    /// function; all validation and evaluation happens here.
    #[must_use]
    pub fn reduce(
        mut self,
        event: FormEvent<C::Field>,
    ) -> Self {
        match event {
            FormEvent::Input { field, raw } => self.apply_input(field, &raw),
            FormEvent::Calculate => self.apply_calculate(),
            FormEvent::Clear => self.apply_clear(),
        }
        self
    }

    fn apply_input(
        &mut self,
        field: C::Field,
        raw: &str,
    ) {
        let Some(numeric) = self.fields.get_mut(&field) else {
            return;
        };
        match numeric.input(raw) {
            Ok(()) => {
                self.errors.remove(&field);
            }
            Err(error) => {
                // A field re-entering an invalid state discards the result.
                self.errors.insert(field, error);
                self.result = None;
            }
        }
        self.refresh_phase();
    }

    fn apply_calculate(&mut self) {
        self.errors.clear();
        self.calculation_failed = false;
        self.result = None;

        let mut values = FieldValues::new();
        for &field in C::Field::ALL {
            let Some(numeric) = self.fields.get(&field) else {
                continue;
            };
            match numeric.validate() {
                Ok(Some(value)) => values.insert(field, value),
                Ok(None) => {}
                Err(error) => self.errors.insert(field, error),
            }
        }
        if !self.errors.is_empty() {
            self.phase = FormPhase::ErrorDisplayed;
            return;
        }

        match self.calculator.evaluate(&values) {
            Ok(result) => {
                self.result = Some(result);
                self.phase = FormPhase::Result;
            }
            Err(EvalError::Field { field, error }) => {
                self.errors.insert(field, error);
                self.phase = FormPhase::ErrorDisplayed;
            }
            Err(EvalError::Numerical) => {
                tracing::warn!("calculation failed with a numerical error");
                self.calculation_failed = true;
                self.phase = FormPhase::ErrorDisplayed;
            }
        }
    }

    fn apply_clear(&mut self) {
        for numeric in self.fields.values_mut() {
            numeric.reset();
        }
        self.errors.clear();
        self.calculation_failed = false;
        self.result = None;
        self.phase = FormPhase::Idle;
    }

    fn refresh_phase(&mut self) {
        self.phase = if !self.errors.is_empty() || self.calculation_failed {
            FormPhase::ErrorDisplayed
        } else if self.result.is_some() {
            FormPhase::Result
        } else {
            FormPhase::Idle
        };
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn result(&self) -> Option<&C::Output> {
        self.result.as_ref()
    }

    pub fn errors(&self) -> &FieldErrors<C::Field> {
        &self.errors
    }

    /// True when the evaluator failed numerically; render the generic
    /// "calculation error" message rather than a field-tagged one.
    pub fn calculation_failed(&self) -> bool {
        self.calculation_failed
    }

    pub fn raw(
        &self,
        field: C::Field,
    ) -> &str {
        self.fields.get(&field).map_or("", |f| f.raw())
    }

    pub fn value(
        &self,
        field: C::Field,
    ) -> Option<Decimal> {
        self.fields.get(&field).and_then(|f| f.value())
    }

    /// The aggregate alert region: every active error, labeled.
    pub fn error_messages(&self) -> Vec<String> {
        let mut messages: Vec<String> = self
            .errors
            .iter()
            .map(|(field, error)| {
                let label = self
                    .fields
                    .get(field)
                    .map_or("input", |f| f.spec().label);
                format!("{label}: {error}")
            })
            .collect();
        if self.calculation_failed {
            messages.push(EvalError::<C::Field>::Numerical.to_string());
        }
        messages
    }
}
