//! A single form field: the raw string plus its sanitized value.

use rust_decimal::Decimal;

use crate::fields::errors::FieldError;
use crate::fields::spec::{self, FieldSpec};

/// One numeric input field of a calculator form.
///
/// Holds the raw string as typed, the derived sanitized value, and the
/// field's spec. Invariant: a `Some` value always lies within the spec's
/// `[min, max]`; an empty raw string means "absent", not zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericField {
    spec: FieldSpec,
    raw: String,
    value: Option<Decimal>,
}

impl NumericField {
    pub fn new(spec: FieldSpec) -> Self {
        Self {
            spec,
            raw: String::new(),
            value: None,
        }
    }

    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> Option<Decimal> {
        self.value
    }

    /// Applies an input event (keystroke-level update).
    ///
    /// Parseable but out-of-range values are clamped to the nearest bound:
    /// the stored raw string and value both become the boundary value, and
    /// the violated bound is reported. Unparseable input keeps the raw string
    /// (so the user sees what they typed) and clears the value. Empty input
    /// clears the field without error; presence is checked at calculate-time.
    pub fn input(
        &mut self,
        raw: &str,
    ) -> Result<(), FieldError> {
        self.raw = raw.to_string();
        if raw.trim().is_empty() {
            self.value = None;
            return Ok(());
        }
        match spec::validate(raw, &self.spec) {
            Ok(value) => {
                self.value = value;
                Ok(())
            }
            Err(error) => {
                match &error {
                    // Range violations clamp to the violated bound.
                    FieldError::BelowMinimum(bound) | FieldError::AboveMaximum(bound) => {
                        let bound = spec::clamp(*bound, &self.spec);
                        self.raw = bound.to_string();
                        self.value = Some(bound);
                    }
                    _ => self.value = None,
                }
                Err(error)
            }
        }
    }

    /// Calculate-time validation of the current raw string.
    pub fn validate(&self) -> Result<Option<Decimal>, FieldError> {
        spec::validate(&self.raw, &self.spec)
    }

    /// Resets the field to its initial empty state.
    pub fn reset(&mut self) {
        self.raw.clear();
        self.value = None;
    }
}
