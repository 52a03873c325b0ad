//! Field-level error taxonomy and the per-form error map.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use thiserror::Error;

/// A single field's active validation error.
///
/// The `Display` text is the user-facing message shown next to the offending
/// input; it never exposes internal detail.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    /// A required field was empty at calculate-time.
    #[error("this field is required")]
    Missing,

    /// The raw string could not be parsed as a number
    /// (non-numeric content or exponent notation).
    #[error("enter a valid number")]
    Invalid,

    /// A fractional value was entered where only whole numbers are allowed.
    #[error("enter a whole number")]
    NotAnInteger,

    /// The value is below the field's minimum bound.
    #[error("value must be at least {0}")]
    BelowMinimum(Decimal),

    /// The value is above the field's maximum bound.
    #[error("value must be at most {0}")]
    AboveMaximum(Decimal),

    /// The field's validity depends on another field's value.
    #[error("{0}")]
    Dependency(String),
}

/// Ordered map of field to active error.
///
/// Invariant: at most one message per field; inserting replaces any previous
/// message for that field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<K: Ord>(BTreeMap<K, FieldError>);

impl<K: Ord> FieldErrors<K> {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Sets the field's active error, replacing any previous one.
    pub fn insert(
        &mut self,
        field: K,
        error: FieldError,
    ) {
        self.0.insert(field, error);
    }

    /// Clears the field's active error, if any.
    pub fn remove(
        &mut self,
        field: &K,
    ) {
        self.0.remove(field);
    }

    pub fn get(
        &self,
        field: &K,
    ) -> Option<&FieldError> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Iterates active errors in field order, for the aggregate alert region.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &FieldError)> {
        self.0.iter()
    }
}

impl<K: Ord> Default for FieldErrors<K> {
    fn default() -> Self {
        Self::new()
    }
}
