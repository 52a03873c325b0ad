//! Declarative field specifications and input sanitization.
//!
//! Every calculator declares its inputs as [`FieldSpec`]s: a label, a
//! `[min, max]` domain, whether fractional values are allowed, and whether
//! the field is required at calculate-time. The functions in this module are
//! the two passes the pipeline runs over raw strings:
//!
//! 1. [`sanitize`] / [`clamp`] on every input event (generic rejection,
//!    boundary clamping);
//! 2. [`validate`] on an explicit calculate (specific, user-facing
//!    [`FieldError`] per violation).
//!
//! Input normalization follows the same rules as hand-typed currency fields:
//! surrounding whitespace is trimmed and commas are accepted as thousands
//! separators (`"1,234.56"`). Exponent notation (`"1e6"`) is rejected
//! outright; it is too easy to mistype and too ambiguous to clamp.

use rust_decimal::Decimal;

use crate::fields::errors::FieldError;

/// Specification of a single numeric input field.
///
/// The bounds double as the calculator's configuration surface: each
/// calculator builds its specs from a limits struct with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// User-facing label, used in aggregated error listings.
    pub label: &'static str,

    /// Smallest accepted value (inclusive).
    pub min: Decimal,

    /// Largest accepted value (inclusive).
    pub max: Decimal,

    /// When false, fractional input is rejected (term lengths, period counts).
    pub allow_decimal: bool,

    /// When true, an empty field at calculate-time is an error.
    /// Optional fields are "absent", never zero; the calculator decides
    /// whether absence defaults to zero.
    pub required: bool,
}

impl FieldSpec {
    /// Creates a required, decimal-allowing spec over `[min, max]`.
    pub fn new(
        label: &'static str,
        min: Decimal,
        max: Decimal,
    ) -> Self {
        Self {
            label,
            min,
            max,
            allow_decimal: true,
            required: true,
        }
    }

    /// Restricts the field to whole numbers.
    #[must_use]
    pub fn integer(mut self) -> Self {
        self.allow_decimal = false;
        self
    }

    /// Marks the field as optional at calculate-time.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Normalizes input for parsing: trims whitespace and removes commas
/// (thousands separator).
fn normalize(raw: &str) -> String {
    raw.trim().replace(',', "")
}

/// Parses a normalized string into a [`Decimal`], without range checking.
///
/// Returns the specific violation so the calculate-time pass can surface it;
/// the event-time pass discards the detail.
fn parse(
    raw: &str,
    spec: &FieldSpec,
) -> Result<Decimal, FieldError> {
    let normalized = normalize(raw);
    if normalized.contains(['e', 'E']) {
        return Err(FieldError::Invalid);
    }
    let value: Decimal = normalized.parse().map_err(|_| FieldError::Invalid)?;
    if !spec.allow_decimal && !value.is_integer() {
        return Err(FieldError::NotAnInteger);
    }
    Ok(value)
}

/// Converts a raw string into a bounded number, or rejects it.
///
/// Pure function: empty input, non-numeric content, exponent notation,
/// out-of-range values, and fractional values where `allow_decimal` is false
/// all yield `None`. A `Some` result always satisfies
/// `spec.min <= value <= spec.max`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::fields::{FieldSpec, sanitize};
///
/// let spec = FieldSpec::new("loan amount", dec!(1), dec!(1000000));
///
/// assert_eq!(sanitize("250,000", &spec), Some(dec!(250000)));
/// assert_eq!(sanitize("  42.5 ", &spec), Some(dec!(42.5)));
/// assert_eq!(sanitize("", &spec), None);
/// assert_eq!(sanitize("1e6", &spec), None);
/// assert_eq!(sanitize("2000000", &spec), None);
/// ```
pub fn sanitize(
    raw: &str,
    spec: &FieldSpec,
) -> Option<Decimal> {
    if normalize(raw).is_empty() {
        return None;
    }
    let value = parse(raw, spec).ok()?;
    if value < spec.min || value > spec.max {
        return None;
    }
    Some(value)
}

/// Forces a value to the nearest boundary of the spec's domain.
pub fn clamp(
    value: Decimal,
    spec: &FieldSpec,
) -> Decimal {
    value.clamp(spec.min, spec.max)
}

/// Checks a parsed number against the spec's `[min, max]` domain.
///
/// Second-pass check run at calculate-time; unlike [`sanitize`]'s generic
/// rejection it reports which bound was violated.
pub fn check_range(
    value: Decimal,
    spec: &FieldSpec,
) -> Result<(), FieldError> {
    if value < spec.min {
        return Err(FieldError::BelowMinimum(spec.min));
    }
    if value > spec.max {
        return Err(FieldError::AboveMaximum(spec.max));
    }
    Ok(())
}

/// Full calculate-time validation of a raw string.
///
/// Returns `Ok(None)` when an optional field is absent, `Ok(Some(value))`
/// for a present, in-range value, and the specific [`FieldError`] otherwise.
pub fn validate(
    raw: &str,
    spec: &FieldSpec,
) -> Result<Option<Decimal>, FieldError> {
    if normalize(raw).is_empty() {
        return if spec.required {
            Err(FieldError::Missing)
        } else {
            Ok(None)
        };
    }
    let value = parse(raw, spec).inspect_err(|error| {
        tracing::warn!(input = %raw, field = spec.label, %error, "rejected field input");
    })?;
    check_range(value, spec)?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn amount_spec() -> FieldSpec {
        FieldSpec::new("amount", dec!(1), dec!(1000000))
    }

    fn term_spec() -> FieldSpec {
        FieldSpec::new("term", dec!(1), dec!(600)).integer()
    }

    // =========================================================================
    // sanitize tests
    // =========================================================================

    #[test]
    fn sanitize_accepts_plain_number() {
        let result = sanitize("1200", &amount_spec());

        assert_eq!(result, Some(dec!(1200)));
    }

    #[test]
    fn sanitize_accepts_comma_thousands_separator() {
        let result = sanitize("250,000", &amount_spec());

        assert_eq!(result, Some(dec!(250000)));
    }

    #[test]
    fn sanitize_trims_whitespace() {
        let result = sanitize("  42.5  ", &amount_spec());

        assert_eq!(result, Some(dec!(42.5)));
    }

    #[test]
    fn sanitize_rejects_empty_string() {
        assert_eq!(sanitize("", &amount_spec()), None);
        assert_eq!(sanitize("   ", &amount_spec()), None);
    }

    #[test]
    fn sanitize_rejects_non_numeric() {
        assert_eq!(sanitize("abc", &amount_spec()), None);
        assert_eq!(sanitize("12abc", &amount_spec()), None);
    }

    #[test]
    fn sanitize_rejects_scientific_notation() {
        assert_eq!(sanitize("1e6", &amount_spec()), None);
        assert_eq!(sanitize("1E6", &amount_spec()), None);
    }

    #[test]
    fn sanitize_rejects_out_of_range() {
        assert_eq!(sanitize("0", &amount_spec()), None);
        assert_eq!(sanitize("2000000", &amount_spec()), None);
    }

    #[test]
    fn sanitize_rejects_fraction_for_integer_field() {
        assert_eq!(sanitize("12.5", &term_spec()), None);
    }

    #[test]
    fn sanitize_accepts_whole_number_for_integer_field() {
        assert_eq!(sanitize("360", &term_spec()), Some(dec!(360)));
    }

    #[test]
    fn sanitize_output_always_within_bounds() {
        let spec = amount_spec();
        for raw in ["1", "0.5", "999999.99", "1000000", "1000000.01", "-3"] {
            if let Some(value) = sanitize(raw, &spec) {
                assert!(value >= spec.min && value <= spec.max, "raw {raw}");
            }
        }
    }

    // =========================================================================
    // clamp tests
    // =========================================================================

    #[test]
    fn clamp_forces_low_value_to_minimum() {
        let result = clamp(dec!(-5), &amount_spec());

        assert_eq!(result, dec!(1));
    }

    #[test]
    fn clamp_forces_high_value_to_maximum() {
        let result = clamp(dec!(5000000), &amount_spec());

        assert_eq!(result, dec!(1000000));
    }

    #[test]
    fn clamp_leaves_in_range_value_untouched() {
        let result = clamp(dec!(1200), &amount_spec());

        assert_eq!(result, dec!(1200));
    }

    // =========================================================================
    // check_range tests
    // =========================================================================

    #[test]
    fn check_range_reports_violated_bound() {
        let spec = amount_spec();

        assert_eq!(
            check_range(dec!(0), &spec),
            Err(FieldError::BelowMinimum(dec!(1)))
        );
        assert_eq!(
            check_range(dec!(1000001), &spec),
            Err(FieldError::AboveMaximum(dec!(1000000)))
        );
        assert_eq!(check_range(dec!(500), &spec), Ok(()));
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_missing_required_field() {
        let result = validate("", &amount_spec());

        assert_eq!(result, Err(FieldError::Missing));
    }

    #[test]
    fn validate_missing_optional_field_is_absent() {
        let spec = amount_spec().optional();

        assert_eq!(validate("", &spec), Ok(None));
    }

    #[test]
    fn validate_reports_format_error() {
        assert_eq!(validate("12x", &amount_spec()), Err(FieldError::Invalid));
        assert_eq!(validate("1e3", &amount_spec()), Err(FieldError::Invalid));
    }

    #[test]
    fn validate_reports_integer_violation() {
        let result = validate("12.5", &term_spec());

        assert_eq!(result, Err(FieldError::NotAnInteger));
    }

    #[test]
    fn validate_reports_range_violation() {
        let result = validate("2000000", &amount_spec());

        assert_eq!(result, Err(FieldError::AboveMaximum(dec!(1000000))));
    }

    #[test]
    fn validate_accepts_in_range_value() {
        let result = validate("1,200.50", &amount_spec());

        assert_eq!(result, Ok(Some(dec!(1200.50))));
    }
}
