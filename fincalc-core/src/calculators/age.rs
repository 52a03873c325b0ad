//! Age calculator: calendar-aware breakdown of the time since a birth date.
//!
//! Inputs are dates rather than numeric fields, so this calculator stands
//! outside the numeric form pipeline; it takes parsed [`NaiveDate`]s and
//! returns a flat result record, with the same local error handling as the
//! numeric calculators.
//!
//! Month anchors clamp to the end of shorter months: someone born Jan 31 is
//! one month old on Feb 28 (or 29), and a Feb 29 birthday is observed on
//! Feb 28 in common years.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from the age calculation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AgeError {
    /// The birth date lies after the as-of date.
    #[error("birth date cannot be in the future")]
    BirthDateInFuture,

    /// A constructed calendar date was invalid.
    #[error("invalid calendar date")]
    InvalidDate,
}

/// Result of an age calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeResult {
    pub birth_date: NaiveDate,
    pub as_of: NaiveDate,
    /// Completed years.
    pub years: u32,
    /// Completed months past the last birthday, 0..=11.
    pub months: u32,
    /// Days past the last whole month.
    pub days: u32,
    /// Total days lived.
    pub total_days: i64,
    /// Days until the next birthday; zero on the birthday itself.
    pub days_until_birthday: i64,
}

/// The given year/month with `day` clamped to the month's last day.
fn clamped_ymd(
    year: i32,
    month: u32,
    day: u32,
) -> Result<NaiveDate, AgeError> {
    (1..=day)
        .rev()
        .find_map(|d| NaiveDate::from_ymd_opt(year, month, d))
        .ok_or(AgeError::InvalidDate)
}

/// `birth` advanced by `months` whole months, day clamped to month end.
fn add_months_clamped(
    birth: NaiveDate,
    months: i32,
) -> Result<NaiveDate, AgeError> {
    let zero_based = birth.year() * 12 + birth.month() as i32 - 1 + months;
    let year = zero_based.div_euclid(12);
    let month = (zero_based.rem_euclid(12) + 1) as u32;
    clamped_ymd(year, month, birth.day())
}

/// The birthday observed in `year` (clamped for Feb 29 births).
fn anniversary(
    birth: NaiveDate,
    year: i32,
) -> Result<NaiveDate, AgeError> {
    clamped_ymd(year, birth.month(), birth.day())
}

/// Computes the calendar age at `as_of` for someone born on `birth_date`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use fincalc_core::calculators::calculate_age;
///
/// let birth = NaiveDate::from_ymd_opt(1990, 6, 15).unwrap();
/// let as_of = NaiveDate::from_ymd_opt(2026, 8, 23).unwrap();
///
/// let age = calculate_age(birth, as_of).unwrap();
///
/// assert_eq!(age.years, 36);
/// assert_eq!(age.months, 2);
/// assert_eq!(age.days, 8);
/// ```
pub fn calculate_age(
    birth_date: NaiveDate,
    as_of: NaiveDate,
) -> Result<AgeResult, AgeError> {
    if birth_date > as_of {
        return Err(AgeError::BirthDateInFuture);
    }

    // Whole months elapsed: the largest n with birth + n months <= as_of.
    let mut total_months = (as_of.year() - birth_date.year()) * 12
        + as_of.month() as i32
        - birth_date.month() as i32;
    let mut anchor = add_months_clamped(birth_date, total_months)?;
    if anchor > as_of {
        total_months -= 1;
        anchor = add_months_clamped(birth_date, total_months)?;
    }

    let this_year = anniversary(birth_date, as_of.year())?;
    let next_birthday = if this_year >= as_of {
        this_year
    } else {
        anniversary(birth_date, as_of.year() + 1)?
    };

    Ok(AgeResult {
        birth_date,
        as_of,
        years: u32::try_from(total_months / 12).map_err(|_| AgeError::InvalidDate)?,
        months: u32::try_from(total_months % 12).map_err(|_| AgeError::InvalidDate)?,
        days: u32::try_from((as_of - anchor).num_days()).map_err(|_| AgeError::InvalidDate)?,
        total_days: (as_of - birth_date).num_days(),
        days_until_birthday: (next_birthday - as_of).num_days(),
    })
}
