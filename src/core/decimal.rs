//! Locale-tolerant decimal parsing, summation and rounding.
//!
//! Source systems disagree on the decimal separator (`1234,56` vs `1234.56`)
//! and SAP writes negative values with a trailing minus (`12.50-`). Every
//! monetary value read from a source document goes through [`parse_decimal`].

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use super::error::MappingError;

/// Fractional digits for every rendered monetary amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Parse a locale-ambiguous numeric string.
///
/// A comma decimal separator is replaced with a dot. Empty and non-numeric
/// input is an [`MappingError::Arithmetic`]; use [`parse_optional`] for
/// fields that may legitimately be absent.
pub fn parse_decimal(raw: &str) -> Result<Decimal, MappingError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MappingError::Arithmetic("empty numeric value".into()));
    }

    let normalized = trimmed.replace(',', ".");
    let (negative, digits) = match normalized.strip_suffix('-') {
        Some(rest) => (true, rest.trim_end()),
        None => (false, normalized.as_str()),
    };
    let digits = digits.strip_prefix('+').unwrap_or(digits);

    let value = Decimal::from_str(digits)
        .map_err(|e| MappingError::Arithmetic(format!("'{raw}' is not a number: {e}")))?;

    Ok(if negative { -value } else { value })
}

/// Parse an optional field. Absent and blank values are both `None`.
pub fn parse_optional(raw: Option<&str>) -> Result<Option<Decimal>, MappingError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_decimal(s).map(Some),
    }
}

/// Parse each element and accumulate left to right.
pub fn sum<I, S>(values: I) -> Result<Decimal, MappingError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| add(acc, parse_decimal(v.as_ref())?))
}

/// `a + b`, or an arithmetic error when the result leaves the decimal range.
pub fn add(a: Decimal, b: Decimal) -> Result<Decimal, MappingError> {
    a.checked_add(b)
        .ok_or_else(|| MappingError::Arithmetic(format!("{a} + {b} overflows")))
}

/// `a × b`, or an arithmetic error when the result leaves the decimal range.
pub fn mul(a: Decimal, b: Decimal) -> Result<Decimal, MappingError> {
    a.checked_mul(b)
        .ok_or_else(|| MappingError::Arithmetic(format!("{a} × {b} overflows")))
}

/// Checked sum of already parsed values.
pub fn total<I>(values: I) -> Result<Decimal, MappingError>
where
    I: IntoIterator<Item = Decimal>,
{
    values.into_iter().try_fold(Decimal::ZERO, add)
}

/// Round to `decimals` fractional digits, ties away from zero.
pub fn round_to(n: Decimal, decimals: u32) -> Decimal {
    n.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Round a monetary amount to [`AMOUNT_SCALE`].
pub fn round_amount(n: Decimal) -> Decimal {
    round_to(n, AMOUNT_SCALE)
}
