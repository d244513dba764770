//! Amount parsing at the input boundary and rounding for display.
//!
//! Amounts travel through the engine as `f64` at full precision. Rounding to
//! whole units happens only when a value is turned into text.

use crate::{Currency, EngineError};

/// Largest amount accepted from user input.
const MAX_INPUT_AMOUNT: u64 = 1_000_000_000_000;

/// Parses a user-typed amount made of ASCII digits only.
///
/// The forms accept whole units only: no sign, no decimal separator, no
/// grouping. Surrounding whitespace is ignored. Anything else is rejected
/// here so malformed input never reaches the aggregator.
///
/// ```rust
/// use engine::parse_whole_amount;
///
/// assert_eq!(parse_whole_amount(" 250 ").unwrap(), 250.0);
/// assert!(parse_whole_amount("12.5").is_err());
/// assert!(parse_whole_amount("").is_err());
/// ```
pub fn parse_whole_amount(input: &str) -> Result<f64, EngineError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount("empty amount".to_string()));
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(EngineError::InvalidAmount(format!(
            "\"{trimmed}\" is not a whole number"
        )));
    }
    let value: u64 = trimmed
        .parse()
        .map_err(|_| EngineError::InvalidAmount("amount too large".to_string()))?;
    if value > MAX_INPUT_AMOUNT {
        return Err(EngineError::InvalidAmount("amount too large".to_string()));
    }
    Ok(value as f64)
}

/// Rounds to whole units, ties away from zero.
#[must_use]
pub fn round_half_up(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    value.round() as i64
}

/// Formats `value` rounded to whole units with Spanish digit grouping.
///
/// Thousands are separated by `.` only when the integer part has at least
/// five digits (`1500` stays `1500`, `15000` becomes `15.000`).
///
/// ```rust
/// use engine::format_rounded;
///
/// assert_eq!(format_rounded(1499.5), "1500");
/// assert_eq!(format_rounded(123456.0), "123.456");
/// assert_eq!(format_rounded(-99.5), "-100");
/// ```
#[must_use]
pub fn format_rounded(value: f64) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded < 0 { "-" } else { "" };
    let digits = rounded.unsigned_abs().to_string();
    if digits.len() < 5 {
        return format!("{sign}{digits}");
    }

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let head = digits.len() % 3;
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (idx + 3 - head) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}

/// Rounded amount followed by the currency symbol, e.g. `15.000 MX$`.
#[must_use]
pub fn format_amount(value: f64, currency: Currency) -> String {
    format!("{} {}", format_rounded(value), currency.symbol())
}
