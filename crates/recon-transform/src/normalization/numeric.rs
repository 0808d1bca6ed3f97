//! Numeric rounding and formatting.

use recon_model::RawValue;

/// Normalize a value of a numeric column.
///
/// Values that coerce to a finite number are rounded to two decimals (ties to
/// even) and always rendered with exactly two. Anything else keeps its text
/// form, so a stray `"n/a"` survives as `n/a`. Null becomes an empty string.
pub fn normalize_numeric(value: &RawValue) -> String {
    if value.is_null() {
        return String::new();
    }
    match value.as_f64() {
        Some(number) => format_cents(number),
        None => value.to_text(),
    }
}

/// Formats a finite number with two decimals after rounding half to even.
pub fn format_cents(value: f64) -> String {
    let scaled = value * 100.0;
    let rounded = if scaled.is_finite() {
        scaled.round_ties_even() / 100.0
    } else {
        value
    };
    format!("{rounded:.2}")
}
