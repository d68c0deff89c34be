//! Display formatting for amounts and ratios.
//!
//! Rounding is half away from zero on the shortest decimal representation of
//! the `f64`, so `1.005` renders as `$1.01` on every platform.

use rust_decimal::prelude::*;
use rust_decimal_macros::dec;

use crate::types::{Money, Ratio};

const CURRENCY_SYMBOL: &str = "$";
const CURRENCY_DP: u32 = 2;
const PERCENT_DP: u32 = 1;
const UNDEFINED_RATIO: &str = "N/A";

/// `-$1,234.57` style, two decimals, comma grouping.
pub fn format_currency(value: Money) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    let (negative, digits) = match to_decimal(value) {
        Some(d) => fixed(d, CURRENCY_DP),
        // Beyond Decimal's range; f64 formatting is the only option left.
        None => (value < 0.0, format!("{:.2}", value.abs())),
    };
    let sign = if negative { "-" } else { "" };
    format!("{sign}{CURRENCY_SYMBOL}{}", group_thousands(&digits))
}

/// A fraction as a percentage with one decimal: `0.705` -> `70.5%`.
pub fn format_percent(fraction: f64) -> String {
    if !fraction.is_finite() {
        return non_finite(fraction);
    }
    let (negative, digits) = match to_decimal(fraction).and_then(|d| d.checked_mul(dec!(100))) {
        Some(d) => fixed(d, PERCENT_DP),
        None => (fraction < 0.0, format!("{:.1}", (fraction * 100.0).abs())),
    };
    let sign = if negative { "-" } else { "" };
    format!("{sign}{digits}%")
}

/// `format_percent`, or `N/A` for an undefined ratio.
pub fn format_ratio(ratio: Ratio) -> String {
    match ratio {
        Ratio::Fraction(v) => format_percent(v),
        Ratio::Undefined => UNDEFINED_RATIO.to_string(),
    }
}

/// Parse a formatted amount back to a number. Accepts `$`, commas,
/// whitespace, a leading minus or accounting parentheses.
pub fn parse_currency(text: &str) -> Option<Money> {
    let trimmed = text.trim();
    let (negative, body) = if let Some(inner) = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
    {
        (true, inner)
    } else if let Some(rest) = trimmed.strip_prefix('-') {
        (true, rest)
    } else {
        (false, trimmed)
    };

    let cleaned: String = body
        .chars()
        .filter(|c| !matches!(c, '$' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() || cleaned.starts_with('-') {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    Some(if negative { -value } else { value })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn to_decimal(value: f64) -> Option<Decimal> {
    Decimal::from_str(&value.to_string()).ok()
}

/// Absolute value rounded to `dp` places with exactly `dp` digits, plus
/// whether a minus sign is needed. Values that round to zero are unsigned.
fn fixed(value: Decimal, dp: u32) -> (bool, String) {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    rounded = rounded.abs();
    rounded.rescale(dp);
    (negative, rounded.to_string())
}

fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value > 0.0 {
        "Infinity".to_string()
    } else {
        "-Infinity".to_string()
    }
}
