//! Amount handling in integer minor units (cents), avoiding float error.

use crate::errors::{ExpenseError, Result};

/// Parses a user-supplied decimal string into cents, rounding half-up (away
/// from zero) at the third fractional digit.
pub fn parse_amount(text: &str) -> Result<i64> {
    let invalid = || ExpenseError::InvalidAmount(text.to_string());
    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    if !int_part.bytes().all(|b| b.is_ascii_digit()) || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(invalid());
    }
    let whole: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().map_err(|_| invalid())?
    };
    let frac = frac_part.as_bytes();
    let tenths = frac.first().map_or(0, |b| i64::from(b - b'0'));
    let hundredths = frac.get(1).map_or(0, |b| i64::from(b - b'0'));
    let mut cents = whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(tenths * 10 + hundredths))
        .ok_or_else(invalid)?;
    if frac.get(2).is_some_and(|b| *b >= b'5') {
        cents += 1;
    }
    Ok(if negative { -cents } else { cents })
}

/// Renders cents as a plain decimal string, e.g. `-1200.05`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let magnitude = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, magnitude / 100, magnitude % 100)
}

/// `CUR 12.34` as printed in listings.
pub fn display_amount(currency: &str, cents: i64) -> String {
    format!("{} {}", currency, format_cents(cents))
}

/// Currency codes are stored uppercased (ISO 4217 style).
pub fn normalize_currency(code: &str) -> String {
    code.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amount_whole_and_fractional() {
        assert_eq!(parse_amount("1200.00").unwrap(), 120000);
        assert_eq!(parse_amount("12").unwrap(), 1200);
        assert_eq!(parse_amount("12.3").unwrap(), 1230);
        assert_eq!(parse_amount(".50").unwrap(), 50);
        assert_eq!(parse_amount("-5.25").unwrap(), -525);
    }

    #[test]
    fn parse_amount_rounds_half_up() {
        assert_eq!(parse_amount("0.005").unwrap(), 1);
        assert_eq!(parse_amount("2.675").unwrap(), 268);
        assert_eq!(parse_amount("2.6749").unwrap(), 267);
        assert_eq!(parse_amount("-0.005").unwrap(), -1);
    }

    #[test]
    fn parse_amount_rejects_malformed_input() {
        for text in ["", ".", "12.3.4", "1,200", "abc", "12f"] {
            assert!(parse_amount(text).is_err(), "accepted {text:?}");
        }
    }

    #[test]
    fn format_cents_pads_and_signs() {
        assert_eq!(format_cents(120000), "1200.00");
        assert_eq!(format_cents(5), "0.05");
        assert_eq!(format_cents(-525), "-5.25");
    }

    #[test]
    fn currency_codes_uppercase() {
        assert_eq!(normalize_currency(" usd "), "USD");
    }
}
