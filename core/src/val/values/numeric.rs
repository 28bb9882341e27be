//! String to number conversion.
//!
//! The digit rule is closed: no whitespace trimming, no sign, no fraction,
//! no exponent. Digits `0-9` then `a-z` (case-insensitive) carry the values
//! `0..35`, most significant first.

use crate::error::{Result, RuntimeError};

use super::{Kind, Value};

const DEFAULT_BASE: f64 = 10.0;

/// `tonumber(value[, base])`.
///
/// Numbers pass through untouched. A string base is itself converted first
/// (base 10); `nil` or any other non-number base means 10. `Ok(None)` is the
/// guest `nil` result for a string that does not parse.
pub fn to_number(value: &Value, base: &Value) -> Result<Option<f64>> {
    if let Value::Number(n) = value {
        return Ok(Some(*n));
    }
    let base = match base {
        Value::Number(b) => *b,
        Value::Str(s) => parse_digits(s, DEFAULT_BASE)
            .ok_or_else(|| RuntimeError::expected(2, "tonumber", "number", Kind::String))?,
        _ => DEFAULT_BASE,
    };
    let Value::Str(text) = value else {
        return Err(RuntimeError::expected(1, "tonumber", "string", value.kind()));
    };
    if !(2.0..=36.0).contains(&base) {
        return Err(RuntimeError::Range(
            "bad argument #2 to 'tonumber' (base out of range)".to_string(),
        ));
    }
    Ok(parse_digits(text, base))
}

/// Best-effort coercion used by arithmetic: never fails, `None` means the
/// operand is not numeric.
#[inline]
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => Some(*n),
        Value::Str(s) => parse_digits(s, DEFAULT_BASE),
        _ => None,
    }
}

fn parse_digits(text: &str, base: f64) -> Option<f64> {
    let mut acc = 0.0;
    for c in text.chars().flat_map(char::to_lowercase) {
        if !c.is_ascii_digit() && !c.is_ascii_lowercase() {
            return None;
        }
        let digit = f64::from(c.to_digit(36)?);
        if digit >= base {
            return None;
        }
        acc = acc * base + digit;
    }
    Some(acc)
}
