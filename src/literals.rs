//! Scalar literal parsers: strings, booleans, integers and floats.
//!
//! The float path splits a decimal into `(mantissa, exp10, negative)` and
//! hands that triple to a two-tier decoder: an exact-multiply fast path for
//! small mantissas and exponents, falling back to `serde_json`'s number
//! parser for the rest. A decoder miss (exponent out of range) yields `0.0`
//! with no error; callers that need stricter behavior must bound their
//! exponents first.

use crate::error::{Error, Result};
use crate::escape::unescape;

const TRUE_LITERAL: &[u8] = b"true";
const FALSE_LITERAL: &[u8] = b"false";

/// Parses a raw (unquoted) string body, decoding escape sequences.
pub fn parse_string_literal(data: &[u8]) -> Result<String> {
    let decoded = unescape(data)
        .map_err(|_| Error::malformed_string("invalid string input found while parsing string value"))?;
    String::from_utf8(decoded.into_owned())
        .map_err(|_| Error::malformed_string("invalid string input found while parsing string value"))
}

/// Parses `true` or `false`.
pub fn parse_bool_literal(data: &[u8]) -> Result<bool> {
    match data {
        TRUE_LITERAL => Ok(true),
        FALSE_LITERAL => Ok(false),
        _ => Err(Error::invalid_number(
            "malformed boolean value found while parsing boolean value",
        )),
    }
}

/// Parses a signed decimal integer with full 64-bit range, including the
/// boundary value `-2^63`.
pub fn parse_int_literal(data: &[u8]) -> Result<i64> {
    if data.is_empty() {
        return Err(Error::invalid_number(
            "empty byte slice found while parsing integer value",
        ));
    }

    let (neg, digits) = trim_negative_sign(data);

    let mut n: u64 = 0;
    for &c in digits {
        if !c.is_ascii_digit() {
            return Err(Error::invalid_number(
                "non-digit characters found while parsing integer value",
            ));
        }
        n = n
            .checked_mul(10)
            .and_then(|m| m.checked_add(u64::from(c - b'0')))
            .ok_or_else(|| Error::overflow("numeric value exceeds the range limit"))?;
    }

    if n > i64::MAX as u64 {
        if neg && n == (1 << 63) {
            return Ok(i64::MIN);
        }
        return Err(Error::overflow("numeric value exceeds the range limit"));
    }

    Ok(if neg { -(n as i64) } else { n as i64 })
}

/// Parses a decimal floating-point literal.
///
/// The accepted grammar is `-? digits ('.' digits)? ([eE][+-]?digits)?`; a
/// leading `.` is tolerated because the mantissa accumulator starts at zero.
pub fn parse_float_literal(data: &[u8]) -> Result<f64> {
    if data.is_empty() {
        return Err(Error::invalid_number(
            "empty byte slice found while parsing float value",
        ));
    }

    let (neg, rest) = trim_negative_sign(data);

    let mut mantissa_part = rest;
    let mut exponent_part: &[u8] = &[];
    for (i, &c) in rest.iter().enumerate() {
        if c.eq_ignore_ascii_case(&b'e') {
            exponent_part = &rest[i + 1..];
            mantissa_part = &rest[..i];
            break;
        }
    }

    let (man, mut exp10) = extract_mantissa_and_exp10(mantissa_part)?;

    if !exponent_part.is_empty() || mantissa_part.len() != rest.len() {
        let written: i64 = std::str::from_utf8(exponent_part)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                Error::invalid_number("invalid exponent value found while parsing float value")
            })?;
        exp10 += written;
    }

    match decimal_to_f64(man, exp10, neg) {
        Some(f) => Ok(f),
        // Fast-path miss: out-of-range exponents decode to zero, not an error.
        None => Ok(0.0),
    }
}

/// Splits a decimal digit run (with at most one point) into a `u64` mantissa
/// and the base-10 exponent correction accumulated from fractional digits.
fn extract_mantissa_and_exp10(data: &[u8]) -> Result<(u64, i64)> {
    let mut man: u64 = 0;
    let mut exp10: i64 = 0;
    let mut decimal_found = false;

    for &c in data {
        if c == b'.' {
            if decimal_found {
                return Err(Error::invalid_number(
                    "multiple decimal points found while parsing float value",
                ));
            }
            decimal_found = true;
            continue;
        }

        if !c.is_ascii_digit() {
            return Err(Error::invalid_number(
                "non-digit characters found while parsing float value",
            ));
        }

        let digit = u64::from(c - b'0');
        man = man
            .checked_mul(10)
            .and_then(|m| m.checked_add(digit))
            .ok_or_else(|| Error::overflow("numeric value exceeds the range limit"))?;

        if decimal_found {
            exp10 -= 1;
        }
    }

    Ok((man, exp10))
}

fn trim_negative_sign(data: &[u8]) -> (bool, &[u8]) {
    match data.first() {
        Some(b'-') => (true, &data[1..]),
        _ => (false, data),
    }
}

/// Exact powers of ten representable in an `f64`.
const POW10: [f64; 23] = [
    1e0, 1e1, 1e2, 1e3, 1e4, 1e5, 1e6, 1e7, 1e8, 1e9, 1e10, 1e11, 1e12, 1e13, 1e14, 1e15, 1e16,
    1e17, 1e18, 1e19, 1e20, 1e21, 1e22,
];

/// Decodes `(mantissa, exp10, negative)` into the nearest `f64`.
///
/// Mantissas below 2^53 with |exp10| <= 22 are decoded with one exact
/// multiply or divide. Everything else is re-rendered and pushed through
/// `serde_json`'s number parser. `None` reports a miss: the exponent falls
/// outside the decodable range.
fn decimal_to_f64(man: u64, exp10: i64, neg: bool) -> Option<f64> {
    if man == 0 {
        return Some(if neg { -0.0 } else { 0.0 });
    }
    if !(-342..=308).contains(&exp10) {
        return None;
    }

    if man < (1 << 53) && (-22..=22).contains(&exp10) {
        let mut f = man as f64;
        if exp10 < 0 {
            f /= POW10[(-exp10) as usize];
        } else {
            f *= POW10[exp10 as usize];
        }
        return Some(if neg { -f } else { f });
    }

    let rendered = format!("{}{man}e{exp10}", if neg { "-" } else { "" });
    serde_json::from_str::<f64>(&rendered).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mantissa_extraction_tracks_fraction_digits() {
        assert_eq!(extract_mantissa_and_exp10(b"123").expect("parse"), (123, 0));
        assert_eq!(
            extract_mantissa_and_exp10(b"12.25").expect("parse"),
            (1225, -2)
        );
        assert_eq!(extract_mantissa_and_exp10(b".5").expect("parse"), (5, -1));
        assert!(extract_mantissa_and_exp10(b"1.2.3").is_err());
        assert!(extract_mantissa_and_exp10(b"12a").is_err());
    }

    #[test]
    fn decimal_decoder_handles_both_tiers() {
        assert_eq!(decimal_to_f64(1225, -2, false), Some(12.25));
        assert_eq!(decimal_to_f64(5, -1, true), Some(-0.5));
        // Mantissa too wide for the multiply path, still exact via fallback.
        assert_eq!(
            decimal_to_f64(9_007_199_254_740_993, 0, false),
            Some(9_007_199_254_740_992.0)
        );
        assert_eq!(decimal_to_f64(1, 400, false), None);
    }
}
