//! Plain-scalar resolution and the numeric literal forms YAML accepts.

use crate::Tag;

/// Resolve the tag of an untagged plain scalar using the YAML core schema.
///
/// Quoted and block scalars are never resolved; the parser tags them `str`.
pub fn resolve_plain(value: &str) -> Tag {
    match value {
        "" | "~" | "null" | "Null" | "NULL" => Tag::Null,
        "true" | "True" | "TRUE" | "false" | "False" | "FALSE" => Tag::Bool,
        _ if parse_int(value).is_some() => Tag::Int,
        _ if parse_float(value).is_some() || is_overflowing_decimal(value) => Tag::Float,
        _ => Tag::Str,
    }
}

/// Decimal literal whose magnitude is too large for an `i64`.
fn is_overflowing_decimal(value: &str) -> bool {
    let body = value.strip_prefix(['+', '-']).unwrap_or(value);
    !body.is_empty() && body.bytes().all(|b| b.is_ascii_digit())
}

/// Split a `0x`/`0o`/`0b` prefix (either case) off an unsigned literal.
fn radix_body(body: &str) -> Option<(u32, &str)> {
    let prefix = body.get(..2)?;
    let radix = match prefix {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    Some((radix, &body[2..]))
}

fn parse_magnitude(body: &str) -> Option<u64> {
    let (radix, digits) = radix_body(body).unwrap_or((10, body));
    // from_str_radix would accept a second sign
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    u64::from_str_radix(digits, radix).ok()
}

/// Parse an integer in decimal, hex (`0x`), octal (`0o`) or binary (`0b`)
/// form with an optional sign. The signed value has to fit in an `i64`.
///
/// A leading zero does not make a literal octal: `010` is ten.
///
/// ```
/// use yamlschema_yaml::scalar::parse_int;
///
/// assert_eq!(parse_int("0x2A"), Some(42));
/// assert_eq!(parse_int("-0b11"), Some(-3));
/// assert_eq!(parse_int("010"), Some(10));
/// assert_eq!(parse_int("1.0"), None);
/// ```
pub fn parse_int(value: &str) -> Option<i64> {
    let (negative, body) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    let magnitude = i128::from(parse_magnitude(body)?);
    i64::try_from(if negative { -magnitude } else { magnitude }).ok()
}

/// Parse the special float forms `.inf`, `+.inf`, `-.inf` and `.nan` in any
/// letter case.
pub fn parse_special_float(value: &str) -> Option<f64> {
    match value.to_ascii_lowercase().as_str() {
        ".inf" | "+.inf" => Some(f64::INFINITY),
        "-.inf" => Some(f64::NEG_INFINITY),
        ".nan" => Some(f64::NAN),
        _ => None,
    }
}

/// Parse a float literal.
///
/// Apart from the special forms, a float must contain `.`, `e` or `E` so that
/// integers are never read as floats.
///
/// ```
/// use yamlschema_yaml::scalar::parse_float;
///
/// assert_eq!(parse_float("1.5"), Some(1.5));
/// assert_eq!(parse_float("2e3"), Some(2000.0));
/// assert!(parse_float("-.INF").unwrap().is_infinite());
/// assert_eq!(parse_float("12"), None);
/// ```
pub fn parse_float(value: &str) -> Option<f64> {
    if let Some(special) = parse_special_float(value) {
        return Some(special);
    }
    if !value.contains(['.', 'e', 'E']) {
        return None;
    }
    // Rust also reads words like `inf`; keep to the numeric alphabet.
    if !value
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }
    value.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_plain_core_schema() {
        assert_eq!(resolve_plain(""), Tag::Null);
        assert_eq!(resolve_plain("~"), Tag::Null);
        assert_eq!(resolve_plain("NULL"), Tag::Null);
        assert_eq!(resolve_plain("True"), Tag::Bool);
        assert_eq!(resolve_plain("42"), Tag::Int);
        assert_eq!(resolve_plain("-0x2A"), Tag::Int);
        assert_eq!(resolve_plain("0o52"), Tag::Int);
        assert_eq!(resolve_plain("3.14"), Tag::Float);
        assert_eq!(resolve_plain(".NaN"), Tag::Float);
        assert_eq!(resolve_plain("yes"), Tag::Str);
        assert_eq!(resolve_plain("nUll"), Tag::Str);
        assert_eq!(resolve_plain("0x"), Tag::Str);
        assert_eq!(resolve_plain("inf"), Tag::Str);
        assert_eq!(resolve_plain("v1.2.3"), Tag::Str);
        assert_eq!(resolve_plain("99999999999999999999"), Tag::Float);
    }

    #[test]
    fn test_parse_int_forms() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("+7"), Some(7));
        assert_eq!(parse_int("0o52"), Some(42));
        assert_eq!(parse_int("0B101010"), Some(42));
        assert_eq!(parse_int("0x-5"), None);
        assert_eq!(parse_int("--5"), None);
    }

    #[test]
    fn test_parse_int_extremes() {
        assert_eq!(parse_int("-9223372036854775808"), Some(i64::MIN));
        assert_eq!(parse_int("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_int("9223372036854775808"), None);
        assert_eq!(parse_int("-0x8000000000000000"), Some(i64::MIN));
        assert_eq!(resolve_plain("-9223372036854775808"), Tag::Int);
        assert_eq!(resolve_plain("-9223372036854775809"), Tag::Float);
        assert_eq!(parse_int("9223372036854775808"), None);
        assert_eq!(parse_int(""), None);
    }

    #[test]
    fn test_parse_float_rejects_words() {
        assert_eq!(parse_float("infinity"), None);
        assert_eq!(parse_float("NaN"), None);
        assert_eq!(parse_float("1.2.3"), None);
        assert_eq!(parse_float(".5"), Some(0.5));
    }
}
