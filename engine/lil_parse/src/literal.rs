//! Restricted numeric literal lexers.
//!
//! Deliberately narrower than `str::parse`: the script dialect accepts only
//! plain decimal integers and dotted decimals with no exponent notation, so
//! `1e3` stays a symbol instead of becoming a number.

/// Lex a signed decimal integer: optional leading `+`/`-`, then one or more
/// digits. Anything else is not an integer literal.
pub fn parse_decimal_int(text: &str) -> Option<i32> {
    let bytes = text.as_bytes();
    let (sign, digits) = match bytes.first()? {
        b'-' => (-1i32, &bytes[1..]),
        b'+' => (1, &bytes[1..]),
        _ => (1, bytes),
    };
    if digits.is_empty() {
        return None;
    }
    let mut value: i32 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value.wrapping_mul(10).wrapping_add(i32::from(b - b'0'));
    }
    Some(sign * value)
}

/// Lex a float: optional leading `-`, digits, optional `.`, digits. No
/// exponent. At least one digit must be present somewhere.
pub fn parse_float(text: &str) -> Option<f32> {
    let bytes = text.as_bytes();
    let (sign, rest) = match bytes.first()? {
        b'-' => (-1.0f32, &bytes[1..]),
        _ => (1.0, bytes),
    };
    let mut value = 0.0f32;
    let mut seen_digit = false;
    let mut i = 0usize;
    while i < rest.len() {
        let b = rest[i];
        if b == b'.' {
            break;
        }
        if !b.is_ascii_digit() {
            return None;
        }
        value = value * 10.0 + f32::from(b - b'0');
        seen_digit = true;
        i += 1;
    }
    // Fractional part after the dot, if any.
    i += 1;
    let mut scale = 0.1f32;
    while i < rest.len() {
        let b = rest[i];
        if !b.is_ascii_digit() {
            return None;
        }
        value += f32::from(b - b'0') * scale;
        scale *= 0.1;
        seen_digit = true;
        i += 1;
    }
    if !seen_digit {
        return None;
    }
    Some(sign * value)
}
