//! The shared lexical layer: escape sequences, canonical numbers, the
//! quoting oracle, key rules, and primitive tokens.
//!
//! Both the encoder and decoder go through this module for every scalar that
//! touches the wire. Keeping the two directions on the same rules is what
//! makes `decode(encode(v))` an identity: a string is quoted on emit exactly
//! when reading it back unquoted would change its meaning.

use crate::error::{Result, ToonError};
use crate::options::Delimiter;
use crate::value::Value;

/// Magnitude bound (2^53) below which every integral f64 is an exact integer.
/// Integral floats inside the bound render and decode as integers.
pub(crate) const SAFE_INT_LIMIT: f64 = 9_007_199_254_740_992.0;

// ---------------------------------------------------------------------------
// Escape codec
// ---------------------------------------------------------------------------

/// Append `s` to `out` with the five TOON escapes applied. Everything else,
/// including non-ASCII, passes through verbatim; no Unicode escapes are ever
/// produced.
pub(crate) fn escape_into(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
}

/// Reverse [`escape_into`] over the interior of a quoted string. Only the
/// five permitted escapes are accepted: a lone trailing backslash is
/// `UnterminatedString`, any other follow-byte is `InvalidEscape`.
pub(crate) fn unescape(s: &str, line: usize) -> Result<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => return Err(ToonError::InvalidEscape { found: other, line }),
            None => return Err(ToonError::UnterminatedString { line }),
        }
    }
    Ok(out)
}

/// Position of the closing quote of a string opened just before `start`,
/// skipping escaped characters. Byte positions; quote and backslash are
/// ASCII so the returned index is always a char boundary.
pub(crate) fn find_closing_quote(s: &str, start: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Number codec
// ---------------------------------------------------------------------------

/// Canonical rendering of a float: `null` for NaN/infinities, `0` for signed
/// zero, integer form when integral within ±2^53, otherwise plain decimal
/// with no exponent and no trailing fractional zeros.
pub(crate) fn format_float(f: f64) -> String {
    if f.is_nan() || f.is_infinite() {
        return "null".to_string();
    }
    if f == 0.0 {
        return "0".to_string();
    }
    if f.fract() == 0.0 && f.abs() < SAFE_INT_LIMIT {
        return (f as i64).to_string();
    }
    let rendered = f.to_string();
    if rendered.contains(['e', 'E']) {
        expand_exponent(&rendered)
    } else {
        rendered
    }
}

/// Rewrite an exponent-form rendering (`1.5e3`, `-2E-4`) into plain decimal
/// by shifting the decimal point. Rust's `Display` for `f64` does not emit
/// exponents, so this is a guard that keeps the canonical form independent
/// of the formatter underneath.
fn expand_exponent(rendered: &str) -> String {
    let Some((mantissa, exp)) = rendered.split_once(['e', 'E']) else {
        return rendered.to_string();
    };
    let exp: i64 = match exp.parse() {
        Ok(e) => e,
        Err(_) => return rendered.to_string(),
    };
    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let digits: String = [int_part, frac_part].concat();
    let point = int_part.len() as i64 + exp;

    let mut out = String::from(sign);
    if point <= 0 {
        out.push_str("0.");
        for _ in 0..(-point) {
            out.push('0');
        }
        out.push_str(&digits);
    } else if point as usize >= digits.len() {
        out.push_str(&digits);
        for _ in 0..(point as usize - digits.len()) {
            out.push('0');
        }
        return out;
    } else {
        out.push_str(&digits[..point as usize]);
        out.push('.');
        out.push_str(&digits[point as usize..]);
    }
    while out.ends_with('0') {
        out.pop();
    }
    if out.ends_with('.') {
        out.pop();
    }
    if out.is_empty() || out == "-" {
        out = "0".to_string();
    }
    out
}

/// Does `s` match the numeric token grammar?
///
/// `-?` then one or more digits (a leading `0` may only be followed by `.`,
/// `e`, `E`, or the end of the token), then an optional `.` with at least one
/// digit, then an optional exponent with at least one digit. `05`, `1.`, and
/// `.5` all fail.
pub(crate) fn is_number_token(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    if i < bytes.len() && bytes[i] == b'-' {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == int_start {
        return false;
    }
    if bytes[int_start] == b'0' && i - int_start > 1 {
        return false;
    }
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return false;
        }
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if i < bytes.len() && (bytes[i] == b'+' || bytes[i] == b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}

/// Convert a token already validated by [`is_number_token`]. Plain integer
/// tokens parse as `i64` with overflow falling back to float; tokens with a
/// fraction or exponent go through `f64` and collapse back to `Int` when
/// integral within ±2^53. `-0` in any spelling folds to `0`.
pub(crate) fn number_value(token: &str) -> Value {
    if !token.contains(['.', 'e', 'E']) {
        if let Ok(i) = token.parse::<i64>() {
            return Value::Int(i);
        }
    }
    token.parse::<f64>().map_or(Value::Null, float_value)
}

/// Canonicalize a finite float into the value model: signed zero and
/// integral values within ±2^53 become `Int`.
pub(crate) fn float_value(f: f64) -> Value {
    if f == 0.0 {
        return Value::Int(0);
    }
    if f.fract() == 0.0 && f.abs() < SAFE_INT_LIMIT {
        Value::Int(f as i64)
    } else {
        Value::Float(f)
    }
}

/// Strict numeric parse for callers that want the rejection instead of the
/// string fallback the decoder uses.
pub(crate) fn parse_number(token: &str) -> Result<Value> {
    if !is_number_token(token) {
        return Err(ToonError::InvalidNumber {
            token: token.to_string(),
        });
    }
    Ok(number_value(token))
}

/// Would an unquoted `s` read back as a number? True when `s` matches the
/// number grammar, and also for the forbidden leading-zero spellings
/// (`05…`, `-07…`) which the grammar rejects but which are too
/// number-shaped to leave bare.
pub(crate) fn looks_like_number(s: &str) -> bool {
    if is_number_token(s) {
        return true;
    }
    let digits = s.strip_prefix('-').unwrap_or(s);
    let bytes = digits.as_bytes();
    bytes.len() >= 2 && bytes[0] == b'0' && bytes[1].is_ascii_digit()
}

// ---------------------------------------------------------------------------
// Quoting oracle and key rules
// ---------------------------------------------------------------------------

/// Must `s` be quoted when emitted under the active `delimiter`?
pub(crate) fn needs_quoting(s: &str, delimiter: Delimiter) -> bool {
    let bytes = s.as_bytes();
    let (Some(&first), Some(&last)) = (bytes.first(), bytes.last()) else {
        return true;
    };
    if first == b' ' || first == b'\t' || last == b' ' || last == b'\t' {
        return true;
    }
    if s == "true" || s == "false" || s == "null" {
        return true;
    }
    if looks_like_number(s) {
        return true;
    }
    if first == b'-' {
        return true;
    }
    if bytes.iter().any(|&b| {
        matches!(
            b,
            b':' | b'"' | b'\\' | b'[' | b']' | b'{' | b'}' | b'\n' | b'\r' | b'\t'
        )
    }) {
        return true;
    }
    s.contains(delimiter.as_char())
}

/// Keys matching `[A-Za-z_][A-Za-z0-9_.]*` go on the wire bare.
pub(crate) fn is_unquoted_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// One dot-separated unit of path expansion: `[A-Za-z_][A-Za-z0-9_]*`.
/// Stricter than [`is_unquoted_key`] — no dots.
pub(crate) fn is_identifier_segment(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Emit a key, quoting it when it is not a bare identifier.
pub(crate) fn write_key(key: &str, out: &mut String) {
    if is_unquoted_key(key) {
        out.push_str(key);
    } else {
        out.push('"');
        escape_into(key, out);
        out.push('"');
    }
}

// ---------------------------------------------------------------------------
// Primitive tokens
// ---------------------------------------------------------------------------

/// Emit a primitive value as its canonical wire token.
pub(crate) fn write_primitive(value: &Value, delimiter: Delimiter, out: &mut String) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Int(i) => out.push_str(&i.to_string()),
        Value::Float(f) => out.push_str(&format_float(*f)),
        Value::String(s) => {
            if needs_quoting(s, delimiter) {
                out.push('"');
                escape_into(s, out);
                out.push('"');
            } else {
                out.push_str(s);
            }
        }
        // Aggregates never reach a primitive position.
        Value::Array(_) | Value::Object(_) => out.push_str("null"),
    }
}

/// Read one primitive token. Surrounding spaces are insignificant. Quoted
/// tokens unescape; bare `null`/`true`/`false` and numeric tokens take their
/// literal types; everything else is the string as written.
pub(crate) fn parse_primitive_token(token: &str, line: usize) -> Result<Value> {
    let t = token.trim_matches(' ');
    if t.starts_with('"') {
        let end = find_closing_quote(t, 1).ok_or(ToonError::UnterminatedString { line })?;
        if end != t.len() - 1 {
            let found = t[end + 1..].chars().next().unwrap_or('"');
            return Err(ToonError::UnexpectedCharacter { found, line });
        }
        return Ok(Value::String(unescape(&t[1..end], line)?));
    }
    Ok(match t {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        other => parse_number(other).unwrap_or_else(|_| Value::String(other.to_string())),
    })
}
