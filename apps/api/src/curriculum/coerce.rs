//! Validate-or-default coercion primitives.
//!
//! Every function here is total: it takes an untyped JSON value and always
//! returns a typed value, substituting the documented default when the input
//! is missing or mistyped. The normalizer composes these bottom-up.

use serde_json::{Map, Value};

/// Renders any value as text. Strings pass through, `null` becomes `""`,
/// numbers and booleans use their literal form, objects and arrays are
/// rendered as compact JSON.
pub fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => render_number(n),
        other => other.to_string(),
    }
}

/// Coerces a value to a non-negative integer, defaulting to 0.
///
/// Numbers are truncated toward zero. Anything else is stringified and
/// parsed as a base-10 integer prefix (`"3 credits"` → 3). Negative results
/// clamp to 0; values past `u32::MAX` saturate.
pub fn coerce_u32(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                clamp_i64(i)
            } else if let Some(u) = n.as_u64() {
                u32::try_from(u).unwrap_or(u32::MAX)
            } else {
                n.as_f64().map(clamp_f64).unwrap_or(0)
            }
        }
        Value::Null => 0,
        other => parse_int_prefix(&coerce_string(other)).unwrap_or(0),
    }
}

/// Maps an array field element-by-element. Non-array input yields an empty
/// sequence; elements that `item` rejects are replaced by `fallback()`, so
/// the output always has exactly as many entries as the input array.
pub fn coerce_array<T>(
    value: Option<&Value>,
    item: impl Fn(&Value) -> Option<T>,
    fallback: impl Fn() -> T,
) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| item(v).unwrap_or_else(&fallback))
            .collect(),
        _ => Vec::new(),
    }
}

/// Collects the fields of `object` not named in `known`, preserved verbatim.
pub fn passthrough(object: &Map<String, Value>, known: &[&str]) -> Map<String, Value> {
    object
        .iter()
        .filter(|(k, _)| !known.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn render_number(n: &serde_json::Number) -> String {
    // 3.0 renders as "3", the way a JavaScript producer would print it.
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        _ => n.to_string(),
    }
}

fn clamp_i64(i: i64) -> u32 {
    if i < 0 {
        0
    } else {
        u32::try_from(i).unwrap_or(u32::MAX)
    }
}

fn clamp_f64(f: f64) -> u32 {
    if f.is_nan() || f <= 0.0 {
        0
    } else if f >= u32::MAX as f64 {
        u32::MAX
    } else {
        f.trunc() as u32
    }
}

/// Base-10 integer prefix parse: leading whitespace, optional sign, digits.
fn parse_int_prefix(text: &str) -> Option<u32> {
    let text = text.trim_start();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits: &str = &rest[..rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len())];
    if digits.is_empty() {
        return None;
    }
    if negative {
        return Some(0);
    }
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}
