//! Type-checked extraction of individual keys from a [`RawConfig`].
//!
//! Scalars are coerced weakly the way template authors expect: numbers are
//! accepted where strings are required, numeric strings where integers are
//! required, and `"true"`/`"1"`-style strings where booleans are required.
//! Lists and maps never decode into a scalar.

use serde_json::Value;

use super::RawConfig;
use super::error::{ConfigError, field};

/// Returns a short name for the kind of a raw value, for error messages.
#[must_use]
pub fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

fn mismatch(key: &str, expected: &'static str, value: &Value) -> ConfigError {
    ConfigError::Decode {
        key: key.to_string(),
        expected,
        found: kind(value),
    }
}

/// Looks up `key`, treating an explicit `null` as absent.
fn lookup<'a>(raw: &'a RawConfig, key: &str) -> Option<&'a Value> {
    raw.get(key).filter(|v| !v.is_null())
}

/// Extracts a string value.
///
/// # Errors
///
/// Returns [`ConfigError::Decode`] if the value is a list or map.
pub fn string(raw: &RawConfig, key: &str) -> Result<Option<String>, ConfigError> {
    let Some(value) = lookup(raw, key) else {
        return Ok(None);
    };

    match value {
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(if *b { "1" } else { "0" }.to_string())),
        _ => Err(mismatch(key, "string", value)),
    }
}

/// Extracts an integer value.
///
/// An empty string decodes as `0`.
///
/// # Errors
///
/// Returns [`ConfigError::Decode`] if the value is not integral.
pub fn integer(raw: &RawConfig, key: &str) -> Result<Option<i64>, ConfigError> {
    let Some(value) = lookup(raw, key) else {
        return Ok(None);
    };

    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| whole_float(n.as_f64()?)),
        Value::String(s) if s.trim().is_empty() => Some(0),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    };

    parsed.map(Some).ok_or_else(|| mismatch(key, "int", value))
}

#[allow(clippy::cast_possible_truncation)]
fn whole_float(f: f64) -> Option<i64> {
    // Bounds keep the cast exact.
    (f.fract() == 0.0 && (-9.0e15..=9.0e15).contains(&f)).then_some(f as i64)
}

/// Extracts a boolean value.
///
/// # Errors
///
/// Returns [`ConfigError::Decode`] if the value cannot be read as a boolean.
pub fn boolean(raw: &RawConfig, key: &str) -> Result<Option<bool>, ConfigError> {
    let Some(value) = lookup(raw, key) else {
        return Ok(None);
    };

    let parsed = match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => parse_bool(s),
        _ => None,
    };

    parsed.map(Some).ok_or_else(|| mismatch(key, "bool", value))
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "" | "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        _ => None,
    }
}

/// Returns an [`ConfigError::UnknownKey`] for every key outside the schema.
pub fn unknown_keys(raw: &RawConfig) -> impl Iterator<Item = ConfigError> + '_ {
    raw.keys()
        .filter(|key| !field::ALL.contains(&key.as_str()))
        .map(|key| ConfigError::UnknownKey { key: key.clone() })
}
