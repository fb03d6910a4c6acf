//! Lenient deserializers for CMS payloads.
//!
//! The content API is inconsistent: ACF bags arrive as `false` when empty,
//! ids arrive as numbers or strings, rendered fields sometimes arrive bare.
//! None of that should fail a whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize `T`, or fall back to `T::default()` when the value has the wrong shape
pub fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Numeric or string identifier, normalized to a trimmed string
pub fn id_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    })
}

/// Numeric id, accepting numeric strings
pub fn id_number<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from(&value))
}

/// Array of term ids; anything else is an empty list
pub fn term_ids<'de, D>(deserializer: D) -> Result<Vec<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(number_from).collect(),
        other => number_from(&other).into_iter().collect(),
    })
}

fn number_from(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coerce a loosely-typed metadata value to a display string.
///
/// Strings are trimmed, numbers printed, `true` becomes `"1"`, arrays yield
/// their first scalar. Empty results are `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(true) => "1".to_string(),
        Value::Array(items) => return items.iter().find_map(scalar_to_string),
        Value::Bool(false) | Value::Null | Value::Object(_) => return None,
    };

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
