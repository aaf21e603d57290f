//! Forgiving field deserializers for scan-engine payloads.
//!
//! The scan engine is loose about types: numbers may be missing, null or
//! strings, nested objects may be `false`. None of that is an error here; a
//! field that can't be read becomes `None` and degrades to an empty export cell.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::shape::{truthy, WindowEntries, WindowedBlock};

/// Numbers only; anything else is `None`.
pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}

/// Numbers or numeric strings.
pub fn opt_f64_or_str<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    })
}

/// Marks the field as present even when it is null or not a number.
///
/// Use with `#[serde(default)]`: absent gives `None`, present gives
/// `Some(number-or-None)`.
pub fn present_f64<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(value.as_f64()))
}

/// Present fields become their truthiness, null included (null is `false`).
pub fn present_truthy<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Some(truthy(&value)))
}

/// Like [`present_truthy`] but null counts as absent.
pub fn non_null_truthy<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(if value.is_null() { None } else { Some(truthy(&value)) })
}

/// Truthiness with absent as `false`.
pub fn truthy_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(truthy(&value))
}

/// Strings as-is, numbers and `true` displayed, falsy values empty.
pub fn display_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) if n.as_f64() != Some(0.0) => n.to_string(),
        Value::Bool(true) => "true".to_string(),
        _ => String::new(),
    })
}

/// A nested object that is read only when the value is truthy.
///
/// Truthy non-objects read as `T::default()`: every property of them is
/// undefined.
pub fn opt_object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(object_or_default(&value))
}

pub(crate) fn object_or_default<T>(value: &Value) -> Option<T>
where
    T: DeserializeOwned + Default,
{
    if !truthy(value) {
        return None;
    }
    match value {
        Value::Object(_) => Some(serde_json::from_value(value.clone()).unwrap_or_default()),
        _ => Some(T::default()),
    }
}

/// Analysis block that is either flat or keyed by window length.
pub fn opt_windowed<'de, D, T>(deserializer: D) -> Result<Option<WindowedBlock<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(WindowedBlock::from_value(&value))
}

/// Mapping keyed by window label, kept in property order.
pub fn opt_window_entries<'de, D, T>(deserializer: D) -> Result<Option<WindowEntries<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(WindowEntries::from_value(&value))
}

/// Sequence whose unreadable elements are skipped.
pub fn opt_vec<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}
