//! Resolving the shape of scan-engine analysis blocks.
//!
//! Blocks such as `volume_analysis` arrive either as one flat object or as a
//! mapping keyed by window length (`{"30": {...}, "60": {...}}`). The shape is
//! decided once, when the payload is read, by checking whether the first key
//! parses as an integer. Key order follows JavaScript property order: keys
//! that are canonical array indices come first in ascending numeric order,
//! then every other key in insertion order.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::lenient::object_or_default;

/// JavaScript truthiness of a JSON value.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Whether `key` is a canonical array index ("0", "30", but not "030" or "-1").
fn is_array_index(key: &str) -> bool {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    if key.len() > 1 && key.starts_with('0') {
        return false;
    }
    matches!(key.parse::<u64>(), Ok(n) if n < u32::MAX as u64)
}

/// `parseInt` succeeds when, after leading whitespace and an optional sign,
/// the key starts with a decimal digit.
pub fn parses_as_int(key: &str) -> bool {
    let rest = key.trim_start();
    let rest = rest.strip_prefix(['+', '-']).unwrap_or(rest);
    rest.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Entries of a JSON object in JavaScript property order.
pub fn js_ordered_entries(map: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let (mut indices, others): (Vec<_>, Vec<_>) = map.iter().partition(|(k, _)| is_array_index(k));
    indices.sort_by_key(|(k, _)| k.parse::<u64>().unwrap_or(u64::MAX));
    indices.extend(others);
    indices
}

/// A mapping keyed by window label, in property order.
///
/// Falsy window values are kept as `None` so that "first window" lookups see
/// the same entry the scan front-end did.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowEntries<T>(Vec<(String, Option<T>)>);

impl<T> WindowEntries<T> {
    pub fn new(entries: Vec<(String, Option<T>)>) -> Self {
        Self(entries)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&T>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Values of the windows that carry data.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.0.iter().filter_map(|(_, v)| v.as_ref())
    }

    /// The first window in property order, if its value is truthy.
    pub fn first(&self) -> Option<&T> {
        self.0.first().and_then(|(_, v)| v.as_ref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: DeserializeOwned + Default> WindowEntries<T> {
    /// Read a JSON object (or array, keyed by index). Other values give `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(
                js_ordered_entries(map)
                    .into_iter()
                    .map(|(k, v)| (k.clone(), object_or_default(v)))
                    .collect(),
            )),
            Value::Array(items) => Some(Self(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), object_or_default(v)))
                    .collect(),
            )),
            _ => None,
        }
    }
}

/// An analysis block resolved to its shape.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowedBlock<T> {
    Flat(T),
    ByWindow(WindowEntries<T>),
}

impl<T> WindowedBlock<T> {
    pub fn flat(&self) -> Option<&T> {
        match self {
            WindowedBlock::Flat(block) => Some(block),
            WindowedBlock::ByWindow(_) => None,
        }
    }

    pub fn windows(&self) -> Option<&WindowEntries<T>> {
        match self {
            WindowedBlock::Flat(_) => None,
            WindowedBlock::ByWindow(entries) => Some(entries),
        }
    }

    /// The flat block, or the first window's block.
    pub fn primary(&self) -> Option<&T> {
        match self {
            WindowedBlock::Flat(block) => Some(block),
            WindowedBlock::ByWindow(entries) => entries.first(),
        }
    }
}

impl<T: DeserializeOwned + Default> WindowedBlock<T> {
    /// Decide the shape of a raw block. Non-object values (null, numbers,
    /// strings) are treated as absent; an empty object is an empty flat block.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(_) => WindowEntries::from_value(value).map(WindowedBlock::ByWindow),
            Value::Object(map) => {
                let keyed_by_window = js_ordered_entries(map)
                    .first()
                    .is_some_and(|(k, _)| parses_as_int(k));
                if keyed_by_window {
                    WindowEntries::from_value(value).map(WindowedBlock::ByWindow)
                } else {
                    tracing::trace!("analysis block read as flat object");
                    Some(WindowedBlock::Flat(
                        serde_json::from_value(value.clone()).unwrap_or_default(),
                    ))
                }
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Block {
        #[serde(default)]
        value: Option<f64>,
    }

    #[test]
    fn test_truthy() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(!truthy(&json!(false)));
        assert!(truthy(&json!([])));
        assert!(truthy(&json!({})));
        assert!(truthy(&json!("0")));
        assert!(truthy(&json!(-1.5)));
    }

    #[test]
    fn test_parses_as_int() {
        assert!(parses_as_int("30"));
        assert!(parses_as_int(" -5"));
        assert!(parses_as_int("60d"));
        assert!(!parses_as_int("has_breakthrough"));
        assert!(!parses_as_int(""));
        assert!(!parses_as_int("-"));
    }

    #[test]
    fn test_js_order_puts_indices_first() {
        let value = json!({"b": 1, "90": 2, "a": 3, "30": 4, "060": 5});
        let map = value.as_object().unwrap();
        let keys: Vec<&str> = js_ordered_entries(map).into_iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["30", "90", "b", "a", "060"]);
    }

    #[test]
    fn test_flat_block() {
        let block: WindowedBlock<Block> = WindowedBlock::from_value(&json!({"value": 1.5})).unwrap();
        assert_eq!(block.flat(), Some(&Block { value: Some(1.5) }));
        assert_eq!(block.primary(), Some(&Block { value: Some(1.5) }));
    }

    #[test]
    fn test_window_keyed_block_uses_smallest_window_first() {
        let raw = json!({"90": {"value": 9.0}, "30": {"value": 3.0}});
        let block: WindowedBlock<Block> = WindowedBlock::from_value(&raw).unwrap();
        assert!(block.flat().is_none());
        assert_eq!(block.primary(), Some(&Block { value: Some(3.0) }));
        assert_eq!(block.windows().unwrap().len(), 2);
    }

    #[test]
    fn test_empty_object_is_empty_flat_block() {
        let block: WindowedBlock<Block> = WindowedBlock::from_value(&json!({})).unwrap();
        assert_eq!(block, WindowedBlock::Flat(Block::default()));
    }

    #[test]
    fn test_falsy_first_window_has_no_primary() {
        let raw = json!({"30": null, "60": {"value": 6.0}});
        let block: WindowedBlock<Block> = WindowedBlock::from_value(&raw).unwrap();
        assert_eq!(block.primary(), None);
    }

    #[test]
    fn test_array_is_window_keyed() {
        let raw = json!([{"value": 1.0}, {"value": 2.0}]);
        let block: WindowedBlock<Block> = WindowedBlock::from_value(&raw).unwrap();
        assert_eq!(block.primary(), Some(&Block { value: Some(1.0) }));
    }

    #[test]
    fn test_scalars_are_absent() {
        assert!(WindowedBlock::<Block>::from_value(&json!(null)).is_none());
        assert!(WindowedBlock::<Block>::from_value(&json!("x")).is_none());
        assert!(WindowedBlock::<Block>::from_value(&json!(3)).is_none());
    }
}
