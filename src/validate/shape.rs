//! Shape classification for raw values.
//!
//! Raw input is carried as `serde_json::Value`. The three row shapes form a
//! closed set determined by one capability check; everything downstream
//! dispatches on the tag instead of re-probing the value.

use serde_json::Value;

/// Capability classification of a raw row representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    /// Supports lookup by field name (`Value::Object`)
    Mapping,
    /// Supports ordered positional access (`Value::Array`)
    Sequence,
    /// Neither: a bare value
    Scalar,
}

impl RowShape {
    /// Classifies one raw row.
    pub fn of(value: &Value) -> RowShape {
        match value {
            Value::Object(_) => RowShape::Mapping,
            Value::Array(_) => RowShape::Sequence,
            _ => RowShape::Scalar,
        }
    }
}

/// Classification of a raw key: a bare value, or a container of N parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyShape {
    /// A key with no length of its own
    Singleton,
    /// A key composed of N parts
    Container(usize),
}

impl KeyShape {
    /// Classifies one raw key.
    pub fn of(value: &Value) -> KeyShape {
        match value {
            Value::Array(parts) => KeyShape::Container(parts.len()),
            Value::Object(entries) => KeyShape::Container(entries.len()),
            _ => KeyShape::Singleton,
        }
    }
}

/// Extracts the (key, row) entries of a raw table, or `None` if the value is
/// not mapping-like.
///
/// Two encodings are accepted, both order-preserving:
/// - an object, whose string keys are singleton keys;
/// - an association list of two-element `[key, row]` entries, whose keys may
///   be scalars (singleton) or arrays (composite).
///
/// An association-list entry that is not a two-element array disqualifies
/// the whole value, same as any non-mapping-like input.
pub(crate) fn table_entries(table: &Value) -> Option<Vec<(Value, &Value)>> {
    match table {
        Value::Object(entries) => Some(
            entries
                .iter()
                .map(|(key, row)| (Value::String(key.clone()), row))
                .collect(),
        ),
        Value::Array(entries) => entries
            .iter()
            .map(|entry| match entry.as_array().map(|pair| pair.as_slice()) {
                Some([key, row]) => Some((key.clone(), row)),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

/// Returns the JSON type name of a value, for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
