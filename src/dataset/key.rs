//! Hashable table keys.
//!
//! Raw keys arrive as scalar `serde_json::Value`s (or arrays of scalars for
//! composite keys), which are neither `Eq` nor `Hash`. Keys are normalized
//! once into [`KeyAtom`]s so tables can index rows in ordinary hash maps.

use std::fmt;

use serde_json::Value;

use super::errors::{DatasetError, DatasetResult};
use crate::validate::json_type_name;

/// One scalar key component.
///
/// Floats are carried by bit pattern so the atom can be hashed; two float
/// atoms are equal exactly when their bit patterns are.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyAtom {
    Null,
    Bool(bool),
    Int(i64),
    /// An `f64` stored as its bit pattern
    Float(u64),
    Text(String),
}

impl KeyAtom {
    /// Normalizes one scalar value, or `None` for containers.
    pub fn from_value(value: &Value) -> Option<KeyAtom> {
        match value {
            Value::Null => Some(KeyAtom::Null),
            Value::Bool(b) => Some(KeyAtom::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Some(KeyAtom::Int(i)),
                None => n.as_f64().map(|f| KeyAtom::Float(f.to_bits())),
            },
            Value::String(s) => Some(KeyAtom::Text(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for KeyAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAtom::Null => write!(f, "null"),
            KeyAtom::Bool(b) => write!(f, "{}", b),
            KeyAtom::Int(i) => write!(f, "{}", i),
            KeyAtom::Float(bits) => write!(f, "{}", f64::from_bits(*bits)),
            KeyAtom::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for KeyAtom {
    fn from(s: &str) -> Self {
        KeyAtom::Text(s.to_string())
    }
}

impl From<String> for KeyAtom {
    fn from(s: String) -> Self {
        KeyAtom::Text(s)
    }
}

impl From<i64> for KeyAtom {
    fn from(i: i64) -> Self {
        KeyAtom::Int(i)
    }
}

impl From<bool> for KeyAtom {
    fn from(b: bool) -> Self {
        KeyAtom::Bool(b)
    }
}

/// A full table key: one atom, or an ordered tuple of atoms for tables whose
/// primary key has more than one field.
///
/// A singleton and a one-component composite are distinct keys, mirroring
/// how they arrive in the raw input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Single(KeyAtom),
    Composite(Vec<KeyAtom>),
}

impl Key {
    /// A singleton key.
    pub fn single(atom: impl Into<KeyAtom>) -> Key {
        Key::Single(atom.into())
    }

    /// A composite key from its components, in primary-key field order.
    pub fn composite<I, A>(atoms: I) -> Key
    where
        I: IntoIterator<Item = A>,
        A: Into<KeyAtom>,
    {
        Key::Composite(atoms.into_iter().map(Into::into).collect())
    }

    /// Number of key components; 1 for a singleton.
    pub fn arity(&self) -> usize {
        match self {
            Key::Single(_) => 1,
            Key::Composite(atoms) => atoms.len(),
        }
    }

    /// Normalizes a raw key against a table's primary-key arity.
    ///
    /// A container key must carry exactly `arity` scalar components; a bare
    /// scalar is permitted only when `arity` is 1. Anything else, including
    /// a nested container inside a composite key, is a
    /// [`DatasetError::KeyShape`].
    pub fn from_raw(raw: &Value, arity: usize, table: &str) -> DatasetResult<Key> {
        let key_shape_error = |observed: String| DatasetError::KeyShape {
            table: table.to_string(),
            expected: arity,
            observed,
        };

        match raw {
            Value::Array(parts) => {
                if parts.len() != arity {
                    return Err(key_shape_error(format!("{} field(s)", parts.len())));
                }
                parts
                    .iter()
                    .map(|part| {
                        KeyAtom::from_value(part).ok_or_else(|| {
                            key_shape_error(format!(
                                "a {} key component",
                                json_type_name(part)
                            ))
                        })
                    })
                    .collect::<DatasetResult<Vec<_>>>()
                    .map(Key::Composite)
            }
            Value::Object(_) => Err(key_shape_error("a mapping".to_string())),
            scalar => {
                if arity != 1 {
                    return Err(key_shape_error("a bare value".to_string()));
                }
                // from_value never fails on non-container input
                match KeyAtom::from_value(scalar) {
                    Some(atom) => Ok(Key::Single(atom)),
                    None => Err(key_shape_error(json_type_name(scalar).to_string())),
                }
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Single(atom) => write!(f, "{}", atom),
            Key::Composite(atoms) => {
                write!(f, "(")?;
                for (i, atom) in atoms.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", atom)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Single(KeyAtom::from(s))
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Single(KeyAtom::from(s))
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Single(KeyAtom::from(i))
    }
}

impl From<KeyAtom> for Key {
    fn from(atom: KeyAtom) -> Self {
        Key::Single(atom)
    }
}
