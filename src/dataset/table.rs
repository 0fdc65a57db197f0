//! Insertion-ordered, freezable mapping from key to row.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::errors::{DatasetError, DatasetResult};
use super::key::Key;
use super::row::Row;
use crate::freeze::{FreezeFlags, FrozenViolation, MutationKind};
use crate::schema::TableSchema;

/// One table of a dataset: a mapping from [`Key`] to [`Row`].
///
/// Iteration follows insertion order. Inserting enforces the schema at the
/// boundary: key arity must match the primary-key field count and the row's
/// field set must match the declared data fields, so every row a table holds
/// agrees with its schema. Once value-frozen, insert/remove/replace all fail
/// with [`FrozenViolation`]; reads are always permitted.
#[derive(Debug, Clone)]
pub struct Table {
    schema: Arc<TableSchema>,
    order: Vec<Key>,
    rows: HashMap<Key, Row>,
    flags: FreezeFlags,
}

impl Table {
    /// An empty, unfrozen table for the given schema.
    pub fn new(schema: Arc<TableSchema>) -> Self {
        Self {
            schema,
            order: Vec::new(),
            rows: HashMap::new(),
            flags: FreezeFlags::new(),
        }
    }

    /// The schema this table enforces.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Inserts or replaces the row stored under `key`, returning the
    /// replaced row if there was one.
    ///
    /// # Errors
    ///
    /// [`DatasetError::Frozen`] if the table is value-frozen;
    /// [`DatasetError::KeyShape`] if the key's arity disagrees with the
    /// primary-key field count; [`DatasetError::RowShape`] if the row was
    /// built against a different data-field set.
    pub fn insert(&mut self, key: Key, row: Row) -> DatasetResult<Option<Row>> {
        if self.flags.values_frozen() {
            let mutation = if self.rows.contains_key(&key) {
                MutationKind::ReplaceRow
            } else {
                MutationKind::InsertRow
            };
            return Err(FrozenViolation::new(self.describe(), mutation).into());
        }
        if key.arity() != self.schema.key_arity() {
            return Err(DatasetError::KeyShape {
                table: self.schema.name().to_string(),
                expected: self.schema.key_arity(),
                observed: format!("{} field(s)", key.arity()),
            });
        }
        if row.schema().data_fields() != self.schema.data_fields() {
            return Err(DatasetError::RowShape {
                table: self.schema.name().to_string(),
                expected: self.schema.data_fields_display(),
                observed: row.schema().data_fields_display(),
            });
        }
        let replaced = self.rows.insert(key.clone(), row);
        if replaced.is_none() {
            self.order.push(key);
        }
        Ok(replaced)
    }

    /// Removes the row stored under `key`.
    ///
    /// # Errors
    ///
    /// [`DatasetError::Frozen`] if the table is value-frozen.
    pub fn remove(&mut self, key: &Key) -> DatasetResult<Option<Row>> {
        if self.flags.values_frozen() {
            return Err(FrozenViolation::new(self.describe(), MutationKind::RemoveRow).into());
        }
        let removed = self.rows.remove(key);
        if removed.is_some() {
            self.order.retain(|k| k != key);
        }
        Ok(removed)
    }

    /// Reads the row stored under `key`. Never consults the freeze flags.
    pub fn get(&self, key: impl Into<Key>) -> Option<&Row> {
        self.rows.get(&key.into())
    }

    /// Mutable access to the row stored under `key`. Returns `None` once
    /// the table is value-frozen: a `&mut Row` is itself a mutation path.
    pub fn get_mut(&mut self, key: impl Into<Key>) -> Option<&mut Row> {
        if self.flags.values_frozen() {
            return None;
        }
        self.rows.get_mut(&key.into())
    }

    /// Whether a row is stored under `key`.
    pub fn contains_key(&self, key: impl Into<Key>) -> bool {
        self.rows.contains_key(&key.into())
    }

    /// Iterates over `(key, row)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &Row)> {
        self.order
            .iter()
            .filter_map(|key| self.rows.get_key_value(key))
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.order.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Freezes every row, then the table itself. Idempotent.
    pub fn freeze(&mut self) {
        if self.flags.fully_frozen() {
            return;
        }
        for row in self.rows.values_mut() {
            row.freeze();
        }
        self.flags.freeze();
    }

    /// Whether the table itself is fully frozen.
    pub fn is_frozen(&self) -> bool {
        self.flags.fully_frozen()
    }

    fn describe(&self) -> String {
        format!("table '{}'", self.schema.name())
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table '{}' ({} rows)", self.schema.name(), self.len())
    }
}
