//! The dataset factory: validate, convert, assemble, freeze.

use std::sync::Arc;

use serde_json::Value;

use super::composite::Dataset;
use super::errors::{DatasetError, DatasetResult};
use super::key::Key;
use super::row::RowFactory;
use super::table::Table;
use crate::schema::{Schema, TableSchema};
use crate::validate::{check_table, table_entries, ValidationMode};

/// Builds frozen [`Dataset`]s from raw input, against one fixed [`Schema`].
///
/// The factory is constructed once and holds no mutable state; each call to
/// [`DatasetFactory::build_dataset`] validates from scratch and returns a
/// brand-new frozen dataset. A factory may be shared freely across threads.
#[derive(Debug, Clone)]
pub struct DatasetFactory {
    schema: Schema,
    tables: Vec<Arc<TableSchema>>,
}

impl DatasetFactory {
    /// Creates a factory for the given schema. The schema cannot change
    /// afterwards.
    pub fn new(schema: Schema) -> Self {
        let tables = schema.tables().map(|t| Arc::new(t.clone())).collect();
        Self { schema, tables }
    }

    /// The schema this factory enforces.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The row factory for one declared table, usable standalone.
    pub fn row_factory(&self, table: &str) -> Option<RowFactory> {
        self.table_handle(table).map(RowFactory::new)
    }

    /// A frozen dataset with every declared table present and empty.
    pub fn empty_dataset(&self) -> Dataset {
        let mut dataset = Dataset::new();
        for handle in &self.tables {
            dataset.push_table(handle.name().to_string(), Table::new(handle.clone()));
        }
        dataset.freeze();
        dataset
    }

    /// Validates and converts raw tables into one frozen dataset.
    ///
    /// Supplied tables are processed in supplied order. Per table: the name
    /// must be schema-declared; the raw table must pass the structural check;
    /// every key must match the primary-key arity; every row must match the
    /// declared data fields. Schema tables not supplied are present in the
    /// result as empty tables. The assembled dataset is cascade-frozen
    /// before it is returned.
    ///
    /// Construction is all-or-nothing: any failure aborts the whole call
    /// before anything is frozen, and no partial dataset escapes.
    ///
    /// # Errors
    ///
    /// [`DatasetError::UnknownTable`], [`DatasetError::InvalidTable`],
    /// [`DatasetError::KeyShape`] or [`DatasetError::RowShape`], per the
    /// first failing check.
    pub fn build_dataset<I, S>(&self, tables: I) -> DatasetResult<Dataset>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let mut built: Vec<(String, Table)> = Vec::new();

        for (name, raw) in tables {
            let name = name.into();
            let handle = self
                .table_handle(&name)
                .ok_or_else(|| DatasetError::UnknownTable {
                    table: name.clone(),
                })?;
            if built.iter().any(|(existing, _)| existing == &name) {
                return Err(DatasetError::InvalidTable {
                    table: name,
                    reason: "supplied more than once".to_string(),
                });
            }

            let report = check_table(&raw, ValidationMode::FailFast);
            if !report.is_valid() {
                return Err(DatasetError::InvalidTable {
                    reason: report.first_message().unwrap_or_default().to_string(),
                    table: name,
                });
            }
            // check_table accepted the value, so entries exist
            let Some(entries) = table_entries(&raw) else {
                return Err(DatasetError::InvalidTable {
                    table: name,
                    reason: "Not a dict-like object".to_string(),
                });
            };

            // Every key is checked before any row is built.
            let mut keyed = Vec::with_capacity(entries.len());
            for (raw_key, raw_row) in entries {
                keyed.push((Key::from_raw(&raw_key, handle.key_arity(), &name)?, raw_row));
            }

            let row_factory = RowFactory::new(handle.clone());
            let mut table = Table::new(handle.clone());
            for (key, raw_row) in keyed {
                let row = row_factory.build(raw_row)?;
                if table.insert(key.clone(), row)?.is_some() {
                    return Err(DatasetError::InvalidTable {
                        table: name,
                        reason: format!("Duplicate key {key}"),
                    });
                }
            }
            built.push((name, table));
        }

        // Assemble in schema order; every declared table is present.
        let mut dataset = Dataset::new();
        for handle in &self.tables {
            let name = handle.name();
            let table = match built.iter().position(|(n, _)| n == name) {
                Some(index) => built.swap_remove(index).1,
                None => Table::new(handle.clone()),
            };
            dataset.push_table(name.to_string(), table);
        }
        dataset.freeze();
        Ok(dataset)
    }

    fn table_handle(&self, name: &str) -> Option<Arc<TableSchema>> {
        self.tables
            .iter()
            .find(|handle| handle.name() == name)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items_factory() -> DatasetFactory {
        let schema = Schema::new(
            &json!({"items": "name", "tags": ["owner", "label"]}),
            &json!({"items": ["weight", "color"]}),
        )
        .unwrap();
        DatasetFactory::new(schema)
    }

    #[test]
    fn test_unknown_table_rejected() {
        let err = items_factory()
            .build_dataset([("bogus", json!({}))])
            .unwrap_err();
        assert_eq!(
            err,
            DatasetError::UnknownTable {
                table: "bogus".into()
            }
        );
    }

    #[test]
    fn test_invalid_table_wraps_validator_message() {
        let err = items_factory()
            .build_dataset([("items", json!("scalar"))])
            .unwrap_err();
        assert_eq!(
            err,
            DatasetError::InvalidTable {
                table: "items".into(),
                reason: "Not a dict-like object".into()
            }
        );
    }

    #[test]
    fn test_table_supplied_twice_rejected() {
        let err = items_factory()
            .build_dataset([("items", json!({})), ("items", json!({}))])
            .unwrap_err();
        assert!(matches!(err, DatasetError::InvalidTable { .. }));
    }

    #[test]
    fn test_duplicate_normalized_key_rejected() {
        // two association-list entries with the same key
        let err = items_factory()
            .build_dataset([(
                "items",
                json!([["bolt", [5, "red"]], ["bolt", [2, "blue"]]]),
            )])
            .unwrap_err();
        assert!(matches!(err, DatasetError::InvalidTable { .. }));
    }

    #[test]
    fn test_keys_checked_before_rows_are_built() {
        // entry 1 carries a bad row, entry 2 a bad key; the key failure wins
        let err = items_factory()
            .build_dataset([(
                "tags",
                json!([
                    [["a", "b"], [1]],
                    [["c", ["nested"]], [1]],
                ]),
            )])
            .unwrap_err();
        assert!(matches!(err, DatasetError::KeyShape { .. }));
    }

    #[test]
    fn test_empty_dataset_has_every_declared_table() {
        let dataset = items_factory().empty_dataset();
        assert!(dataset.is_frozen());
        assert_eq!(dataset.len(), 2);
        assert!(dataset.table("items").unwrap().is_empty());
        assert!(dataset.table("tags").unwrap().is_empty());
    }
}
