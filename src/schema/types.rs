//! Schema and per-table schema types.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use crate::validate::json_type_name;

/// Canonical field declaration for one table.
///
/// Produced by [`Schema::new`]; never mutated afterwards. Rows hold a shared
/// handle to their table's `TableSchema` and resolve field names through it,
/// so no per-schema row type is ever generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    name: String,
    primary_key: Vec<String>,
    data_fields: Vec<String>,
}

impl TableSchema {
    pub(crate) fn new(name: String, primary_key: Vec<String>, data_fields: Vec<String>) -> Self {
        Self {
            name,
            primary_key,
            data_fields,
        }
    }

    /// The table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared primary-key field names, in declaration order.
    pub fn primary_key(&self) -> &[String] {
        &self.primary_key
    }

    /// The declared data field names, in declaration order.
    pub fn data_fields(&self) -> &[String] {
        &self.data_fields
    }

    /// Number of primary-key fields; keys of this table must match it.
    pub fn key_arity(&self) -> usize {
        self.primary_key.len()
    }

    /// Position of a data field within the declared order.
    pub fn field_index(&self, field: &str) -> Option<usize> {
        self.data_fields.iter().position(|f| f == field)
    }

    /// Renders the declared data fields as `(weight, color)` for messages.
    pub(crate) fn data_fields_display(&self) -> String {
        format!("fields ({})", self.data_fields.join(", "))
    }
}

/// A full schema: one [`TableSchema`] per declared table.
///
/// Constructed once from two loosely-structured specs and immutable from then
/// on, so it can be read concurrently by any number of construction calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    tables: Vec<TableSchema>,
}

impl Schema {
    /// Normalizes raw primary-key and data-field specs into a schema.
    ///
    /// Each spec is an object mapping table name to a field spec: a single
    /// field name, an array of field names, or null (meaning no fields).
    /// Every table named in `data_fields` must also appear in `primary_keys`;
    /// a table may exist with a primary key alone.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if a spec is not an object, a field name is
    /// not a string, a field name repeats within one table's combined
    /// primary-key + data-field set, or a data-field table has no
    /// primary-key entry.
    pub fn new(primary_keys: &Value, data_fields: &Value) -> SchemaResult<Self> {
        let pk_spec = primary_keys
            .as_object()
            .ok_or(SchemaError::SpecNotMapping {
                which: "primary key",
            })?;
        let df_spec = data_fields.as_object().ok_or(SchemaError::SpecNotMapping {
            which: "data field",
        })?;

        for table in df_spec.keys() {
            if !pk_spec.contains_key(table) {
                return Err(SchemaError::MissingPrimaryKey {
                    table: table.clone(),
                });
            }
        }

        let mut tables = Vec::with_capacity(pk_spec.len());
        for (name, spec) in pk_spec {
            let primary_key = normalize_field_spec(name, spec)?;
            let data_fields = match df_spec.get(name) {
                Some(spec) => normalize_field_spec(name, spec)?,
                None => Vec::new(),
            };

            let mut seen = HashSet::new();
            for field in primary_key.iter().chain(data_fields.iter()) {
                if !seen.insert(field.as_str()) {
                    return Err(SchemaError::DuplicateField {
                        table: name.clone(),
                        field: field.clone(),
                    });
                }
            }

            tables.push(TableSchema::new(name.clone(), primary_key, data_fields));
        }

        Ok(Self { tables })
    }

    /// Looks up one table's schema by name.
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name() == name)
    }

    /// Iterates over all table schemas in declaration order.
    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.iter()
    }

    /// Iterates over the declared table names.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name())
    }

    /// Number of declared tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the schema declares no tables at all.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Schema({})",
            self.table_names().collect::<Vec<_>>().join(", ")
        )
    }
}

/// Normalizes one field spec: string, array of strings, or null.
fn normalize_field_spec(table: &str, spec: &Value) -> SchemaResult<Vec<String>> {
    match spec {
        Value::Null => Ok(Vec::new()),
        Value::String(field) => Ok(vec![field.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(field) => Ok(field.clone()),
                other => Err(SchemaError::FieldNotString {
                    table: table.to_string(),
                    found: json_type_name(other).to_string(),
                }),
            })
            .collect(),
        other => Err(SchemaError::FieldNotString {
            table: table.to_string(),
            found: json_type_name(other).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalizes_string_array_and_null_specs() {
        let schema = Schema::new(
            &json!({"items": "name", "tags": ["owner", "label"], "markers": null}),
            &json!({"items": ["weight", "color"], "tags": "note"}),
        )
        .unwrap();

        let items = schema.table("items").unwrap();
        assert_eq!(items.primary_key(), ["name"]);
        assert_eq!(items.data_fields(), ["weight", "color"]);
        assert_eq!(items.key_arity(), 1);

        let tags = schema.table("tags").unwrap();
        assert_eq!(tags.key_arity(), 2);
        assert_eq!(tags.data_fields(), ["note"]);

        let markers = schema.table("markers").unwrap();
        assert!(markers.primary_key().is_empty());
        assert!(markers.data_fields().is_empty());
    }

    #[test]
    fn test_data_field_table_requires_primary_key_entry() {
        let err = Schema::new(&json!({}), &json!({"orphan": "value"})).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingPrimaryKey {
                table: "orphan".into()
            }
        );
    }

    #[test]
    fn test_duplicate_field_across_key_and_data_rejected() {
        let err = Schema::new(&json!({"items": "name"}), &json!({"items": ["name", "color"]}))
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateField {
                table: "items".into(),
                field: "name".into()
            }
        );
    }

    #[test]
    fn test_non_string_field_name_rejected() {
        let err = Schema::new(&json!({"items": ["name", 7]}), &json!({})).unwrap_err();
        assert!(matches!(err, SchemaError::FieldNotString { .. }));
    }

    #[test]
    fn test_spec_must_be_object() {
        let err = Schema::new(&json!(["items"]), &json!({})).unwrap_err();
        assert_eq!(
            err,
            SchemaError::SpecNotMapping {
                which: "primary key"
            }
        );
    }

    #[test]
    fn test_field_index_follows_declared_order() {
        let schema = Schema::new(&json!({"items": "name"}), &json!({"items": ["weight", "color"]}))
            .unwrap();
        let items = schema.table("items").unwrap();
        assert_eq!(items.field_index("weight"), Some(0));
        assert_eq!(items.field_index("color"), Some(1));
        assert_eq!(items.field_index("name"), None);
    }

    #[test]
    fn test_schema_round_trips_through_json() {
        let schema =
            Schema::new(&json!({"items": "name"}), &json!({"items": ["weight"]})).unwrap();
        let encoded = serde_json::to_string(&schema).unwrap();
        let decoded: Schema = serde_json::from_str(&encoded).unwrap();
        assert_eq!(schema, decoded);
    }
}
