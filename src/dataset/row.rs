//! Rows and the per-table row factory.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::errors::{DatasetError, DatasetResult};
use crate::freeze::{FreezeFlags, FrozenViolation, MutationKind};
use crate::schema::TableSchema;
use crate::validate::{json_type_name, RowShape};

/// One record of named data-field values.
///
/// A row holds exactly one value per data field its table schema declares,
/// addressable by field name through the shared [`TableSchema`]. Once frozen,
/// replacing a value fails with [`FrozenViolation`]; the field set itself is
/// fixed by the schema and can never grow or shrink.
#[derive(Debug, Clone)]
pub struct Row {
    schema: Arc<TableSchema>,
    values: Vec<Value>,
    flags: FreezeFlags,
}

impl Row {
    pub(crate) fn new(schema: Arc<TableSchema>, values: Vec<Value>) -> Self {
        debug_assert_eq!(schema.data_fields().len(), values.len());
        Self {
            schema,
            values,
            flags: FreezeFlags::new(),
        }
    }

    /// The schema of the table this row belongs to.
    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Reads one field by name. Reads never consult the freeze flags.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.schema
            .field_index(field)
            .map(|index| &self.values[index])
    }

    /// Replaces the value of a declared field.
    ///
    /// # Errors
    ///
    /// [`DatasetError::Frozen`] if the row is value-frozen (declared field)
    /// or attribute-frozen (undeclared field, which would add an attribute);
    /// [`DatasetError::UnknownField`] for an undeclared field on an unfrozen
    /// row.
    pub fn set(&mut self, field: &str, value: Value) -> DatasetResult<()> {
        match self.schema.field_index(field) {
            Some(index) => {
                if self.flags.values_frozen() {
                    return Err(FrozenViolation::new(
                        self.describe(),
                        MutationKind::SetField,
                    )
                    .into());
                }
                self.values[index] = value;
                Ok(())
            }
            None => {
                if self.flags.attributes_frozen() {
                    return Err(FrozenViolation::new(
                        self.describe(),
                        MutationKind::AddField,
                    )
                    .into());
                }
                Err(DatasetError::UnknownField {
                    table: self.schema.name().to_string(),
                    field: field.to_string(),
                })
            }
        }
    }

    /// Iterates over `(field name, value)` pairs in declared order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .data_fields()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    /// The field values in declared order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Sets both freeze flags. Idempotent.
    pub fn freeze(&mut self) {
        self.flags.freeze();
    }

    /// Whether both freeze flags are set.
    pub fn is_frozen(&self) -> bool {
        self.flags.fully_frozen()
    }

    fn describe(&self) -> String {
        format!("row in table '{}'", self.schema.name())
    }
}

/// Rows compare by field names and values; freeze state is not part of row
/// identity.
impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.schema.data_fields() == other.schema.data_fields() && self.values == other.values
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (field, value)) in self.fields().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", field, value)?;
        }
        write!(f, "}}")
    }
}

/// Builds canonical rows for one table from raw row representations.
///
/// One factory per table, sharing the table's schema handle with every row
/// it builds.
#[derive(Debug, Clone)]
pub struct RowFactory {
    schema: Arc<TableSchema>,
}

impl RowFactory {
    pub fn new(schema: Arc<TableSchema>) -> Self {
        Self { schema }
    }

    /// Converts one raw row into an unfrozen [`Row`].
    ///
    /// A mapping row must carry exactly the declared data-field name set; a
    /// sequence row must carry exactly the declared count, assigned in
    /// declared order; a scalar row is permitted only when exactly one data
    /// field is declared.
    ///
    /// # Errors
    ///
    /// [`DatasetError::RowShape`] naming the table and the expected versus
    /// observed shape.
    pub fn build(&self, raw: &Value) -> DatasetResult<Row> {
        match RowShape::of(raw) {
            RowShape::Mapping => self.build_from_mapping(raw),
            RowShape::Sequence => self.build_from_sequence(raw),
            RowShape::Scalar => self.build_from_scalar(raw),
        }
    }

    fn build_from_mapping(&self, raw: &Value) -> DatasetResult<Row> {
        let Some(mapping) = raw.as_object() else {
            return Err(self.shape_error(json_type_name(raw).to_string()));
        };
        let declared = self.schema.data_fields();
        let mut values = Vec::with_capacity(declared.len());
        for field in declared {
            match mapping.get(field) {
                Some(value) => values.push(value.clone()),
                None => return Err(self.shape_error(observed_mapping(mapping))),
            }
        }
        if mapping.len() != declared.len() {
            return Err(self.shape_error(observed_mapping(mapping)));
        }
        Ok(Row::new(self.schema.clone(), values))
    }

    fn build_from_sequence(&self, raw: &Value) -> DatasetResult<Row> {
        let Some(sequence) = raw.as_array() else {
            return Err(self.shape_error(json_type_name(raw).to_string()));
        };
        if sequence.len() != self.schema.data_fields().len() {
            return Err(self.shape_error(format!("{} value(s)", sequence.len())));
        }
        Ok(Row::new(self.schema.clone(), sequence.clone()))
    }

    fn build_from_scalar(&self, raw: &Value) -> DatasetResult<Row> {
        if self.schema.data_fields().len() != 1 {
            return Err(self.shape_error("a bare value".to_string()));
        }
        Ok(Row::new(self.schema.clone(), vec![raw.clone()]))
    }

    fn shape_error(&self, observed: String) -> DatasetError {
        DatasetError::RowShape {
            table: self.schema.name().to_string(),
            expected: self.schema.data_fields_display(),
            observed,
        }
    }
}

fn observed_mapping(mapping: &serde_json::Map<String, Value>) -> String {
    format!(
        "fields ({})",
        mapping.keys().cloned().collect::<Vec<_>>().join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;

    fn items_factory() -> RowFactory {
        let schema = Schema::new(
            &json!({"items": "name"}),
            &json!({"items": ["weight", "color"]}),
        )
        .unwrap();
        RowFactory::new(Arc::new(schema.table("items").unwrap().clone()))
    }

    #[test]
    fn test_mapping_row_reads_by_field_name() {
        let row = items_factory()
            .build(&json!({"color": "red", "weight": 5}))
            .unwrap();
        assert_eq!(row.get("weight"), Some(&json!(5)));
        assert_eq!(row.get("color"), Some(&json!("red")));
    }

    #[test]
    fn test_sequence_row_assigns_in_declared_order() {
        let row = items_factory().build(&json!([5, "red"])).unwrap();
        assert_eq!(row.get("weight"), Some(&json!(5)));
        assert_eq!(row.get("color"), Some(&json!("red")));
    }

    #[test]
    fn test_mapping_and_sequence_rows_are_equal() {
        let factory = items_factory();
        let mapping = factory.build(&json!({"weight": 5, "color": "red"})).unwrap();
        let sequence = factory.build(&json!([5, "red"])).unwrap();
        assert_eq!(mapping, sequence);
    }

    #[test]
    fn test_mapping_row_field_set_must_match_exactly() {
        let factory = items_factory();
        assert!(factory.build(&json!({"weight": 5})).is_err());
        assert!(factory
            .build(&json!({"weight": 5, "color": "red", "extra": 1}))
            .is_err());
    }

    #[test]
    fn test_sequence_row_length_must_match() {
        let err = items_factory().build(&json!([5])).unwrap_err();
        assert!(matches!(err, DatasetError::RowShape { .. }));
    }

    #[test]
    fn test_scalar_row_requires_single_data_field() {
        let err = items_factory().build(&json!(5)).unwrap_err();
        assert!(matches!(err, DatasetError::RowShape { .. }));

        let schema = Schema::new(&json!({"tags": "id"}), &json!({"tags": "label"})).unwrap();
        let factory = RowFactory::new(Arc::new(schema.table("tags").unwrap().clone()));
        let row = factory.build(&json!("blue")).unwrap();
        assert_eq!(row.get("label"), Some(&json!("blue")));
    }

    #[test]
    fn test_unfrozen_row_accepts_set() {
        let mut row = items_factory().build(&json!([5, "red"])).unwrap();
        row.set("weight", json!(10)).unwrap();
        assert_eq!(row.get("weight"), Some(&json!(10)));
    }

    #[test]
    fn test_frozen_row_rejects_set_and_is_unchanged() {
        let mut row = items_factory().build(&json!([5, "red"])).unwrap();
        row.freeze();
        let err = row.set("weight", json!(10)).unwrap_err();
        assert!(matches!(err, DatasetError::Frozen(_)));
        assert_eq!(row.get("weight"), Some(&json!(5)));
    }

    #[test]
    fn test_undeclared_field_cannot_be_added() {
        let mut row = items_factory().build(&json!([5, "red"])).unwrap();
        let err = row.set("texture", json!("rough")).unwrap_err();
        assert!(matches!(err, DatasetError::UnknownField { .. }));

        row.freeze();
        let err = row.set("texture", json!("rough")).unwrap_err();
        assert!(matches!(err, DatasetError::Frozen(_)));
    }

    #[test]
    fn test_row_freeze_is_idempotent() {
        let mut row = items_factory().build(&json!([5, "red"])).unwrap();
        row.freeze();
        row.freeze();
        assert!(row.is_frozen());
    }
}
