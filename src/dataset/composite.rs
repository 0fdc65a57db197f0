//! The composite dataset: one table per schema-declared name.

use std::collections::HashMap;
use std::fmt;

use super::errors::DatasetResult;
use super::table::Table;
use crate::freeze::{FreezeFlags, FrozenViolation, MutationKind};

/// A read-only composite of tables, one per schema-declared table name.
///
/// Factory-built datasets arrive frozen: the table set cannot change and no
/// table or row inside can be mutated. An unfrozen dataset can also be
/// assembled by hand and locked later with [`Dataset::freeze`]. Iteration
/// follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    order: Vec<String>,
    tables: HashMap<String, Table>,
    flags: FreezeFlags,
}

impl Dataset {
    /// An empty, unfrozen dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a table, returning the replaced table if any.
    ///
    /// # Errors
    ///
    /// [`FrozenViolation`] if the dataset is attribute-frozen.
    pub fn insert_table(
        &mut self,
        name: impl Into<String>,
        table: Table,
    ) -> DatasetResult<Option<Table>> {
        if self.flags.attributes_frozen() {
            return Err(FrozenViolation::new("dataset", MutationKind::AddTable).into());
        }
        let name = name.into();
        let replaced = self.tables.insert(name.clone(), table);
        if replaced.is_none() {
            self.order.push(name);
        }
        Ok(replaced)
    }

    /// Factory assembly path: the dataset is known to be unfrozen.
    pub(crate) fn push_table(&mut self, name: String, table: Table) {
        if self.tables.insert(name.clone(), table).is_none() {
            self.order.push(name);
        }
    }

    /// Removes a table by name.
    ///
    /// # Errors
    ///
    /// [`FrozenViolation`] if the dataset is attribute-frozen.
    pub fn remove_table(&mut self, name: &str) -> DatasetResult<Option<Table>> {
        if self.flags.attributes_frozen() {
            return Err(FrozenViolation::new("dataset", MutationKind::RemoveTable).into());
        }
        let removed = self.tables.remove(name);
        if removed.is_some() {
            self.order.retain(|n| n != name);
        }
        Ok(removed)
    }

    /// Reads one table by name. Never consults the freeze flags.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Mutable access to one table. Returns `None` once the dataset is
    /// frozen: a `&mut Table` is itself a mutation path.
    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        if self.flags.attributes_frozen() {
            return None;
        }
        self.tables.get_mut(name)
    }

    /// Iterates over `(name, table)` pairs in insertion order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.order.iter().filter_map(|name| {
            self.tables
                .get_key_value(name)
                .map(|(name, table)| (name.as_str(), table))
        })
    }

    /// Iterates over table names in insertion order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether the dataset holds no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Cascading freeze: every row of every table, then every table, then
    /// the dataset's own table set.
    ///
    /// Idempotent: freezing an already-frozen dataset observes nothing and
    /// never walks the tables a second time. Once this returns, no
    /// partially-frozen state is observable.
    pub fn freeze(&mut self) {
        if self.flags.fully_frozen() {
            return;
        }
        for table in self.tables.values_mut() {
            table.freeze();
        }
        self.flags.freeze();
    }

    /// Whether the dataset's own table set is fully frozen.
    pub fn is_frozen(&self) -> bool {
        self.flags.fully_frozen()
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dataset({})",
            self.table_names().collect::<Vec<_>>().join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use serde_json::json;
    use std::sync::Arc;

    fn empty_items_table() -> Table {
        let schema = Schema::new(&json!({"items": "name"}), &json!({"items": "weight"})).unwrap();
        Table::new(Arc::new(schema.table("items").unwrap().clone()))
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut dataset = Dataset::new();
        dataset.insert_table("items", empty_items_table()).unwrap();
        assert!(dataset.table("items").is_some());
        assert!(dataset.table("missing").is_none());
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_frozen_dataset_rejects_table_changes() {
        let mut dataset = Dataset::new();
        dataset.insert_table("items", empty_items_table()).unwrap();
        dataset.freeze();

        assert!(dataset.insert_table("more", empty_items_table()).is_err());
        assert!(dataset.remove_table("items").is_err());
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_table_mut_unavailable_once_frozen() {
        let mut dataset = Dataset::new();
        dataset.insert_table("items", empty_items_table()).unwrap();
        assert!(dataset.table_mut("items").is_some());
        dataset.freeze();
        assert!(dataset.table_mut("items").is_none());
        assert!(dataset.table("items").is_some());
    }

    #[test]
    fn test_freeze_cascades_and_is_idempotent() {
        let mut dataset = Dataset::new();
        dataset.insert_table("items", empty_items_table()).unwrap();
        dataset.freeze();
        assert!(dataset.table("items").unwrap().is_frozen());
        dataset.freeze();
        assert!(dataset.is_frozen());
    }

    #[test]
    fn test_display_lists_table_names() {
        let mut dataset = Dataset::new();
        dataset.insert_table("items", empty_items_table()).unwrap();
        dataset.insert_table("extra", empty_items_table()).unwrap();
        assert_eq!(format!("{}", dataset), "Dataset(items, extra)");
    }
}
