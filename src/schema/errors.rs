//! Schema error types.

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors detected while normalizing a raw schema declaration.
///
/// All of these abort [`Schema`](super::Schema) construction; a schema with
/// any of these defects never exists.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A field spec collection was not an object mapping table names to specs
    #[error("{which} spec must be an object mapping table name to field names")]
    SpecNotMapping {
        /// Which spec was malformed ("primary key" or "data field")
        which: &'static str,
    },

    /// A field name entry was not a string
    #[error("field name for table '{table}' is not a string (found {found})")]
    FieldNotString { table: String, found: String },

    /// The same field name appears twice in one table's combined field set
    #[error("duplicate field name '{field}' in table '{table}'")]
    DuplicateField { table: String, field: String },

    /// A table declares data fields but has no primary-key entry
    #[error("table '{table}' declares data fields but no primary key entry")]
    MissingPrimaryKey { table: String },
}
