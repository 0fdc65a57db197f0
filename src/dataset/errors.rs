//! Dataset construction and mutation errors.

use thiserror::Error;

use crate::freeze::FrozenViolation;

/// Result type for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors raised while building or mutating dataset containers.
///
/// Every variant is fatal to the single call that raised it; construction
/// never returns a partially built dataset, and a rejected mutation leaves
/// its target unchanged.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DatasetError {
    /// A construction argument names a table the schema does not declare
    #[error("unexpected table name '{table}'")]
    UnknownTable { table: String },

    /// A raw table failed structural validation; `reason` carries the
    /// validator's message
    #[error("'{table}' cannot be treated as a table: {reason}")]
    InvalidTable { table: String, reason: String },

    /// A raw key's component count disagrees with the table's primary-key
    /// arity
    #[error("key for table '{table}' does not match its primary key: expected {expected} field(s), observed {observed}")]
    KeyShape {
        table: String,
        expected: usize,
        observed: String,
    },

    /// A raw row's shape or field names disagree with the table's declared
    /// data fields
    #[error("row for table '{table}' does not match its declared data fields: expected {expected}, observed {observed}")]
    RowShape {
        table: String,
        expected: String,
        observed: String,
    },

    /// A row operation named a field the table schema does not declare
    #[error("table '{table}' has no data field '{field}'")]
    UnknownField { table: String, field: String },

    /// A mutation was attempted on a frozen container
    #[error(transparent)]
    Frozen(#[from] FrozenViolation),
}
