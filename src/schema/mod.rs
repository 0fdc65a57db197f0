//! Schema subsystem for tabdat
//!
//! A schema declares, per table, an ordered set of primary-key fields and an
//! ordered set of data fields. Raw declarations are loosely structured
//! (a field spec may be one name, a list of names, or omitted); this module
//! normalizes them into canonical field-name vectors once, up front.
//!
//! # Design Principles
//!
//! - Normalize once, at construction; a `Schema` is immutable afterwards
//! - Every table must have a primary-key entry to exist at all
//! - Field names are unique within one table's combined field set
//! - Malformed declarations abort construction, never degrade it

mod errors;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use types::{Schema, TableSchema};
