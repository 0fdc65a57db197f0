//! tabdat - strict validation and freezing for loosely-structured tabular datasets
//!
//! One dataset is a mapping from table name to table; one table is a mapping
//! from key to row. A [`schema::Schema`] declares each table's primary-key
//! and data fields, a [`dataset::DatasetFactory`] validates raw input against
//! it, and every dataset the factory returns is frozen: reads always succeed,
//! mutation always fails.

pub mod dataset;
pub mod freeze;
pub mod schema;
pub mod validate;
