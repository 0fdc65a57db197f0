//! Dataset subsystem for tabdat
//!
//! The frozen side of the crate: keys, rows, tables, the composite dataset,
//! and the factory that validates raw input and assembles all of them.
//!
//! # Design Principles
//!
//! - Construction is all-or-nothing; no partial dataset ever escapes
//! - The factory holds no mutable state; each call builds from scratch
//! - Freezing cascades rows, then tables, then the dataset, exactly once
//! - One generic row type backed by a shared table schema; no generated types

mod composite;
mod errors;
mod factory;
mod key;
mod row;
mod table;

pub use composite::Dataset;
pub use errors::{DatasetError, DatasetResult};
pub use factory::DatasetFactory;
pub use key::{Key, KeyAtom};
pub use row::{Row, RowFactory};
pub use table::Table;
