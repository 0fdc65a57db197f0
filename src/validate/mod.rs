//! Structural validators for tabdat
//!
//! These checks are shape-to-shape, never shape-to-schema: they confirm that
//! a raw table is internally consistent (uniform key shapes, uniform row
//! shapes) without consulting any schema. Schema agreement is enforced later
//! by the dataset factory. Both validators are usable standalone.
//!
//! # Design Principles
//!
//! - Shape before type: classify first, compare classifications second
//! - Explicit validation mode (fail-fast vs collect-all), never inferred
//! - Deterministic messages, checked in a fixed order
//! - Validation never mutates its input

mod object;
mod shape;
mod table;

pub use object::check_object;
pub use shape::{KeyShape, RowShape};
pub use table::{check_table, good_table, TableReport, ValidationMode};

pub(crate) use shape::{json_type_name, table_entries};
