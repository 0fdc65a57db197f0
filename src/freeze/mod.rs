//! Freeze mechanism for tabdat containers
//!
//! Every container in a dataset (row, table, the dataset itself) carries a
//! pair of one-way freeze flags. Freezing is idempotent and irreversible;
//! there is no unfreeze. Reads never consult the flags.
//!
//! # Design Principles
//!
//! - Two independent locks: value mutation and attribute mutation
//! - Every mutating operation checks its flag first
//! - A rejected mutation leaves the container unchanged
//! - Freezing an already-frozen container is a no-op, never an error

mod flags;

pub use flags::{FreezeFlags, FrozenViolation, MutationKind};
