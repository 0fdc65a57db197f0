//! Freeze flags and the error raised by rejected mutations.

use std::fmt;

use thiserror::Error;

/// The kind of mutation a frozen container rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Replacing the value of an existing row field
    SetField,
    /// Adding a field a row's schema does not declare
    AddField,
    /// Removing a declared row field
    RemoveField,
    /// Inserting a row under a new key
    InsertRow,
    /// Removing a row
    RemoveRow,
    /// Replacing the row stored under an existing key
    ReplaceRow,
    /// Adding a table to a dataset
    AddTable,
    /// Removing a table from a dataset
    RemoveTable,
}

impl MutationKind {
    /// Returns a short human-readable phrase for error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::SetField => "replacing a field value",
            MutationKind::AddField => "adding a field",
            MutationKind::RemoveField => "removing a field",
            MutationKind::InsertRow => "inserting a row",
            MutationKind::RemoveRow => "removing a row",
            MutationKind::ReplaceRow => "replacing a row",
            MutationKind::AddTable => "adding a table",
            MutationKind::RemoveTable => "removing a table",
        }
    }
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A mutation was attempted on a frozen container.
///
/// The container is completely unchanged after this error is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{container} is frozen: {mutation} is not allowed")]
pub struct FrozenViolation {
    /// Description of the container, e.g. `table 'items'`
    pub container: String,
    /// The rejected mutation
    pub mutation: MutationKind,
}

impl FrozenViolation {
    pub fn new(container: impl Into<String>, mutation: MutationKind) -> Self {
        Self {
            container: container.into(),
            mutation,
        }
    }
}

/// The two one-way freeze flags shared by rows, tables and datasets.
///
/// `values` locks the container's contents (field values, row entries).
/// `attributes` locks the container's own shape (field set, table set).
/// Both start unset; [`FreezeFlags::freeze`] sets both and cannot be undone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreezeFlags {
    values: bool,
    attributes: bool,
}

impl FreezeFlags {
    /// Unfrozen flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks value mutation. One-way.
    pub fn freeze_values(&mut self) {
        self.values = true;
    }

    /// Locks attribute mutation. One-way.
    pub fn freeze_attributes(&mut self) {
        self.attributes = true;
    }

    /// Sets both flags. Idempotent: freezing twice observes nothing new.
    pub fn freeze(&mut self) {
        self.freeze_values();
        self.freeze_attributes();
    }

    /// Whether value mutation is locked.
    pub fn values_frozen(&self) -> bool {
        self.values
    }

    /// Whether attribute mutation is locked.
    pub fn attributes_frozen(&self) -> bool {
        self.attributes
    }

    /// Whether both locks are set.
    pub fn fully_frozen(&self) -> bool {
        self.values && self.attributes
    }
}
