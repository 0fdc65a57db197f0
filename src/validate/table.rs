//! Structural consistency check for one raw table.

use std::collections::BTreeSet;

use serde_json::Value;

use super::shape::{table_entries, KeyShape, RowShape};

/// How a validator should proceed after a failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Stop at the first failed check
    FailFast,
    /// Evaluate every check and gather every message
    CollectAll,
}

/// Outcome of a structural validation: a verdict plus its messages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableReport {
    failed: bool,
    messages: Vec<String>,
}

impl TableReport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        self.failed = true;
        self.messages.push(message.into());
    }

    pub(crate) fn absorb(&mut self, prefix: &str, other: TableReport) {
        if other.failed {
            self.failed = true;
        }
        self.messages
            .extend(other.messages.into_iter().map(|m| format!("{prefix} : {m}")));
    }

    /// Whether every check passed.
    pub fn is_valid(&self) -> bool {
        !self.failed
    }

    /// The failure messages, in check order. Empty when valid.
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// The first failure message, if any.
    pub fn first_message(&self) -> Option<&str> {
        self.messages.first().map(String::as_str)
    }
}

/// Fail-fast convenience wrapper around [`check_table`].
pub fn good_table(table: &Value) -> bool {
    check_table(table, ValidationMode::FailFast).is_valid()
}

/// Checks one raw table for internal structural consistency.
///
/// The checks are purely shape-to-shape and run in a fixed order: the
/// container must be mapping-like; an empty table is trivially valid; all
/// keys must share one shape; all mapping rows must share one field-name
/// set; all sequence rows must share one length that also agrees with the
/// mapping rows' field count; scalar rows are allowed only when every row
/// has exactly one field. No schema is consulted.
pub fn check_table(table: &Value, mode: ValidationMode) -> TableReport {
    let mut report = TableReport::new();

    let Some(entries) = table_entries(table) else {
        report.fail("Not a dict-like object");
        return report;
    };
    if entries.is_empty() {
        return report;
    }

    let head_shape = KeyShape::of(&entries[0].0);
    if !entries.iter().all(|(key, _)| KeyShape::of(key) == head_shape) {
        report.fail("Inconsistent key lengths");
        if mode == ValidationMode::FailFast {
            return report;
        }
    }

    let mapping_rows: Vec<_> = entries
        .iter()
        .filter_map(|(_, row)| row.as_object())
        .collect();
    if let Some(head) = mapping_rows.first() {
        let head_names: BTreeSet<&str> = head.keys().map(String::as_str).collect();
        let uniform = mapping_rows
            .iter()
            .all(|row| row.keys().map(String::as_str).collect::<BTreeSet<_>>() == head_names);
        if !uniform {
            report.fail("Inconsistent data field name keys");
            if mode == ValidationMode::FailFast {
                return report;
            }
        }
    }

    let sequence_rows: Vec<_> = entries
        .iter()
        .filter_map(|(_, row)| row.as_array())
        .collect();
    if let Some(head) = sequence_rows.first() {
        let uniform = sequence_rows.iter().all(|row| row.len() == head.len());
        let agrees_with_mappings = mapping_rows
            .first()
            .map_or(true, |mapping| mapping.len() == head.len());
        if !uniform || !agrees_with_mappings {
            report.fail("Inconsistent data row lengths");
            if mode == ValidationMode::FailFast {
                return report;
            }
        }
    }

    let scalar_count = entries
        .iter()
        .filter(|(_, row)| RowShape::of(row) == RowShape::Scalar)
        .count();
    if scalar_count > 0 {
        let all_single = mapping_rows.iter().all(|row| row.len() == 1)
            && sequence_rows.iter().all(|row| row.len() == 1);
        if !all_single {
            report.fail("At least one value is not a dict-like object");
        }
    }

    report
}
