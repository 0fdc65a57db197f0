//! Structural consistency check across every table of a candidate object.

use serde_json::Value;

use super::table::{check_table, TableReport, ValidationMode};

/// Checks every table-valued member of a candidate object.
///
/// The candidate is an object whose members are raw tables. `members` names
/// the members to check; when `None`, every member whose name does not start
/// with an underscore is checked. A named member missing from the candidate
/// fails with "<name> not an attribute"; a member failing the table check
/// contributes its messages prefixed with the member name.
///
/// In [`ValidationMode::FailFast`] the first failing member ends the check;
/// in [`ValidationMode::CollectAll`] every member is evaluated and every
/// message kept.
pub fn check_object(
    candidate: &Value,
    members: Option<&[&str]>,
    mode: ValidationMode,
) -> TableReport {
    let mut report = TableReport::new();

    let Some(object) = candidate.as_object() else {
        report.fail("Not a dict-like object");
        return report;
    };

    let names: Vec<&str> = match members {
        Some(names) => names.to_vec(),
        None => object
            .keys()
            .map(String::as_str)
            .filter(|name| !name.starts_with('_'))
            .collect(),
    };

    for name in names {
        match object.get(name) {
            None => {
                report.fail(format!("{name} not an attribute"));
                if mode == ValidationMode::FailFast {
                    return report;
                }
            }
            Some(table) => {
                let sub = check_table(table, mode);
                let failed = !sub.is_valid();
                report.absorb(name, sub);
                if failed && mode == ValidationMode::FailFast {
                    return report;
                }
            }
        }
    }

    report
}
