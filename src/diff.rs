//! Join & classification — the structured diff of two grouped tables
//!
//! Performs a full outer join of the two normalized tables on the index
//! key and classifies every joined entry:
//!
//! - present only in the first snapshot  -> new
//! - present only in the second snapshot -> missing
//! - present in both with a differing check column -> changed
//!
//! Entries identical in every check column are dropped; columns outside
//! the check list never trigger a change, however much they diverge.

use crate::error::{Error, Result};
use crate::group::GroupedTable;
use crate::value::Field;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One column of a diff entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntryField {
    pub column: String,
    pub value: Field,
}

/// One classified logical entry
///
/// The key carries the index columns; `left`/`right` expose every other
/// column of the joined row, tagged by side. New entries have only a left
/// side, missing entries only a right side, changed entries both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiffEntry {
    pub key: Vec<EntryField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Vec<EntryField>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Vec<EntryField>>,
}

impl DiffEntry {
    fn describe_key(&self) -> String {
        let parts: Vec<_> = self
            .key
            .iter()
            .map(|f| format!("{}={}", f.column, f.value))
            .collect();
        parts.join(" ")
    }

    fn describe_side(fields: &[EntryField]) -> String {
        let parts: Vec<_> = fields
            .iter()
            .map(|f| format!("{}={}", f.column, f.value))
            .collect();
        parts.join(" ")
    }
}

/// The classification result for one command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiffReport {
    pub new: Vec<DiffEntry>,
    pub missing: Vec<DiffEntry>,
    pub changed: Vec<DiffEntry>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.missing.is_empty() && self.changed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.new.len() + self.missing.len() + self.changed.len()
    }

    /// Format as human-readable report
    pub fn to_report(&self) -> String {
        let mut out = String::new();

        if self.is_empty() {
            out.push_str("  no differences\n");
            return out;
        }

        for entry in &self.new {
            out.push_str(&format!("  + {}\n", entry.describe_key()));
            if let Some(left) = &entry.left {
                if !left.is_empty() {
                    out.push_str(&format!("      {}\n", DiffEntry::describe_side(left)));
                }
            }
        }
        for entry in &self.missing {
            out.push_str(&format!("  - {}\n", entry.describe_key()));
            if let Some(right) = &entry.right {
                if !right.is_empty() {
                    out.push_str(&format!("      {}\n", DiffEntry::describe_side(right)));
                }
            }
        }
        for entry in &self.changed {
            out.push_str(&format!("  ~ {}\n", entry.describe_key()));
            if let (Some(left), Some(right)) = (&entry.left, &entry.right) {
                out.push_str(&format!("      was: {}\n", DiffEntry::describe_side(left)));
                out.push_str(&format!("      now: {}\n", DiffEntry::describe_side(right)));
            }
        }

        out
    }
}

/// Resolved column positions for one side of the join.
struct SideColumns {
    index: Vec<usize>,
    check: Vec<usize>,
}

fn resolve(table: &GroupedTable, index: &[String], check: &[String]) -> Result<SideColumns> {
    let lookup = |name: &String| {
        table
            .column_index(name)
            .ok_or_else(|| Error::Other(format!("unknown column: {}", name)))
    };
    Ok(SideColumns {
        index: index.iter().map(lookup).collect::<Result<_>>()?,
        check: check.iter().map(lookup).collect::<Result<_>>()?,
    })
}

/// Collect every column that is not part of the index key, for one side.
fn side_fields(table: &GroupedTable, row: usize, index: &[usize]) -> Vec<EntryField> {
    table.rows()[row]
        .fields()
        .iter()
        .enumerate()
        .filter(|(i, _)| !index.contains(i))
        .map(|(i, field)| EntryField {
            column: table.header()[i].clone(),
            value: field.clone(),
        })
        .collect()
}

fn key_fields(table: &GroupedTable, row: usize, index: &[usize]) -> Vec<EntryField> {
    index
        .iter()
        .map(|&i| EntryField {
            column: table.header()[i].clone(),
            value: table.rows()[row].fields()[i].clone(),
        })
        .collect()
}

/// Diff two grouped tables.
///
/// `left` is the earlier snapshot's table, `right` the later one. Entry
/// order is the join's row order: new and changed entries follow the left
/// table, missing entries the right table.
pub fn diff(
    left: &GroupedTable,
    right: &GroupedTable,
    index: &[String],
    check: &[String],
) -> Result<DiffReport> {
    let lcols = resolve(left, index, check)?;
    let rcols = resolve(right, index, check)?;

    // Hash join: index the right side by key tuple. Keys are unique after
    // grouping; if grouping was skipped the first occurrence wins.
    let mut right_by_key: HashMap<Vec<&Field>, usize> = HashMap::with_capacity(right.len());
    for (at, row) in right.rows().iter().enumerate() {
        let key: Vec<&Field> = rcols.index.iter().map(|&i| &row.fields()[i]).collect();
        right_by_key.entry(key).or_insert(at);
    }

    let mut matched = vec![false; right.len()];
    let mut report = DiffReport::default();

    for (lat, lrow) in left.rows().iter().enumerate() {
        let key: Vec<&Field> = lcols.index.iter().map(|&i| &lrow.fields()[i]).collect();
        match right_by_key.get(&key) {
            Some(&rat) => {
                matched[rat] = true;
                let rrow = &right.rows()[rat];
                let differs = lcols
                    .check
                    .iter()
                    .zip(rcols.check.iter())
                    .any(|(&li, &ri)| lrow.fields()[li] != rrow.fields()[ri]);
                if differs {
                    report.changed.push(DiffEntry {
                        key: key_fields(left, lat, &lcols.index),
                        left: Some(side_fields(left, lat, &lcols.index)),
                        right: Some(side_fields(right, rat, &rcols.index)),
                    });
                }
            }
            None => {
                report.new.push(DiffEntry {
                    key: key_fields(left, lat, &lcols.index),
                    left: Some(side_fields(left, lat, &lcols.index)),
                    right: None,
                });
            }
        }
    }

    for (rat, seen) in matched.iter().enumerate() {
        if !seen {
            report.missing.push(DiffEntry {
                key: key_fields(right, rat, &rcols.index),
                left: None,
                right: Some(side_fields(right, rat, &rcols.index)),
            });
        }
    }

    log::debug!(
        "joined {}x{} entries: {} new, {} missing, {} changed",
        left.len(),
        right.len(),
        report.new.len(),
        report.missing.len(),
        report.changed.len()
    );

    Ok(report)
}
