//! Snapshot comparison — pair commands, apply rules, collect reports
//!
//! Walks two captured snapshots, pairs their command results by command
//! name, and runs the grouping and join engines over every pair that has
//! a registered diff rule. A pair that cannot be compared is skipped with
//! a recorded diagnostic; one bad pair never aborts the run. A partially
//! successful comparison is the expected outcome, not an error.

use crate::diff::{diff, DiffReport};
use crate::group::group;
use crate::snapshot::{CommandOutput, CommandResult, Snapshot};
use crate::spec::SpecRegistry;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Which snapshot a diagnostic refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    First,
    Second,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::First => write!(f, "first"),
            Side::Second => write!(f, "second"),
        }
    }
}

/// Why a command's comparison was skipped
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// The command appears in only one snapshot.
    Unpaired { side: Side },
    /// A later occurrence of a command name already compared.
    Duplicate { side: Side },
    /// No template matched the output; raw text has no table schema.
    Unparsed { side: Side },
    /// No diff rule registered for the command.
    SpecNotFound,
    /// The rule names columns absent from the table.
    SpecInvalid { missing: Vec<String> },
    /// The two tables have different headers.
    SchemaMismatch,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unpaired { side } => {
                write!(f, "present only in the {} snapshot", side)
            }
            SkipReason::Duplicate { side } => {
                write!(f, "duplicate command in the {} snapshot", side)
            }
            SkipReason::Unparsed { side } => {
                write!(f, "unparsed raw output in the {} snapshot", side)
            }
            SkipReason::SpecNotFound => write!(f, "no diff rule known for this command"),
            SkipReason::SpecInvalid { missing } => {
                write!(f, "diff rule names unknown columns: {}", missing.join(", "))
            }
            SkipReason::SchemaMismatch => write!(f, "column names differ between snapshots"),
        }
    }
}

/// A command that could not be compared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SkippedCommand {
    pub command: String,
    pub reason: SkipReason,
}

/// The full result of comparing two snapshots
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompareReport {
    /// Content hash of the first snapshot's source.
    pub first_hash: String,
    /// Content hash of the second snapshot's source.
    pub second_hash: String,
    /// Per-command diff, keyed by command name.
    pub diffs: BTreeMap<String, DiffReport>,
    /// Commands that could not be compared, in encounter order.
    pub skipped: Vec<SkippedCommand>,
}

impl CompareReport {
    /// True when every compared command came back without differences.
    pub fn is_clean(&self) -> bool {
        self.diffs.values().all(|r| r.is_empty())
    }

    pub fn total_differences(&self) -> usize {
        self.diffs.values().map(|r| r.total()).sum()
    }

    /// Format as human-readable report
    pub fn to_report(&self) -> String {
        let mut out = String::new();

        out.push_str("SNAPSHOT DIFF\n");
        out.push_str("═══════════════════════════════════════════════════════════════\n\n");
        out.push_str(&format!("First:  {}\n", self.first_hash));
        out.push_str(&format!("Second: {}\n\n", self.second_hash));

        for (command, report) in &self.diffs {
            out.push_str(&format!(
                "{} ({} new, {} missing, {} changed)\n",
                command,
                report.new.len(),
                report.missing.len(),
                report.changed.len()
            ));
            out.push_str(&report.to_report());
            out.push('\n');
        }

        if !self.skipped.is_empty() {
            out.push_str("Skipped:\n");
            for skip in &self.skipped {
                out.push_str(&format!("  {}: {}\n", skip.command, skip.reason));
            }
        }

        out
    }
}

/// Compare two snapshots under the given diff rules.
///
/// Commands are paired by name: the second snapshot is indexed by command
/// and each command of the first snapshot is matched against it, so a
/// reordered command list still pairs correctly. Commands present in only
/// one snapshot are reported as unpaired. On duplicate command names the
/// first occurrence is compared and later ones are reported as skipped.
pub fn compare_snapshots(
    first: &Snapshot,
    second: &Snapshot,
    registry: &SpecRegistry,
) -> CompareReport {
    let mut report = CompareReport {
        first_hash: first.source_hash().to_string(),
        second_hash: second.source_hash().to_string(),
        diffs: BTreeMap::new(),
        skipped: Vec::new(),
    };

    // Index the second snapshot by command name, first occurrence wins.
    let mut second_by_name: HashMap<&str, &CommandResult> = HashMap::new();
    for result in second.results() {
        if second_by_name.contains_key(result.command.as_str()) {
            skip(
                &mut report,
                &result.command,
                SkipReason::Duplicate { side: Side::Second },
            );
        } else {
            second_by_name.insert(&result.command, result);
        }
    }

    let mut compared: HashSet<&str> = HashSet::new();
    let mut paired: HashSet<&str> = HashSet::new();

    for result in first.results() {
        if !compared.insert(result.command.as_str()) {
            skip(
                &mut report,
                &result.command,
                SkipReason::Duplicate { side: Side::First },
            );
            continue;
        }
        match second_by_name.get(result.command.as_str()) {
            None => skip(
                &mut report,
                &result.command,
                SkipReason::Unpaired { side: Side::First },
            ),
            Some(counterpart) => {
                paired.insert(result.command.as_str());
                match compare_pair(result, counterpart, registry) {
                    Ok(diff_report) => {
                        report.diffs.insert(result.command.clone(), diff_report);
                    }
                    Err(reason) => skip(&mut report, &result.command, reason),
                }
            }
        }
    }

    for result in second.results() {
        if second_by_name
            .get(result.command.as_str())
            .is_some_and(|kept| std::ptr::eq(*kept, result))
            && !paired.contains(result.command.as_str())
        {
            skip(
                &mut report,
                &result.command,
                SkipReason::Unpaired { side: Side::Second },
            );
        }
    }

    report
}

fn skip(report: &mut CompareReport, command: &str, reason: SkipReason) {
    log::warn!("skipping '{}': {}", command, reason);
    report.skipped.push(SkippedCommand {
        command: command.to_string(),
        reason,
    });
}

/// Compare one paired command, or explain why it cannot be compared.
fn compare_pair(
    first: &CommandResult,
    second: &CommandResult,
    registry: &SpecRegistry,
) -> Result<DiffReport, SkipReason> {
    let left = match &first.output {
        CommandOutput::Table(t) => t,
        CommandOutput::Raw(_) => return Err(SkipReason::Unparsed { side: Side::First }),
    };
    let right = match &second.output {
        CommandOutput::Table(t) => t,
        CommandOutput::Raw(_) => return Err(SkipReason::Unparsed { side: Side::Second }),
    };

    let spec = registry
        .get(&first.command)
        .ok_or(SkipReason::SpecNotFound)?;

    if !left.same_schema(right) {
        return Err(SkipReason::SchemaMismatch);
    }

    // Headers are identical at this point, so one side validates both.
    let missing = spec.missing_columns(left);
    if !missing.is_empty() {
        return Err(SkipReason::SpecInvalid { missing });
    }

    // The spec validated against the header above, so grouping and
    // joining can only fail on a column the validation missed.
    let invalid = |_| SkipReason::SpecInvalid {
        missing: spec.missing_columns(left),
    };
    let grouped_left = group(left, &spec.grouping).map_err(invalid)?;
    let grouped_right = group(right, &spec.grouping).map_err(invalid)?;

    diff(&grouped_left, &grouped_right, &spec.index, &spec.check).map_err(invalid)
}
