//! Snapshots — the persisted capture format and its loader
//!
//! A snapshot file is a JSON array of command entries, one per command in
//! capture order:
//!
//! ```json
//! [
//!   {
//!     "command": "show ip route",
//!     "encoding": "list",
//!     "result": [["NETWORK", "MASK", "NEXT_HOP"],
//!                ["10.0.0.0", "24", "1.1.1.1"]]
//!   },
//!   {
//!     "command": "show version",
//!     "encoding": "text",
//!     "result": "Arista DCS-7050QX-32S\n..."
//!   }
//! ]
//! ```
//!
//! `"list"` entries carry a table: the first inner array is the header,
//! the rest are rows. Any other encoding is kept as raw text; those
//! commands had no matching parse template and cannot be structurally
//! diffed. Unknown extra keys are tolerated, so files written by older
//! capture tooling load unchanged.

use crate::error::{Error, Result};
use crate::table::Table;
use crate::value::Value;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Encoding tag for parsed tabular results.
pub const LIST_ENCODING: &str = "list";

/// Output of one command within a snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// Parsed into a table by a matching template.
    Table(Table),
    /// No template matched; the raw text is preserved as captured.
    Raw(String),
}

/// One command's captured result
#[derive(Debug, Clone, PartialEq)]
pub struct CommandResult {
    pub command: String,
    pub encoding: String,
    pub output: CommandOutput,
}

/// One full capture of a device at a point in time
///
/// Immutable after construction. The source hash identifies the exact
/// bytes the snapshot was loaded from (or would serialize to), so reports
/// can name their inputs.
#[derive(Debug, Clone)]
pub struct Snapshot {
    results: Vec<CommandResult>,
    source_hash: String,
}

/// Per-command summary row, for inspection output
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CommandSummary {
    pub command: String,
    pub encoding: String,
    /// Table dimensions for parsed results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    /// Raw text size for unparsed results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_bytes: Option<usize>,
}

fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{}", hex::encode(&hasher.finalize()[..8]))
}

impl Snapshot {
    /// Build a snapshot from in-memory results (the capture path).
    pub fn from_results(results: Vec<CommandResult>) -> Snapshot {
        let mut snapshot = Snapshot {
            results,
            source_hash: String::new(),
        };
        let serialized = snapshot.to_json().unwrap_or_default();
        snapshot.source_hash = content_hash(serialized.as_bytes());
        snapshot
    }

    /// Load a snapshot from its persisted JSON text.
    pub fn from_json(text: &str) -> Result<Snapshot> {
        let root: serde_json::Value = serde_json::from_str(text)?;
        Self::from_value(root, content_hash(text.as_bytes()))
    }

    /// Load a snapshot file.
    pub fn from_path(path: &Path) -> Result<Snapshot> {
        let text = std::fs::read_to_string(path)?;
        Snapshot::from_json(&text)
    }

    fn from_value(root: serde_json::Value, source_hash: String) -> Result<Snapshot> {
        let entries = root
            .as_array()
            .ok_or_else(|| Error::Format("snapshot root must be an array".into()))?;

        let mut results = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            results.push(
                parse_entry(entry)
                    .map_err(|e| Error::Format(format!("entry {}: {}", i, e)))?,
            );
        }

        Ok(Snapshot {
            results,
            source_hash,
        })
    }

    /// Persisted JSON form, pretty-printed.
    pub fn to_json(&self) -> Result<String> {
        let entries: Vec<serde_json::Value> = self.results.iter().map(render_entry).collect();
        Ok(serde_json::to_string_pretty(&serde_json::Value::Array(
            entries,
        ))?)
    }

    pub fn results(&self) -> &[CommandResult] {
        &self.results
    }

    pub fn source_hash(&self) -> &str {
        &self.source_hash
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Per-command summary, in capture order.
    pub fn summary(&self) -> Vec<CommandSummary> {
        self.results
            .iter()
            .map(|r| match &r.output {
                CommandOutput::Table(t) => CommandSummary {
                    command: r.command.clone(),
                    encoding: r.encoding.clone(),
                    rows: Some(t.n_rows()),
                    columns: Some(t.n_columns()),
                    raw_bytes: None,
                },
                CommandOutput::Raw(text) => CommandSummary {
                    command: r.command.clone(),
                    encoding: r.encoding.clone(),
                    rows: None,
                    columns: None,
                    raw_bytes: Some(text.len()),
                },
            })
            .collect()
    }
}

fn parse_entry(entry: &serde_json::Value) -> std::result::Result<CommandResult, String> {
    let obj = entry.as_object().ok_or("entry must be an object")?;

    let command = obj
        .get("command")
        .and_then(|v| v.as_str())
        .ok_or("missing 'command' string")?
        .to_string();

    let encoding = obj
        .get("encoding")
        .and_then(|v| v.as_str())
        .unwrap_or("text")
        .to_string();

    let result = obj.get("result").ok_or("missing 'result'")?;

    let output = if encoding == LIST_ENCODING {
        let table = parse_table(result).map_err(|e| match e {
            Error::Format(msg) => msg,
            other => other.to_string(),
        })?;
        CommandOutput::Table(table)
    } else {
        CommandOutput::Raw(parse_raw(result)?)
    };

    Ok(CommandResult {
        command,
        encoding,
        output,
    })
}

/// Nested-array table form: header first, then rows.
fn parse_table(result: &serde_json::Value) -> Result<Table> {
    let outer = result
        .as_array()
        .ok_or_else(|| Error::Format("'list' result must be an array of arrays".into()))?;

    let mut lines = outer.iter();
    let header = match lines.next() {
        None => Vec::new(),
        Some(first) => first
            .as_array()
            .ok_or_else(|| Error::Format("header must be an array".into()))?
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| Error::Format(format!("column name must be a string: {}", v)))
            })
            .collect::<Result<Vec<String>>>()?,
    };

    let rows = lines
        .map(|line| {
            line.as_array()
                .ok_or_else(|| Error::Format("row must be an array".into()))?
                .iter()
                .map(Value::from_json)
                .collect::<Result<Vec<Value>>>()
        })
        .collect::<Result<Vec<Vec<Value>>>>()?;

    Table::new(header, rows)
}

/// Raw text shapes: a plain string, an array of lines, or the transport's
/// native `{"output": "..."}` object.
fn parse_raw(result: &serde_json::Value) -> std::result::Result<String, String> {
    match result {
        serde_json::Value::String(s) => Ok(s.clone()),
        serde_json::Value::Array(lines) => {
            let parts: std::result::Result<Vec<&str>, String> = lines
                .iter()
                .map(|l| l.as_str().ok_or_else(|| "raw lines must be strings".to_string()))
                .collect();
            Ok(parts?.join("\n"))
        }
        serde_json::Value::Object(obj) => obj
            .get("output")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| "raw result object must have an 'output' string".to_string()),
        other => Err(format!("unsupported raw result shape: {}", other)),
    }
}

fn render_entry(result: &CommandResult) -> serde_json::Value {
    let rendered = match &result.output {
        CommandOutput::Table(table) => {
            let mut outer: Vec<serde_json::Value> = Vec::with_capacity(table.n_rows() + 1);
            outer.push(serde_json::Value::Array(
                table
                    .header()
                    .iter()
                    .map(|h| serde_json::Value::String(h.clone()))
                    .collect(),
            ));
            for row in table.rows() {
                outer.push(serde_json::Value::Array(
                    row.iter().map(Value::to_json).collect(),
                ));
            }
            serde_json::Value::Array(outer)
        }
        CommandOutput::Raw(text) => serde_json::Value::String(text.clone()),
    };

    serde_json::json!({
        "command": result.command,
        "encoding": result.encoding,
        "result": rendered,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_list_and_text_entries() {
        let text = r#"[
            {"command": "show ip route", "encoding": "list",
             "result": [["NETWORK", "MASK"], ["10.0.0.0", 24]]},
            {"command": "show version", "encoding": "text",
             "result": {"output": "DCS-7050\n"}}
        ]"#;
        let snapshot = Snapshot::from_json(text).unwrap();
        assert_eq!(snapshot.len(), 2);

        match &snapshot.results()[0].output {
            CommandOutput::Table(t) => {
                assert_eq!(t.n_rows(), 1);
                assert_eq!(t.rows()[0][1], Value::Number(24.0));
            }
            CommandOutput::Raw(_) => panic!("expected a table"),
        }
        match &snapshot.results()[1].output {
            CommandOutput::Raw(s) => assert_eq!(s, "DCS-7050\n"),
            CommandOutput::Table(_) => panic!("expected raw text"),
        }
    }

    #[test]
    fn arity_mismatch_is_a_format_error() {
        let text = r#"[
            {"command": "show ip route", "encoding": "list",
             "result": [["NETWORK", "MASK"], ["10.0.0.0"]]}
        ]"#;
        let err = Snapshot::from_json(text).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn unknown_extra_keys_are_tolerated() {
        let text = r#"[
            {"command": "show ip route", "encoding": "list", "parser": "google",
             "result": [["NETWORK"]]}
        ]"#;
        let snapshot = Snapshot::from_json(text).unwrap();
        assert_eq!(snapshot.results()[0].command, "show ip route");
    }

    #[test]
    fn raw_lines_array_joins() {
        let text = r#"[
            {"command": "show version", "encoding": "text",
             "result": ["line one", "line two"]}
        ]"#;
        let snapshot = Snapshot::from_json(text).unwrap();
        match &snapshot.results()[0].output {
            CommandOutput::Raw(s) => assert_eq!(s, "line one\nline two"),
            CommandOutput::Table(_) => panic!("expected raw text"),
        }
    }

    #[test]
    fn round_trips_through_persisted_form() {
        let text = r#"[
            {"command": "show ip route", "encoding": "list",
             "result": [["NETWORK", "MASK"], ["10.0.0.0", "24"]]}
        ]"#;
        let snapshot = Snapshot::from_json(text).unwrap();
        let dumped = snapshot.to_json().unwrap();
        let reloaded = Snapshot::from_json(&dumped).unwrap();
        assert_eq!(reloaded.results(), snapshot.results());
    }

    #[test]
    fn source_hash_distinguishes_content() {
        let a = Snapshot::from_json(r#"[{"command": "a", "result": "x"}]"#).unwrap();
        let b = Snapshot::from_json(r#"[{"command": "b", "result": "x"}]"#).unwrap();
        assert_ne!(a.source_hash(), b.source_hash());
        assert!(a.source_hash().starts_with("sha256:"));
    }
}
