// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # netstate — network device state capture and diff
//!
//! Captures point-in-time command output from network devices and
//! compares two such captures to report what changed.
//!
//! ## Core Concept
//!
//! A capture is a **snapshot**: an ordered list of commands, each with
//! either a parsed table or raw text. Comparing two snapshots is a
//! structured diff, not a text diff: per-command **diff rules** say which
//! columns identify a logical entry (grouping/index) and which columns
//! decide that it changed (check). Rows sharing a key are collapsed into
//! one entry first, so an ECMP route with three next hops is one entry
//! whose next-hop column is a three-value set.
//!
//! ## Quick Start
//!
//! ```rust
//! use netstate::{compare_snapshots, Snapshot, SpecRegistry};
//!
//! # fn main() -> netstate::Result<()> {
//! let before = Snapshot::from_json(r#"[
//!   {"command": "show ip route", "encoding": "list",
//!    "result": [["NETWORK", "MASK", "NEXT_HOP", "INTERFACE"],
//!               ["10.0.0.0", "24", "1.1.1.1", "Eth1"]]}
//! ]"#)?;
//! let after = Snapshot::from_json(r#"[
//!   {"command": "show ip route", "encoding": "list",
//!    "result": [["NETWORK", "MASK", "NEXT_HOP", "INTERFACE"],
//!               ["10.0.0.0", "24", "2.2.2.2", "Eth1"]]}
//! ]"#)?;
//!
//! let report = compare_snapshots(&before, &after, &SpecRegistry::builtin());
//! assert_eq!(report.diffs["show ip route"].changed.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                             │
//! │  CAPTURE (DeviceClient + OutputParser)                      │
//! │       │                                                     │
//! │       └──► StateCapture::run ──► Snapshot (+ backups)       │
//! │                                                             │
//! │  SNAPSHOT PAIR + SpecRegistry (YAML rules)                  │
//! │       │                                                     │
//! │       ├──► group(table, grouping) ──► GroupedTable          │
//! │       │                                                     │
//! │       ├──► diff(left, right, index, check) ──► DiffReport   │
//! │       │                                                     │
//! │       └──► compare_snapshots(a, b, rules) ──► CompareReport │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Device transports and text-to-table templates are deliberately outside
//! this crate; the [`transport::DeviceClient`] and [`parse::OutputParser`]
//! traits are the seams they plug into.

// Core data model
pub mod error;
pub mod snapshot;
pub mod spec;
pub mod table;
pub mod value;

// Diff engine
pub mod compare;
pub mod diff;
pub mod group;

// Capture path
pub mod capture;
pub mod parse;
pub mod transport;

// Re-exports
pub use capture::{BackupPaths, CaptureOutcome, StateCapture};
pub use compare::{compare_snapshots, CompareReport, Side, SkipReason, SkippedCommand};
pub use diff::{diff, DiffEntry, DiffReport, EntryField};
pub use error::{Error, Result};
pub use group::{group, GroupedRow, GroupedTable};
pub use parse::{NullParser, OutputParser, Parsed};
pub use snapshot::{CommandOutput, CommandResult, CommandSummary, Snapshot, LIST_ENCODING};
pub use spec::{DiffSpec, SpecRegistry};
pub use table::Table;
pub use transport::{DeviceClient, RawCommandOutput};
pub use value::{Field, Value, ValueSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
