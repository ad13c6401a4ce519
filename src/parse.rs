//! Template parser seam
//!
//! Turning raw CLI text into a table is template work (TextFSM-style)
//! and lives outside this crate. [`OutputParser`] is the contract the
//! capture path consumes; a command with no matching template stays raw
//! and is excluded from structured diffing.

use crate::table::Table;

/// Result of attempting to parse one command's raw output
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    /// A template matched and produced a table.
    Table(Table),
    /// No template for this command/vendor; keep the raw text.
    Unparsed,
}

/// A template-based text-to-table parser
pub trait OutputParser {
    fn parse(&self, command: &str, vendor: &str, raw: &str) -> Parsed;
}

/// Parser with no templates; every command stays raw.
///
/// Useful as a default when capturing from a vendor without a template
/// index: backups are still taken, structured diffing is just skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullParser;

impl OutputParser for NullParser {
    fn parse(&self, _command: &str, _vendor: &str, _raw: &str) -> Parsed {
        Parsed::Unparsed
    }
}
