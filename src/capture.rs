//! State capture — run a command list and persist the snapshot
//!
//! Drives a [`DeviceClient`] through a command list, hands each raw
//! output to the [`OutputParser`], and assembles a [`Snapshot`]. Backup
//! files mirror what was captured: a text file with the raw output of
//! every command, and the JSON snapshot the diff engine consumes.

use crate::error::Result;
use crate::parse::{OutputParser, Parsed};
use crate::snapshot::{CommandOutput, CommandResult, Snapshot, LIST_ENCODING};
use crate::transport::{DeviceClient, RawCommandOutput};
use chrono::Local;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A capture job for one device
#[derive(Debug, Clone)]
pub struct StateCapture {
    pub device: String,
    pub vendor: String,
    pub commands: Vec<String>,
}

/// A finished capture: the structured snapshot plus the raw text it was
/// parsed from
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub snapshot: Snapshot,
    pub raw: Vec<RawCommandOutput>,
}

/// Paths of the backup files written for one capture
#[derive(Debug, Clone, PartialEq)]
pub struct BackupPaths {
    pub json: PathBuf,
    pub text: PathBuf,
}

impl StateCapture {
    pub fn new(device: &str, vendor: &str, commands: Vec<String>) -> StateCapture {
        StateCapture {
            device: device.to_string(),
            vendor: vendor.to_string(),
            commands,
        }
    }

    /// Execute the command list and parse what the templates cover.
    ///
    /// Commands without a matching template keep their raw text in the
    /// snapshot, exactly as captured.
    pub fn run<C: DeviceClient, P: OutputParser>(
        &self,
        client: &mut C,
        parser: &P,
    ) -> Result<CaptureOutcome> {
        let raw = client.run(&self.commands, "text")?;

        let mut results = Vec::with_capacity(raw.len());
        for output in &raw {
            let result = match parser.parse(&output.command, &self.vendor, &output.text) {
                Parsed::Table(table) => CommandResult {
                    command: output.command.clone(),
                    encoding: LIST_ENCODING.to_string(),
                    output: CommandOutput::Table(table),
                },
                Parsed::Unparsed => {
                    log::warn!(
                        "no template matched '{}'; keeping raw output",
                        output.command
                    );
                    CommandResult {
                        command: output.command.clone(),
                        encoding: "text".to_string(),
                        output: CommandOutput::Raw(output.text.clone()),
                    }
                }
            };
            results.push(result);
        }

        Ok(CaptureOutcome {
            snapshot: Snapshot::from_results(results),
            raw,
        })
    }

    /// Write the backup pair into `dir`, named
    /// `<device>_backup_<YYYYmmddHHMMSS>.{json,txt}`.
    pub fn write_backup(&self, outcome: &CaptureOutcome, dir: &Path) -> Result<BackupPaths> {
        let stem = format!(
            "{}_backup_{}",
            self.device,
            Local::now().format("%Y%m%d%H%M%S")
        );
        let paths = BackupPaths {
            json: dir.join(format!("{}.json", stem)),
            text: dir.join(format!("{}.txt", stem)),
        };

        std::fs::write(&paths.json, outcome.snapshot.to_json()?)?;

        let mut text = std::fs::File::create(&paths.text)?;
        for output in &outcome.raw {
            writeln!(text, "--------------- {} -------------", output.command)?;
            text.write_all(output.text.as_bytes())?;
            if !output.text.ends_with('\n') {
                writeln!(text)?;
            }
            writeln!(text, "--------------------------------")?;
        }

        Ok(paths)
    }
}
