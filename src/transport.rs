//! Device transport seam
//!
//! The engine never talks to devices itself. A [`DeviceClient`] is the
//! contract a transport implementation (eAPI, SSH, a replay file) must
//! satisfy to feed the capture path; tests use scripted stand-ins.

use crate::error::Result;

/// Raw output of one command, as returned by the device
#[derive(Debug, Clone, PartialEq)]
pub struct RawCommandOutput {
    pub command: String,
    pub text: String,
}

/// A connection able to execute CLI commands on a device
pub trait DeviceClient {
    /// Run the commands in order and return one output per command.
    ///
    /// `encoding` is the transport-level output encoding to request
    /// (typically `"text"`); implementations that only support one
    /// encoding may ignore it.
    fn run(&mut self, commands: &[String], encoding: &str) -> Result<Vec<RawCommandOutput>>;
}
