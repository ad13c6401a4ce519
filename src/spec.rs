//! Diff rules — per-command grouping/index/check configuration
//!
//! What "changed" means is different for every command: a routing table is
//! keyed by prefix and judged by next hop, a BGP summary is keyed by
//! neighbor and judged by state. A [`DiffSpec`] captures that per-command
//! semantics and a [`SpecRegistry`] maps command names to their rules.
//!
//! The registry is plain configuration, passed explicitly into the
//! comparison; nothing in the engine reads ambient state.
//!
//! ## Example rules file
//!
//! ```yaml
//! show ip route:
//!   grouping: [NETWORK, MASK]
//!   index: [NETWORK, MASK]
//!   check: [NEXT_HOP, INTERFACE]
//! show ip bgp summary:
//!   grouping: [NEIGHBOR]
//!   index: [NEIGHBOR]
//!   check: [STATE, ASN]
//! ```

use crate::error::Result;
use crate::table::Table;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Diff rules for one command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DiffSpec {
    /// Columns whose values define a logical entry; rows sharing them are
    /// merged before comparison. Empty means no grouping.
    #[serde(default)]
    pub grouping: Vec<String>,

    /// Join key between the two snapshots; typically a subset of
    /// `grouping`.
    #[serde(default)]
    pub index: Vec<String>,

    /// Columns whose values decide whether a matched entry changed.
    #[serde(default)]
    pub check: Vec<String>,
}

impl DiffSpec {
    /// Columns named by this spec that are absent from the table header.
    ///
    /// An empty result means the spec is valid for the table. Duplicates
    /// across grouping/index/check are reported once.
    pub fn missing_columns(&self, table: &Table) -> Vec<String> {
        let mut missing = Vec::new();
        for name in self
            .grouping
            .iter()
            .chain(self.index.iter())
            .chain(self.check.iter())
        {
            if table.column_index(name).is_none() && !missing.contains(name) {
                missing.push(name.clone());
            }
        }
        missing
    }
}

/// Command name to diff rules mapping
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SpecRegistry {
    specs: HashMap<String, DiffSpec>,
}

impl SpecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock rules shipped with the tool.
    pub fn builtin() -> Self {
        let mut registry = SpecRegistry::new();
        registry.insert(
            "show ip route",
            DiffSpec {
                grouping: vec!["NETWORK".into(), "MASK".into()],
                index: vec!["NETWORK".into(), "MASK".into()],
                check: vec!["NEXT_HOP".into(), "INTERFACE".into()],
            },
        );
        registry
    }

    /// Parse a registry from YAML configuration.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Load a registry from a YAML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }

    pub fn insert(&mut self, command: &str, spec: DiffSpec) {
        self.specs.insert(command.to_string(), spec);
    }

    pub fn get(&self, command: &str) -> Option<&DiffSpec> {
        self.specs.get(command)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Registered command names, sorted for deterministic display.
    pub fn commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.specs.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}
