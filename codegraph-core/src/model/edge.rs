//! Edge schema: one directed relationship between two node IDs.

use super::node::Metadata;
use serde::{Deserialize, Serialize};
use serde_json::Map;
use std::fmt::{Display, Formatter};

/// Kind of relationship an edge represents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    Imports,
    Exports,
    Defines,
    Calls,
    Emits,
    Subscribes,
    Publishes,
    Fetches,
    Includes,
    SerialWrite,
    SerialRead,
    EnvUses,
    EnvDefines,
}

impl Display for EdgeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use EdgeType::*;
        f.write_str(match self {
            Imports => "imports",
            Exports => "exports",
            Defines => "defines",
            Calls => "calls",
            Emits => "emits",
            Subscribes => "subscribes",
            Publishes => "publishes",
            Fetches => "fetches",
            Includes => "includes",
            SerialWrite => "serial_write",
            SerialRead => "serial_read",
            EnvUses => "env_uses",
            EnvDefines => "env_defines",
        })
    }
}

/// A directed relationship between two node IDs. `target` may reference a
/// node that was never added to the graph (dangling targets are tolerated,
/// see [`crate::model::graph::Graph`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub edge_type: EdgeType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub line: u32,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Metadata,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type,
            file: String::new(),
            line: 0,
            metadata: Metadata::new(),
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }
}
