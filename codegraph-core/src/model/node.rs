//! Node schema: one addressable entity in the graph.

use super::language::Language;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

/// Kind of entity a node represents.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    File,
    Function,
    Class,
    Endpoint,
    Event,
    Topic,
    Variable,
}

impl Display for NodeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use NodeType::*;
        f.write_str(match self {
            File => "file",
            Function => "function",
            Class => "class",
            Endpoint => "endpoint",
            Event => "event",
            Topic => "topic",
            Variable => "variable",
        })
    }
}

/// Open-ended scalar metadata. With the `preserve_order` feature, `Map` is
/// insertion-ordered rather than sorted; extractors always insert metadata
/// keys in the same fixed order for a given pattern, so output stays
/// byte-identical across runs.
pub type Metadata = Map<String, Value>;

pub fn metadata_of(pairs: impl IntoIterator<Item = (&'static str, Value)>) -> Metadata {
    let mut m = Map::new();
    for (k, v) in pairs {
        m.insert(k.to_string(), v);
    }
    m
}

/// One addressable entity in the graph: a file, a definition, an endpoint,
/// a topic, an event, an environment variable, or an external package.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file: String,
    pub name: String,
    pub node_type: NodeType,
    pub language: Language,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub line: u32,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Metadata,
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>, node_type: NodeType, language: Language) -> Self {
        Self {
            id: id.into(),
            file: String::new(),
            name: name.into(),
            node_type,
            language,
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

/// Build the canonical `file:<relpath>` node for the start of every extractor pass.
pub fn file_node(relpath: &str, language: Language) -> Node {
    Node::new(format!("file:{relpath}"), relpath, NodeType::File, language).with_file(relpath)
}
