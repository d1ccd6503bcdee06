//! Bridge schema: a cross-language correlation by shared string key.

use super::language::Language;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeType {
    Mqtt,
    Http,
    Websocket,
    Serial,
    Env,
}

impl Display for BridgeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use BridgeType::*;
        f.write_str(match self {
            Mqtt => "mqtt",
            Http => "http",
            Websocket => "websocket",
            Serial => "serial",
            Env => "env",
        })
    }
}

/// One producer or consumer participating in a bridge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub file: String,
    pub line: u32,
    pub language: Language,
    pub action: String,
}

impl Actor {
    pub fn new(file: impl Into<String>, line: u32, language: Language, action: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            language,
            action: action.into(),
        }
    }
}

/// A cross-language correlation of producers and consumers of a shared key
/// (an MQTT topic, an HTTP path, a WebSocket event name, the serial channel,
/// or an environment variable name).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bridge {
    pub bridge_type: BridgeType,
    pub key: String,
    pub producers: Vec<Actor>,
    pub consumers: Vec<Actor>,
}

impl Bridge {
    pub fn new(bridge_type: BridgeType, key: impl Into<String>, producers: Vec<Actor>, consumers: Vec<Actor>) -> Self {
        Self {
            bridge_type,
            key: key.into(),
            producers,
            consumers,
        }
    }

    /// Distinct files referenced by either side of the bridge.
    pub fn files(&self) -> std::collections::BTreeSet<String> {
        self.producers
            .iter()
            .chain(self.consumers.iter())
            .map(|a| a.file.clone())
            .filter(|f| !f.is_empty())
            .collect()
    }
}
