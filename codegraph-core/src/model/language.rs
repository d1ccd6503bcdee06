//! Language taxonomy for nodes, edges, and extractor dispatch.
//!
//! Kept intentionally small and closed: adding a language means touching
//! `from_extension` and adding a sibling module under `languages/`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Source language (or pseudo-language) tagged on nodes and producer/consumer
/// entries. `Config` covers `.env`, `package.json`, and other non-code files.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Js,
    Ts,
    Python,
    Cpp,
    Arduino,
    Config,
}

impl Display for Language {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Language::Js => "js",
            Language::Ts => "ts",
            Language::Python => "python",
            Language::Cpp => "cpp",
            Language::Arduino => "arduino",
            Language::Config => "config",
        })
    }
}

impl Language {
    /// Map a file extension (without the leading dot, already lowercased) to
    /// a language, per the extension table. Returns `None` for `.json`
    /// style config suffixes handled by the basename check in discovery,
    /// and for anything unrecognized.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::Js),
            "ts" | "tsx" => Some(Self::Ts),
            "py" => Some(Self::Python),
            "cpp" | "c" | "h" | "hpp" => Some(Self::Cpp),
            "ino" => Some(Self::Arduino),
            "json" | "yaml" | "yml" | "toml" | "ini" => Some(Self::Config),
            _ => None,
        }
    }
}
