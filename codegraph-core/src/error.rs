//! The one typed, fatal error kind in the pipeline (§7): everything else
//! (read failures, unresolved imports, malformed `package.json`, a missing
//! subgraph start) is recovered locally and never surfaces as an `Err`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("root path is not a directory: {0}")]
    RootNotADirectory(PathBuf),
}
