//! Configuration for the discovery/driver layer.
//!
//! None of this is part of the deterministic graph output — it only shapes
//! which files are discovered and how subgraph/cluster queries default their
//! parameters. Mirrors the grouped-struct/env-overlay/validate shape used
//! elsewhere in this codebase's config layers, generalized to this pipeline's
//! own knobs.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;

/// Top-level configuration for a single analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphConfig {
    pub filters: Filters,
    pub limits: Limits,
    pub features: FeatureFlags,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            filters: Filters::default(),
            limits: Limits::default(),
            features: FeatureFlags::default(),
        }
    }
}

impl GraphConfig {
    /// Start from defaults and overlay any `GRAPH_*` environment variables
    /// that are present and well-formed. Unknown or malformed values are
    /// ignored rather than rejected — this is developer-convenience config,
    /// not part of the normative pipeline.
    ///
    /// Supported variables (all optional):
    /// - `GRAPH_MAX_FILE_BYTES` (usize)
    /// - `GRAPH_SUBGRAPH_MAX_DEPTH` (usize)
    /// - `GRAPH_CLUSTER_MIN_SIZE` (usize)
    /// - `GRAPH_IGNORE_GLOBS` (comma-separated)
    /// - `GRAPH_PRUNE_DIRS` (comma-separated, added to the built-in prune set)
    /// - `GRAPH_FEATURE_REVIEW_CLUSTERS` (bool)
    /// - `GRAPH_FEATURE_MARKDOWN` (bool)
    pub fn load_from_env_or_default() -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(v) = env_usize("GRAPH_MAX_FILE_BYTES") {
            cfg.limits.max_file_bytes = v;
        }
        if let Some(v) = env_usize("GRAPH_SUBGRAPH_MAX_DEPTH") {
            cfg.limits.subgraph_max_depth = v;
        }
        if let Some(v) = env_usize("GRAPH_CLUSTER_MIN_SIZE") {
            cfg.limits.cluster_min_size = v;
        }

        if let Some(v) = env_list("GRAPH_IGNORE_GLOBS") {
            cfg.filters.ignore_globs = v;
        }
        if let Some(v) = env_list("GRAPH_PRUNE_DIRS") {
            cfg.filters.prune_dirs.extend(v);
        }

        if let Some(v) = env_bool("GRAPH_FEATURE_REVIEW_CLUSTERS") {
            cfg.features.enable_review_clusters = v;
        }
        if let Some(v) = env_bool("GRAPH_FEATURE_MARKDOWN") {
            cfg.features.enable_markdown_report = v;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject nonsensical limits before the pipeline runs.
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_file_bytes == 0 {
            return Err(anyhow!("max_file_bytes must be greater than 0"));
        }
        if self.limits.cluster_min_size == 0 {
            return Err(anyhow!("cluster_min_size must be at least 1"));
        }
        Ok(())
    }
}

/// Which directories/files discovery skips or excludes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Filters {
    /// Directory basenames pruned during the walk, in addition to any
    /// directory beginning with `.` (always pruned except the root itself).
    pub prune_dirs: Vec<String>,
    /// Extra glob patterns for files to ignore outright.
    pub ignore_globs: Vec<String>,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            prune_dirs: [
                "node_modules",
                "dist",
                "build",
                "__pycache__",
                "venv",
                ".venv",
                ".git",
                "vendor",
                ".pio",
                ".platformio",
                "target",
                ".next",
                "coverage",
                ".nyc_output",
                "managed_components",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            ignore_globs: vec![],
        }
    }
}

/// Size/behavior limits for discovery and graph queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    /// Files larger than this are skipped during discovery (bytes).
    pub max_file_bytes: usize,
    /// Default `max_depth` for subgraph extraction (§4.A).
    pub subgraph_max_depth: usize,
    /// Default `min_size` for file-cluster extraction (§4.A).
    pub cluster_min_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_bytes: 5 * 1024 * 1024,
            subgraph_max_depth: 10,
            cluster_min_size: 2,
        }
    }
}

/// Toggles for optional, non-normative exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// §4.G review-cluster export.
    pub enable_review_clusters: bool,
    /// AS.6 optional Markdown report.
    pub enable_markdown_report: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_review_clusters: false,
            enable_markdown_report: false,
        }
    }
}

fn env_bool(key: &str) -> Option<bool> {
    env::var(key).ok().and_then(|s| match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    })
}

fn env_usize(key: &str) -> Option<usize> {
    env::var(key).ok().and_then(|s| s.trim().parse::<usize>().ok())
}

fn env_list(key: &str) -> Option<Vec<String>> {
    let raw = env::var(key).ok()?;
    Some(
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(GraphConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_max_file_bytes() {
        let mut cfg = GraphConfig::default();
        cfg.limits.max_file_bytes = 0;
        assert!(cfg.validate().is_err());
    }
}
