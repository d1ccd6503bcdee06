//! Filesystem discovery (§4.B): the thin collaborator that turns a root
//! directory into a sorted list of `(relpath, bytes)` pairs for the core
//! extraction pipeline. The core itself (see [`crate::build_graph`]) never
//! touches the filesystem directly — it accepts whatever this module (or
//! any equivalent caller) hands it.

use crate::config::GraphConfig;
use crate::error::CoreError;
use crate::model::Language;
use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// A discovered file: its repo-relative path (always `/`-separated) and its
/// detected language, if any.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    pub relpath: String,
    pub language: Option<Language>,
}

/// Walk `root`, applying the prune list and extension/basename filters, and
/// return discovered files sorted lexicographically by relative path so that
/// downstream processing order is deterministic.
pub fn discover_files(root: &Path, cfg: &GraphConfig) -> Result<Vec<DiscoveredFile>> {
    if !root.is_dir() {
        return Err(CoreError::RootNotADirectory(root.to_path_buf()).into());
    }
    let root = dunce::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());

    let ignore_globs = crate::util::build_globset(&cfg.filters.ignore_globs);
    let prune: Vec<&str> = cfg.filters.prune_dirs.iter().map(String::as_str).collect();

    let mut out = Vec::new();
    let mut skipped_too_big = 0usize;
    let mut skipped_unrecognized = 0usize;

    let walker = WalkDir::new(&root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| keep_entry(e, &root, &prune));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(err) => {
                warn!(error = %err, "discovery: walk error");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let relpath = to_repo_rel(&root, path);

        if let Some(gs) = &ignore_globs {
            if gs.is_match(&relpath) {
                continue;
            }
        }

        let language = classify(path);
        if language.is_none() && !is_env_basename(path) {
            skipped_unrecognized += 1;
            continue;
        }

        match fs::metadata(path) {
            Ok(meta) if meta.len() as usize > cfg.limits.max_file_bytes => {
                skipped_too_big += 1;
                debug!(path = %relpath, size = meta.len(), "discovery: skip, too large");
                continue;
            }
            Ok(_) => {}
            Err(err) => {
                warn!(path = %relpath, error = %err, "discovery: metadata failed");
                continue;
            }
        }

        out.push(DiscoveredFile { relpath, language });
    }

    out.sort_by(|a, b| a.relpath.cmp(&b.relpath));
    debug!(
        accepted = out.len(),
        skipped_too_big, skipped_unrecognized, "discovery: done"
    );
    Ok(out)
}

/// UTF-8, then Latin-1, then ASCII; empty string (and a logged skip) on
/// total failure, per §4.B / §7's file-read-failure policy.
pub fn read_file_lossy(path: &Path) -> String {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "discovery: read failed");
            return String::new();
        }
    };
    decode_best_effort(&bytes)
}

/// Same fallback chain as [`read_file_lossy`], applied to an in-memory
/// buffer — the entry point used when a caller already has `(path, bytes)`
/// pairs instead of a filesystem to walk.
pub fn decode_best_effort(bytes: &[u8]) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }
    if bytes.iter().all(|&b| b < 0x100) {
        // Latin-1 maps every byte 1:1 onto a Unicode scalar value.
        return bytes.iter().map(|&b| b as char).collect();
    }
    match std::str::from_utf8(&bytes.iter().map(|&b| if b < 0x80 { b } else { b'?' }).collect::<Vec<u8>>()) {
        Ok(s) => s.to_string(),
        Err(_) => String::new(),
    }
}

fn keep_entry(entry: &DirEntry, root: &Path, prune: &[&str]) -> bool {
    if entry.path() == root {
        return true;
    }
    if entry.file_type().is_dir() {
        if let Some(name) = entry.file_name().to_str() {
            if name.starts_with('.') || prune.contains(&name) {
                return false;
            }
        }
    }
    true
}

fn classify(path: &Path) -> Option<Language> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    Language::from_extension(&ext)
}

fn is_env_basename(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(".env"))
}

fn to_repo_rel(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

/// Used by callers that already have file bytes (e.g. an embedded fixture
/// or a VCS blob store) rather than a real filesystem to walk.
pub fn discovered_from_pairs(pairs: &[(String, Vec<u8>)]) -> Vec<(DiscoveredFile, String)> {
    let mut out: Vec<(DiscoveredFile, String)> = pairs
        .iter()
        .filter_map(|(relpath, bytes)| {
            let relpath = relpath.replace('\\', "/");
            let path = PathBuf::from(&relpath);
            let language = classify(&path);
            if language.is_none() && !is_env_basename(&path) {
                return None;
            }
            let text = decode_best_effort(bytes);
            Some((DiscoveredFile { relpath, language }, text))
        })
        .collect();
    out.sort_by(|a, b| a.0.relpath.cmp(&b.0.relpath));
    out
}
