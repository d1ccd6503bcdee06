//! Small path/glob helpers shared by discovery and the import resolver.

use globset::{Glob, GlobSet, GlobSetBuilder};

/// Build a [`GlobSet`] from patterns, skipping invalid or empty ones.
/// Returns `None` if the input list is empty or nothing compiled.
pub fn build_globset(patterns: &[String]) -> Option<GlobSet> {
    if patterns.is_empty() {
        return None;
    }
    let mut builder = GlobSetBuilder::new();
    let mut any = false;
    for pat in patterns {
        if pat.trim().is_empty() {
            continue;
        }
        if let Ok(g) = Glob::new(pat) {
            builder.add(g);
            any = true;
        }
    }
    if !any {
        return None;
    }
    builder.build().ok()
}

/// Lexically normalize a `/`-joined relative path: resolve `.`/`..`
/// segments without touching the filesystem. Used by the JS/TS and C/C++
/// import resolvers (§4.D), which work on path arithmetic only.
pub fn normalize_unix_path(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                if stack.last().is_some_and(|s| *s != "..") {
                    stack.pop();
                } else {
                    stack.push("..");
                }
            }
            s => stack.push(s),
        }
    }
    stack.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_parent_segments() {
        assert_eq!(normalize_unix_path("a/b/../c"), "a/c");
        assert_eq!(normalize_unix_path("a/./b"), "a/b");
        assert_eq!(normalize_unix_path("../a/b"), "../a/b");
    }
}
