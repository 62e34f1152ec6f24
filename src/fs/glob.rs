// src/fs/glob.rs

//! Glob helpers shared by the clean/generate tasks, config validation and
//! the watcher.
//!
//! Patterns are written relative to the project root. A leading `./` is
//! accepted and ignored, and `*` never crosses a `/` (use `**` for that), so
//! `examples/*.py` only matches direct children of `examples/`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobMatcher};

use crate::fs::FileSystem;

const GLOB_META: [char; 4] = ['*', '?', '[', '{'];

/// Strip a leading `./` (possibly repeated) from a pattern.
pub fn normalize_pattern(pattern: &str) -> &str {
    let mut p = pattern.trim();
    while let Some(rest) = p.strip_prefix("./") {
        p = rest;
    }
    p
}

/// Compile a root-relative glob.
pub fn compile_glob(pattern: &str) -> Result<GlobMatcher> {
    let normalized = normalize_pattern(pattern);
    let glob = GlobBuilder::new(normalized)
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid glob pattern: {pattern}"))?;
    Ok(glob.compile_matcher())
}

/// The longest leading run of path components with no glob syntax.
///
/// `examples/*.py` -> `examples`, `**/*.md` -> `` (the root itself).
pub fn literal_base(pattern: &str) -> PathBuf {
    normalize_pattern(pattern)
        .split('/')
        .take_while(|component| !component.contains(GLOB_META))
        .filter(|component| !component.is_empty())
        .collect()
}

/// Render `path` relative to `root` with forward slashes, for matching.
pub fn relative_to(root: &Path, path: &Path) -> Option<String> {
    path.strip_prefix(root)
        .ok()
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
}

/// Every entry under `root` matching `pattern`, sorted by path.
///
/// Only the literal base directory of the pattern is walked. A matching
/// directory is returned as a single entry and not descended into. A base
/// directory that does not exist yields an empty list.
pub fn glob_files(fs: &dyn FileSystem, root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let matcher = compile_glob(pattern)?;
    let base = literal_base(pattern);
    let start = if base.as_os_str().is_empty() {
        root.to_path_buf()
    } else {
        root.join(&base)
    };

    let mut matches = Vec::new();

    if !fs.is_dir(&start) {
        if fs.exists(&start)
            && relative_to(root, &start).is_some_and(|rel| matcher.is_match(rel))
        {
            matches.push(start);
        }
        return Ok(matches);
    }

    let mut stack = vec![start];
    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            let Some(rel) = relative_to(root, &path) else {
                continue;
            };
            if matcher.is_match(&rel) {
                matches.push(path);
            } else if fs.is_dir(&path) {
                stack.push(path);
            }
        }
    }

    matches.sort();
    Ok(matches)
}
