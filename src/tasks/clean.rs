// src/tasks/clean.rs

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::Result;
use crate::fs::{FileSystem, glob_files};

/// What a clean pass removed.
#[derive(Debug, Clone, Default)]
pub struct CleanReport {
    pub removed: Vec<PathBuf>,
}

/// Delete everything under `root` matching `pattern`.
///
/// Matching directories are removed recursively without confirmation.
/// Nothing matching is a no-op. The first filesystem error aborts the pass
/// and is returned to the caller.
pub fn clean(fs: &dyn FileSystem, root: &Path, pattern: &str) -> Result<CleanReport> {
    let targets = glob_files(fs, root, pattern)?;
    let mut report = CleanReport::default();

    for path in targets {
        if fs.is_dir(&path) {
            fs.remove_dir_all(&path)?;
        } else {
            fs.remove_file(&path)?;
        }
        debug!(path = ?path, "removed");
        report.removed.push(path);
    }

    info!(pattern, removed = report.removed.len(), "clean finished");
    Ok(report)
}
