// src/watch/hash.rs

//! Content hashing for `use_hash = true` watch bindings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use blake3::Hasher;
use tracing::{debug, warn};

use crate::fs::{FileSystem, glob_files};

/// Hex blake3 digest of a file's bytes.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let bytes = fs.read(path)?;
    let mut hasher = Hasher::new();
    hasher.update(&bytes);
    Ok(hasher.finalize().to_hex().to_string())
}

/// Remembers the last seen content hash per path, so editor saves that do
/// not change anything can be ignored.
#[derive(Debug, Default)]
pub struct ContentHashFilter {
    /// `None` records that the file was absent.
    seen: HashMap<PathBuf, Option<String>>,
}

impl ContentHashFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current hash of every file matching `pattern`.
    pub fn prime(&mut self, fs: &dyn FileSystem, root: &Path, pattern: &str) -> Result<usize> {
        let files = glob_files(fs, root, pattern)?;
        let mut primed = 0;
        for path in files.into_iter().filter(|p| fs.is_file(p)) {
            let hash = compute_file_hash(fs, &path)?;
            self.seen.insert(path, Some(hash));
            primed += 1;
        }
        debug!(pattern, primed, "primed content hashes");
        Ok(primed)
    }

    /// Whether `path` differs from the last time it was seen, updating the
    /// record. Unreadable files count as changed.
    pub fn changed(&mut self, fs: &dyn FileSystem, path: &Path) -> bool {
        let current = if fs.is_file(path) {
            match compute_file_hash(fs, path) {
                Ok(hash) => Some(hash),
                Err(err) => {
                    warn!(path = ?path, error = %err, "failed to hash file; treating as changed");
                    self.seen.remove(path);
                    return true;
                }
            }
        } else {
            None
        };

        match self.seen.insert(path.to_path_buf(), current.clone()) {
            Some(previous) => previous != current,
            None => true,
        }
    }
}
