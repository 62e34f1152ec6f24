// src/watch/patterns.rs

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use globset::GlobMatcher;

use crate::config::model::{ConfigFile, WatchBindingConfig};
use crate::dag::TaskGraph;
use crate::engine::TaskName;
use crate::fs::glob::{compile_glob, relative_to};

/// A compiled `[[watch]]` binding: changes to paths matching `glob`
/// re-trigger `tasks`.
///
/// Patterns are relative to the project root; the watcher passes relative
/// paths like `"docs/tutorials/01_intro.md"` into [`WatchBinding::matches`].
#[derive(Clone)]
pub struct WatchBinding {
    glob: String,
    matcher: GlobMatcher,
    tasks: Vec<TaskName>,
    use_hash: bool,
}

impl fmt::Debug for WatchBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchBinding")
            .field("glob", &self.glob)
            .field("tasks", &self.tasks)
            .finish_non_exhaustive()
    }
}

impl WatchBinding {
    pub fn new(glob: &str, tasks: Vec<TaskName>, use_hash: bool) -> Result<Self> {
        let matcher =
            compile_glob(glob).with_context(|| format!("building watch glob {glob}"))?;
        Ok(Self {
            glob: glob.to_string(),
            matcher,
            tasks,
            use_hash,
        })
    }

    pub fn glob(&self) -> &str {
        &self.glob
    }

    pub fn tasks(&self) -> &[TaskName] {
        &self.tasks
    }

    /// Only trigger on actual content changes.
    pub fn use_hash(&self) -> bool {
        self.use_hash
    }

    /// Whether a root-relative path (forward slashes) falls under this
    /// binding.
    pub fn matches(&self, rel_path: &str) -> bool {
        self.matcher.is_match(rel_path)
    }
}

pub fn compile_bindings(bindings: &[WatchBindingConfig]) -> Result<Vec<WatchBinding>> {
    bindings
        .iter()
        .map(|b| WatchBinding::new(&b.glob, b.tasks.clone(), b.use_hash))
        .collect()
}

/// Compiled bindings for a loaded config (defaults included).
pub fn build_bindings_from_config(cfg: &ConfigFile) -> Result<Vec<WatchBinding>> {
    compile_bindings(cfg.watch_bindings())
}

/// `(glob, task)` pairs whose task is missing from the graph.
///
/// Reported as a warning when watching starts; the runtime turns the first
/// matching event into a `TaskNotFound` error.
pub fn unknown_binding_tasks<'a>(
    bindings: &'a [WatchBinding],
    graph: &TaskGraph,
) -> Vec<(&'a str, &'a str)> {
    bindings
        .iter()
        .flat_map(|b| {
            b.tasks()
                .iter()
                .filter(move |t| !graph.contains(t))
                .map(move |t| (b.glob(), t.as_str()))
        })
        .collect()
}

/// Convert an event path into a root-relative string.
///
/// Tries a direct prefix strip first and then falls back to canonicalizing
/// both sides, which matters where the OS reports paths through a different
/// prefix (symlinked temp dirs on macOS, for instance).
pub fn relative_event_path(root: &Path, path: &Path) -> Option<String> {
    if let Some(rel) = relative_to(root, path) {
        return Some(rel);
    }

    let root_canon = root.canonicalize().ok()?;
    // A deleted file cannot be canonicalized; its parent usually can.
    match path.canonicalize() {
        Ok(path_canon) => relative_to(&root_canon, &path_canon),
        Err(_) => {
            let parent = path.parent()?.canonicalize().ok()?;
            let name = path.file_name()?;
            relative_to(&root_canon, &parent.join(name))
        }
    }
}
