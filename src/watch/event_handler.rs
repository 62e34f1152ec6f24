// src/watch/event_handler.rs

//! Turning a single changed path into a task trigger.

use std::path::Path;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::{RuntimeEvent, TaskName, TriggerReason};
use crate::fs::FileSystem;
use crate::watch::hash::ContentHashFilter;
use crate::watch::patterns::{WatchBinding, relative_event_path};

/// Tasks bound to `rel_path`, deduplicated, in binding order.
///
/// Bindings with `use_hash` only contribute when `content_changed` reports a
/// real change. The callback runs at most once per path.
pub fn tasks_for_path(
    bindings: &[WatchBinding],
    rel_path: &str,
    mut content_changed: impl FnMut() -> bool,
) -> Vec<TaskName> {
    let mut changed: Option<bool> = None;
    let mut tasks: Vec<TaskName> = Vec::new();

    for binding in bindings.iter().filter(|b| b.matches(rel_path)) {
        if binding.use_hash() && !*changed.get_or_insert_with(&mut content_changed) {
            debug!(glob = binding.glob(), path = rel_path, "content unchanged; skipping binding");
            continue;
        }
        for task in binding.tasks() {
            if !tasks.contains(task) {
                tasks.push(task.clone());
            }
        }
    }

    tasks
}

/// Process one changed path and forward the resulting trigger.
///
/// Returns `false` once the runtime channel is closed, telling the caller to
/// stop watching.
pub async fn process_file_change(
    fs: &dyn FileSystem,
    root: &Path,
    path: &Path,
    bindings: &[WatchBinding],
    hash_filter: &mut ContentHashFilter,
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
) -> bool {
    let Some(rel) = relative_event_path(root, path) else {
        warn!("could not relativize path {:?} against root {:?}", path, root);
        return true;
    };

    let tasks = tasks_for_path(bindings, &rel, || hash_filter.changed(fs, path));
    if tasks.is_empty() {
        return true;
    }

    info!(path = %rel, ?tasks, "change detected; triggering tasks");
    if let Err(err) = runtime_tx
        .send(RuntimeEvent::TasksTriggered {
            tasks,
            reason: TriggerReason::FileWatch,
        })
        .await
    {
        warn!("failed to send RuntimeEvent::TasksTriggered: {err}");
        return false;
    }
    true
}
