// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::watch::event_handler::process_file_change;
use crate::watch::hash::ContentHashFilter;
use crate::watch::patterns::WatchBinding;

/// Keeps the underlying `RecommendedWatcher` alive. Dropping this handle
/// stops file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `root` recursively and send `RuntimeEvent::TasksTriggered` for
/// every change that matches one of `bindings`.
///
/// Must be called from within a Tokio runtime. Failing to set up the
/// watcher is a [`LitdagError::Watch`].
///
/// [`LitdagError::Watch`]: crate::errors::LitdagError::Watch
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    bindings: Vec<WatchBinding>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    fs: Arc<dyn FileSystem>,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or(root);

    let mut hash_filter = ContentHashFilter::new();
    for binding in bindings.iter().filter(|b| b.use_hash()) {
        if let Err(err) = hash_filter.prime(fs.as_ref(), &root, binding.glob()) {
            warn!(glob = binding.glob(), error = %err, "failed to prime content hashes");
        }
    }

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    eprintln!("litdag: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("litdag: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    tokio::spawn(async move {
        'events: while let Some(event) = event_rx.recv().await {
            // Reads (including our own while generating) are not changes.
            if matches!(event.kind, EventKind::Access(_)) {
                continue;
            }
            debug!(?event, "received notify event");

            for path in &event.paths {
                let keep_going = process_file_change(
                    fs.as_ref(),
                    &root,
                    path,
                    &bindings,
                    &mut hash_filter,
                    &runtime_tx,
                )
                .await;
                if !keep_going {
                    break 'events;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}
