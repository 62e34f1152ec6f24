// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - compiling the `[[watch]]` bindings (glob -> tasks),
//! - wiring up a cross-platform filesystem watcher (`notify`),
//! - optional content hashing so saves that change nothing are ignored.
//!
//! It does **not** resolve dependencies; it only turns filesystem changes
//! into task-level triggers for the runtime.

pub mod event_handler;
pub mod hash;
pub mod patterns;
pub mod watcher;

pub use event_handler::{process_file_change, tasks_for_path};
pub use hash::{ContentHashFilter, compute_file_hash};
pub use patterns::{
    WatchBinding, build_bindings_from_config, compile_bindings, relative_event_path,
    unknown_binding_tasks,
};
pub use watcher::{WatcherHandle, spawn_watcher};
