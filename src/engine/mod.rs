// src/engine/mod.rs

//! Watch-mode orchestration.
//!
//! Once the initial chain has run, `litdag watch` re-runs chains whenever the
//! watcher reports a change. [`core::CoreRuntime`] decides *what* to run
//! (at most one chain at a time, later triggers go through the
//! [`queue::TriggerQueue`]); [`runtime::Runtime`] owns the channel and the
//! executor and does the IO.

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

/// How a chain run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    Success,
    Failed(String),
}

/// Why tasks were triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// Triggered due to a filesystem event.
    FileWatch,
}

/// Events flowing into the runtime from the watcher, the executor, etc.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// These tasks should be re-run (with their prerequisites).
    TasksTriggered {
        tasks: Vec<TaskName>,
        reason: TriggerReason,
    },
    /// A chain started by the runtime has finished.
    ChainCompleted { run_id: u64, outcome: ChainOutcome },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod queue;
pub mod runtime;

pub use core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use queue::TriggerQueue;
pub use crate::types::TriggerWhileRunningBehaviour;
pub use runtime::Runtime;
