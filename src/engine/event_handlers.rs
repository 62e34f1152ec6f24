// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use std::collections::BTreeSet;

use tracing::{debug, info, warn};

use crate::engine::queue::TriggerQueue;
use crate::engine::{ChainOutcome, TaskName, TriggerReason};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Run these targets as a new chain.
    StartChain { run_id: u64, tasks: Vec<TaskName> },
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    pub fn continue_with(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Mutable run bookkeeping shared by the handlers.
#[derive(Debug, Default)]
pub struct RunSlot {
    /// Chain currently executing, if any.
    pub current: Option<u64>,
    run_counter: u64,
}

impl RunSlot {
    pub fn is_idle(&self) -> bool {
        self.current.is_none()
    }

    fn start(&mut self, tasks: Vec<TaskName>) -> CoreCommand {
        self.run_counter += 1;
        self.current = Some(self.run_counter);
        info!(run_id = self.run_counter, ?tasks, "starting chain");
        CoreCommand::StartChain {
            run_id: self.run_counter,
            tasks,
        }
    }
}

/// Handle a trigger event.
///
/// - Idle: start a chain right away.
/// - Running: hand the trigger to the queue, which coalesces or drops it.
pub fn handle_trigger(
    slot: &mut RunSlot,
    queue: &mut TriggerQueue,
    tasks: Vec<TaskName>,
    reason: TriggerReason,
) -> CoreStep {
    if tasks.is_empty() {
        return CoreStep::continue_with(Vec::new());
    }

    if slot.is_idle() {
        let unique: BTreeSet<TaskName> = tasks.into_iter().collect();
        debug!(?reason, "trigger while idle");
        return CoreStep::continue_with(vec![slot.start(unique.into_iter().collect())]);
    }

    debug!(?reason, ?tasks, run_id = slot.current, "trigger while a chain is running");
    queue.record_triggers(&tasks);
    CoreStep::continue_with(Vec::new())
}

/// Handle completion of a chain.
pub fn handle_chain_completed(
    slot: &mut RunSlot,
    queue: &mut TriggerQueue,
    run_id: u64,
    outcome: ChainOutcome,
) -> CoreStep {
    if slot.current != Some(run_id) {
        warn!(run_id, current = slot.current, "completion for a run that is not active; ignoring");
        return CoreStep::continue_with(Vec::new());
    }

    match &outcome {
        ChainOutcome::Success => info!(run_id, "chain succeeded"),
        ChainOutcome::Failed(reason) => warn!(run_id, %reason, "chain failed; still watching"),
    }
    slot.current = None;

    let commands = queue
        .next_batch()
        .map(|next| slot.start(next))
        .into_iter()
        .collect();
    CoreStep::continue_with(commands)
}
