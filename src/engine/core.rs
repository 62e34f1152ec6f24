// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! The core consumes [`RuntimeEvent`]s and returns [`CoreCommand`]s for the
//! IO shell (`engine::runtime::Runtime`). It owns no channels, spawns
//! nothing and performs no IO, so it is tested directly.
//!
//! [`CoreCommand`]: crate::engine::CoreCommand

use crate::engine::event_handlers::{
    CoreStep, RunSlot, handle_chain_completed, handle_trigger,
};
use crate::engine::queue::TriggerQueue;
use crate::engine::RuntimeEvent;
use crate::types::TriggerWhileRunningBehaviour;

/// At most one chain runs at a time; everything else waits in the queue.
#[derive(Debug)]
pub struct CoreRuntime {
    slot: RunSlot,
    queue: TriggerQueue,
}

impl CoreRuntime {
    pub fn new(behaviour: TriggerWhileRunningBehaviour, queue_length: usize) -> Self {
        Self {
            slot: RunSlot::default(),
            queue: TriggerQueue::new(behaviour, queue_length),
        }
    }

    /// No chain is running.
    pub fn is_idle(&self) -> bool {
        self.slot.is_idle()
    }

    /// The running chain's id.
    pub fn current_run(&self) -> Option<u64> {
        self.slot.current
    }

    pub fn queue_is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::TasksTriggered { tasks, reason } => {
                handle_trigger(&mut self.slot, &mut self.queue, tasks, reason)
            }
            RuntimeEvent::ChainCompleted { run_id, outcome } => {
                handle_chain_completed(&mut self.slot, &mut self.queue, run_id, outcome)
            }
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }
}
