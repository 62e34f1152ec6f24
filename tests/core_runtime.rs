use litdag::engine::{
    ChainOutcome, CoreCommand, CoreRuntime, RuntimeEvent, TriggerQueue, TriggerReason,
};
use litdag::types::TriggerWhileRunningBehaviour;

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn trigger(tasks: &[&str]) -> RuntimeEvent {
    RuntimeEvent::TasksTriggered {
        tasks: names(tasks),
        reason: TriggerReason::FileWatch,
    }
}

fn completed(run_id: u64) -> RuntimeEvent {
    RuntimeEvent::ChainCompleted {
        run_id,
        outcome: ChainOutcome::Success,
    }
}

fn start(run_id: u64, tasks: &[&str]) -> CoreCommand {
    CoreCommand::StartChain {
        run_id,
        tasks: names(tasks),
    }
}

fn queue_core(queue_length: usize) -> CoreRuntime {
    CoreRuntime::new(TriggerWhileRunningBehaviour::Queue, queue_length)
}

#[test]
fn queue_coalesces_into_last_batch_when_full() {
    let mut queue = TriggerQueue::new(TriggerWhileRunningBehaviour::Queue, 1);
    queue.record_triggers(&names(&["integration"]));
    queue.record_triggers(&names(&["lint", "integration"]));

    assert_eq!(queue.len(), 1);
    assert_eq!(queue.next_batch(), Some(names(&["integration", "lint"])));
    assert!(queue.is_empty());
}

#[test]
fn queue_keeps_separate_batches_up_to_the_limit() {
    let mut queue = TriggerQueue::new(TriggerWhileRunningBehaviour::Queue, 2);
    queue.record_triggers(&names(&["a"]));
    queue.record_triggers(&names(&["b"]));
    queue.record_triggers(&names(&["c"]));

    assert_eq!(queue.next_batch(), Some(names(&["a"])));
    assert_eq!(queue.next_batch(), Some(names(&["b", "c"])));
    assert_eq!(queue.next_batch(), None);
}

#[test]
fn drop_mode_never_queues() {
    let mut queue = TriggerQueue::new(TriggerWhileRunningBehaviour::Drop, 5);
    queue.record_triggers(&names(&["a"]));
    assert!(queue.is_empty());
}

#[test]
fn zero_length_is_clamped_to_one() {
    let mut queue = TriggerQueue::new(TriggerWhileRunningBehaviour::Queue, 0);
    queue.record_triggers(&names(&["a"]));
    assert_eq!(queue.len(), 1);
}

#[test]
fn idle_trigger_starts_chain_with_sorted_unique_tasks() {
    let mut core = queue_core(1);

    let step = core.step(trigger(&["lint", "integration", "lint"]));

    assert!(step.keep_running);
    assert_eq!(step.commands, vec![start(1, &["integration", "lint"])]);
    assert_eq!(core.current_run(), Some(1));
}

#[test]
fn triggers_during_a_run_become_one_follow_up_run() {
    let mut core = queue_core(1);

    core.step(trigger(&["integration"]));
    assert!(core.step(trigger(&["integration"])).commands.is_empty());
    assert!(core.step(trigger(&["lint"])).commands.is_empty());
    assert!(!core.queue_is_empty());

    let step = core.step(completed(1));
    assert_eq!(step.commands, vec![start(2, &["integration", "lint"])]);

    let step = core.step(completed(2));
    assert!(step.commands.is_empty());
    assert!(core.is_idle());
}

#[test]
fn drop_mode_ignores_triggers_while_running() {
    let mut core = CoreRuntime::new(TriggerWhileRunningBehaviour::Drop, 1);

    core.step(trigger(&["integration"]));
    core.step(trigger(&["integration"]));

    let step = core.step(completed(1));
    assert!(step.commands.is_empty());
    assert!(core.is_idle());
}

#[test]
fn stale_completion_is_ignored() {
    let mut core = queue_core(1);
    core.step(trigger(&["integration"]));

    let step = core.step(completed(7));

    assert!(step.commands.is_empty());
    assert_eq!(core.current_run(), Some(1));
}

#[test]
fn failed_chain_still_starts_queued_run() {
    let mut core = queue_core(1);
    core.step(trigger(&["integration"]));
    core.step(trigger(&["integration"]));

    let step = core.step(RuntimeEvent::ChainCompleted {
        run_id: 1,
        outcome: ChainOutcome::Failed("boom".to_string()),
    });

    assert!(step.keep_running);
    assert_eq!(step.commands, vec![start(2, &["integration"])]);
}

#[test]
fn last_completion_leaves_core_idle_and_running() {
    let mut core = queue_core(1);
    core.step(trigger(&["integration"]));

    let step = core.step(completed(1));

    assert!(step.keep_running);
    assert!(step.commands.is_empty());
    assert!(core.is_idle());
    assert!(core.queue_is_empty());
}

#[test]
fn shutdown_stops_the_loop() {
    let mut core = queue_core(1);
    let step = core.step(RuntimeEvent::ShutdownRequested);
    assert!(!step.keep_running);
}
