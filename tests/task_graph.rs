mod common;

use common::{ConfigFileBuilder, TaskConfigBuilder};
use litdag::dag::{TaskAction, TaskDef, TaskGraph, names, resolve};
use litdag::errors::LitdagError;

fn shell(name: &str, after: &[&str]) -> TaskDef {
    TaskDef {
        name: name.to_string(),
        after: after.iter().map(|s| s.to_string()).collect(),
        action: TaskAction::Shell(format!("echo {name}")),
    }
}

fn builtin_graph() -> TaskGraph {
    TaskGraph::from_config(&ConfigFileBuilder::new().build()).unwrap()
}

#[test]
fn default_runs_the_whole_pipeline_in_order() {
    let plan = resolve(&builtin_graph(), &[names::DEFAULT]).unwrap();
    assert_eq!(plan, vec!["clean", "generate-examples", "integration", "default"]);
}

#[test]
fn watch_runs_after_default() {
    let plan = resolve(&builtin_graph(), &[names::WATCH]).unwrap();
    assert_eq!(
        plan,
        vec!["clean", "generate-examples", "integration", "default", "watch"]
    );
}

#[test]
fn intermediate_target_only_pulls_in_prerequisites() {
    let plan = resolve(&builtin_graph(), &[names::GENERATE_EXAMPLES]).unwrap();
    assert_eq!(plan, vec!["clean", "generate-examples"]);
}

#[test]
fn repeated_targets_run_once() {
    let plan = resolve(&builtin_graph(), &["integration", "clean", "integration"]).unwrap();
    assert_eq!(plan, vec!["clean", "generate-examples", "integration"]);
}

#[test]
fn unknown_target_is_reported() {
    let err = resolve(&builtin_graph(), &["dist"]).unwrap_err();
    assert!(matches!(err, LitdagError::TaskNotFound(ref t) if t == "dist"));
}

#[test]
fn diamond_collapses_shared_prerequisite() {
    let graph = TaskGraph::from_tasks(vec![
        shell("a", &[]),
        shell("b", &["a"]),
        shell("c", &["a"]),
        shell("d", &["b", "c"]),
    ])
    .unwrap();

    assert_eq!(resolve(&graph, &["d"]).unwrap(), vec!["a", "b", "c", "d"]);
    assert_eq!(graph.dependents_of("a"), ["b".to_string(), "c".to_string()]);
}

#[test]
fn cycle_is_rejected() {
    let err = TaskGraph::from_tasks(vec![shell("a", &["b"]), shell("b", &["a"])]).unwrap_err();
    assert!(matches!(err, LitdagError::DagCycle(_)));
}

#[test]
fn self_dependency_is_rejected() {
    let err = TaskGraph::from_tasks(vec![shell("a", &["a"])]).unwrap_err();
    assert!(matches!(err, LitdagError::ConfigError(ref msg) if msg.contains("itself")));
}

#[test]
fn unknown_dependency_is_rejected() {
    let err = TaskGraph::from_tasks(vec![shell("a", &["missing"])]).unwrap_err();
    assert!(matches!(err, LitdagError::ConfigError(ref msg) if msg.contains("missing")));
}

#[test]
fn duplicate_task_is_rejected() {
    let err = TaskGraph::from_tasks(vec![shell("a", &[]), shell("a", &[])]).unwrap_err();
    assert!(matches!(err, LitdagError::ConfigError(_)));
}

#[test]
fn custom_task_hooks_into_builtin_chain() {
    let cfg = ConfigFileBuilder::new()
        .with_task(
            "lint",
            TaskConfigBuilder::new("ruff check examples")
                .after(names::GENERATE_EXAMPLES)
                .build(),
        )
        .build();
    let graph = TaskGraph::from_config(&cfg).unwrap();

    assert_eq!(
        resolve(&graph, &["lint"]).unwrap(),
        vec!["clean", "generate-examples", "lint"]
    );
    // Ties among ready tasks are broken by name.
    assert_eq!(
        resolve(&graph, &["lint", "integration"]).unwrap(),
        vec!["clean", "generate-examples", "integration", "lint"]
    );
    assert!(matches!(
        graph.get("lint").map(|d| &d.action),
        Some(TaskAction::Shell(cmd)) if cmd == "ruff check examples"
    ));
}
