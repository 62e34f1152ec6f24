mod common;

use std::path::Path;
use std::sync::Arc;

use common::{ConfigFileBuilder, TaskConfigBuilder, init_tracing, tutorial, with_timeout, write_file};
use litdag::config::ConfigFile;
use litdag::errors::LitdagError;
use litdag::fs::RealFileSystem;
use litdag::tasks::Pipeline;
use litdag::types::ErrorPolicy;

fn pipeline(cfg: ConfigFile, root: &Path) -> Pipeline {
    Pipeline::new(cfg, root, Arc::new(RealFileSystem)).unwrap()
}

fn project() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "docs/tutorials/01_intro.md", &tutorial("print('intro')"));
    write_file(dir.path(), "docs/tutorials/02_loops.md", &tutorial("for i in range(2): print(i)"));
    dir
}

#[tokio::test]
async fn default_chain_regenerates_examples() {
    init_tracing();
    let dir = project();
    write_file(dir.path(), "examples/stale.py", "old = True\n");

    let report = with_timeout(pipeline(ConfigFileBuilder::new().build(), dir.path()).invoke(&["default"]))
        .await
        .unwrap();

    assert_eq!(
        report.executed,
        vec!["clean", "generate-examples", "integration", "default"]
    );
    assert!(!report.watch_requested);
    assert_eq!(report.clean.as_ref().unwrap().removed.len(), 1);
    assert_eq!(report.generate.as_ref().unwrap().written().count(), 2);

    assert!(!dir.path().join("examples/stale.py").exists());
    assert_eq!(
        std::fs::read_to_string(dir.path().join("examples/intro.py")).unwrap(),
        "print('intro')\n"
    );
    assert!(dir.path().join("examples/loops.py").exists());
}

#[tokio::test]
async fn output_of_removed_tutorial_is_cleaned_on_next_run() {
    init_tracing();
    let dir = project();
    write_file(dir.path(), "docs/tutorials/03_setup.sh.md", &tutorial("print('setup')"));
    let pipeline = pipeline(ConfigFileBuilder::new().build(), dir.path());

    with_timeout(pipeline.invoke(&["default"])).await.unwrap();
    let generated = dir.path().join("examples/setup.sh.py");
    assert!(generated.exists());

    std::fs::remove_file(dir.path().join("docs/tutorials/03_setup.sh.md")).unwrap();
    let report = with_timeout(pipeline.invoke(&["default"])).await.unwrap();

    assert!(report.clean.as_ref().unwrap().removed.contains(&generated));
    assert!(!generated.exists());
    assert_eq!(report.generate.as_ref().unwrap().written().count(), 2);
}

#[tokio::test]
async fn unknown_target_runs_nothing() {
    init_tracing();
    let dir = project();
    write_file(dir.path(), "examples/stale.py", "old = True\n");

    let err = pipeline(ConfigFileBuilder::new().build(), dir.path())
        .invoke(&["generate-examples", "dist"])
        .await
        .unwrap_err();

    assert!(matches!(err, LitdagError::TaskNotFound(ref t) if t == "dist"));
    assert!(dir.path().join("examples/stale.py").exists());
}

#[tokio::test]
async fn watch_target_requests_watch_mode() {
    init_tracing();
    let dir = project();

    let report = with_timeout(pipeline(ConfigFileBuilder::new().build(), dir.path()).invoke(&["watch"]))
        .await
        .unwrap();

    assert!(report.watch_requested);
    assert_eq!(report.executed.last().map(String::as_str), Some("watch"));
}

#[tokio::test]
async fn abort_policy_stops_the_chain() {
    init_tracing();
    let dir = project();
    write_file(dir.path(), "docs/tutorials/03_broken.md", "```python\nx = 1\n");
    let cfg = ConfigFileBuilder::new()
        .on_error(ErrorPolicy::Abort)
        .with_task("after-integration", TaskConfigBuilder::new("touch ran").after("integration").build())
        .build();

    let err = pipeline(cfg, dir.path())
        .invoke(&["after-integration"])
        .await
        .unwrap_err();

    assert!(matches!(err, LitdagError::Extract { .. }));
    assert!(!dir.path().join("ran").exists());
}

#[tokio::test]
async fn continue_policy_reports_and_carries_on() {
    init_tracing();
    let dir = project();
    write_file(dir.path(), "docs/tutorials/03_broken.md", "```python\nx = 1\n");

    let report = pipeline(ConfigFileBuilder::new().build(), dir.path())
        .invoke(&["integration"])
        .await
        .unwrap();

    let generate = report.generate.unwrap();
    assert_eq!(generate.written().count(), 2);
    assert_eq!(generate.failures().count(), 1);
}

#[cfg(unix)]
#[tokio::test]
async fn integration_command_receives_example_paths() {
    init_tracing();
    let dir = project();
    let cfg = ConfigFileBuilder::new()
        .integration_cmd("test \"$#\" -eq 2 && test -f \"$1\" && printf '%s\\n' \"$@\" > seen.txt")
        .build();

    with_timeout(pipeline(cfg, dir.path()).invoke(&["integration"]))
        .await
        .unwrap();

    let seen = std::fs::read_to_string(dir.path().join("seen.txt")).unwrap();
    assert_eq!(seen, "examples/intro.py\nexamples/loops.py\n");
}

#[cfg(unix)]
#[tokio::test]
async fn failing_integration_command_fails_the_task() {
    init_tracing();
    let dir = project();
    let cfg = ConfigFileBuilder::new().integration_cmd("exit 3").build();

    let err = with_timeout(pipeline(cfg, dir.path()).invoke(&["default"]))
        .await
        .unwrap_err();

    match err {
        LitdagError::TaskFailed { task, reason } => {
            assert_eq!(task, "integration");
            assert!(reason.contains("code 3"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn custom_shell_task_runs_in_project_root() {
    init_tracing();
    let dir = project();
    let cfg = ConfigFileBuilder::new()
        .with_task(
            "count",
            TaskConfigBuilder::new("ls examples > listing.txt")
                .after("generate-examples")
                .build(),
        )
        .build();

    let report = with_timeout(pipeline(cfg, dir.path()).invoke(&["count"]))
        .await
        .unwrap();

    assert_eq!(report.executed, vec!["clean", "generate-examples", "count"]);
    let listing = std::fs::read_to_string(dir.path().join("listing.txt")).unwrap();
    assert_eq!(listing, "intro.py\nloops.py\n");
}

#[cfg(unix)]
#[tokio::test]
async fn failing_custom_task_is_reported_by_name() {
    init_tracing();
    let dir = project();
    let cfg = ConfigFileBuilder::new()
        .with_task("broken", TaskConfigBuilder::new("false").build())
        .build();

    let err = pipeline(cfg, dir.path()).invoke(&["broken"]).await.unwrap_err();

    assert!(matches!(err, LitdagError::TaskFailed { ref task, .. } if task == "broken"));
}
