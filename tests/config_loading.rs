mod common;

use std::io::Write;

use common::{ConfigFileBuilder, TaskConfigBuilder};
use litdag::config::{ConfigFile, load_and_validate, load_or_default};
use litdag::errors::LitdagError;
use litdag::types::{ErrorPolicy, TriggerWhileRunningBehaviour};
use tempfile::NamedTempFile;

fn config_from(toml: &str) -> litdag::errors::Result<ConfigFile> {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{toml}").unwrap();
    load_and_validate(file.path())
}

#[test]
fn empty_file_gives_defaults() {
    let cfg = config_from("").unwrap();

    assert_eq!(cfg.paths.tutorials, "docs/tutorials/*.md");
    assert_eq!(cfg.paths.examples_dir, "examples");
    assert_eq!(cfg.paths.examples, "examples/*.py");
    assert_eq!(cfg.generate.extension, "py");
    assert_eq!(cfg.generate.on_error, ErrorPolicy::Continue);
    assert_eq!(
        cfg.runtime.triggered_while_running_behaviour,
        TriggerWhileRunningBehaviour::Queue
    );
    assert_eq!(cfg.runtime.queue_length, 1);

    let bindings = cfg.watch_bindings();
    assert_eq!(bindings.len(), 2);
    assert_eq!(bindings[0].glob, "docs/tutorials/*.md");
    assert_eq!(bindings[0].tasks, vec!["integration"]);
    assert_eq!(bindings[1].glob, "node_modules/**/*");
    assert_eq!(bindings[1].tasks, vec!["dist"]);
}

#[test]
fn explicit_sections_override_defaults() {
    let cfg = config_from(
        r#"
[paths]
tutorials = "./guide/*.md"

[generate]
on_error = "abort"
languages = ["python"]

[runtime]
triggered_while_running_behaviour = "drop"
queue_length = 3

[[watch]]
glob = "guide/*.md"
tasks = ["default"]
use_hash = true

[task.lint]
cmd = "ruff check examples"
after = ["generate-examples"]
"#,
    )
    .unwrap();

    assert_eq!(cfg.paths.tutorials, "./guide/*.md");
    assert_eq!(cfg.generate.on_error, ErrorPolicy::Abort);
    assert_eq!(cfg.generate.languages, vec!["python"]);
    assert_eq!(
        cfg.runtime.triggered_while_running_behaviour,
        TriggerWhileRunningBehaviour::Drop
    );
    assert_eq!(cfg.runtime.queue_length, 3);
    assert_eq!(cfg.watch_bindings().len(), 1);
    assert!(cfg.watch_bindings()[0].use_hash);
    assert_eq!(cfg.tasks()["lint"].after, vec!["generate-examples"]);
}

#[test]
fn invalid_toml_is_a_toml_error() {
    let err = config_from("[paths\ntutorials = 1").unwrap_err();
    assert!(matches!(err, LitdagError::TomlError(_)));
}

#[test]
fn unknown_behaviour_is_rejected_at_parse_time() {
    let err = config_from("[runtime]\ntriggered_while_running_behaviour = \"restart\"\n").unwrap_err();
    assert!(matches!(err, LitdagError::TomlError(_)));
}

#[test]
fn zero_queue_length_is_rejected() {
    let err = config_from("[runtime]\nqueue_length = 0\n").unwrap_err();
    assert!(matches!(err, LitdagError::ConfigError(ref msg) if msg.contains("queue_length")));
}

#[test]
fn invalid_glob_is_rejected() {
    let err = config_from("[paths]\ntutorials = \"docs/[*.md\"\n").unwrap_err();
    assert!(matches!(err, LitdagError::ConfigError(ref msg) if msg.contains("paths.tutorials")));
}

#[test]
fn dotted_extension_is_rejected() {
    let err = config_from("[generate]\nextension = \".py\"\n").unwrap_err();
    assert!(matches!(err, LitdagError::ConfigError(_)));
}

#[test]
fn shadowing_builtin_task_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_task("clean", TaskConfigBuilder::new("rm -rf build").build())
        .raw();
    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(matches!(err, LitdagError::ConfigError(ref msg) if msg.contains("built-in")));
}

#[test]
fn custom_task_cycle_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_task("a", TaskConfigBuilder::new("true").after("b").build())
        .with_task("b", TaskConfigBuilder::new("true").after("a").build())
        .raw();
    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(matches!(err, LitdagError::DagCycle(_)));
}

#[test]
fn custom_task_with_unknown_dependency_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_task("lint", TaskConfigBuilder::new("true").after("nope").build())
        .raw();
    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(matches!(err, LitdagError::ConfigError(ref msg) if msg.contains("nope")));
}

#[test]
fn watch_binding_without_tasks_is_rejected() {
    let raw = ConfigFileBuilder::new().watch("docs/*.md", &[], false).raw();
    let err = ConfigFile::try_from(raw).unwrap_err();
    assert!(matches!(err, LitdagError::ConfigError(_)));
}

#[test]
fn watch_binding_with_unknown_task_is_accepted() {
    let cfg = ConfigFileBuilder::new()
        .watch("node_modules/**/*", &["dist"], false)
        .build();
    assert_eq!(cfg.watch_bindings()[0].tasks, vec!["dist"]);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_and_validate(dir.path().join("Litdag.toml")).unwrap_err();
    assert!(matches!(err, LitdagError::IoError(_)));
}

#[test]
fn missing_default_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_or_default(dir.path().join("Litdag.toml")).unwrap();
    assert_eq!(cfg.paths.examples, "examples/*.py");
}

#[test]
fn examples_glob_must_cover_examples_dir() {
    let err = config_from("[paths]\nexamples_dir = \"generated\"\n").unwrap_err();
    assert!(matches!(err, LitdagError::ConfigError(ref msg) if msg.contains("generated/example.py")));
}

#[test]
fn examples_glob_must_cover_extension() {
    let err = config_from("[generate]\nextension = \"sh\"\n").unwrap_err();
    assert!(matches!(err, LitdagError::ConfigError(ref msg) if msg.contains("paths")));

    let cfg = config_from(
        "[paths]\nexamples_dir = \"./scripts/\"\nexamples = \"scripts/*.sh\"\n\n[generate]\nextension = \"sh\"\n",
    )
    .unwrap();
    assert_eq!(cfg.generate.extension, "sh");
}

#[test]
fn demo_config_is_valid() {
    let manifest_dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    let cfg = load_and_validate(manifest_dir.join("demos/Litdag.toml")).unwrap();

    assert_eq!(cfg.generate.languages, vec!["python"]);
    assert!(cfg.integration.cmd.is_some());
    assert!(cfg.tasks().contains_key("lint"));
    assert_eq!(cfg.watch_bindings().len(), 2);
    assert!(cfg.watch_bindings()[0].use_hash);
}
