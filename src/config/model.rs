// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::dag::names;
use crate::types::{ErrorPolicy, TriggerWhileRunningBehaviour};

/// Top-level configuration as read from `Litdag.toml`.
///
/// ```toml
/// [paths]
/// tutorials = "docs/tutorials/*.md"
/// examples = "examples/*.py"
///
/// [generate]
/// on_error = "continue"
///
/// [[watch]]
/// glob = "docs/tutorials/*.md"
/// tasks = ["integration"]
///
/// [task.lint]
/// cmd = "ruff check examples"
/// after = ["generate-examples"]
/// ```
///
/// Every section is optional; an empty file (or no file at all) yields the
/// built-in pipeline layout.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub paths: PathsSection,

    #[serde(default)]
    pub generate: GenerateSection,

    #[serde(default)]
    pub integration: IntegrationSection,

    #[serde(default)]
    pub runtime: RuntimeSection,

    /// `[[watch]]` bindings. `None` means "use the default bindings".
    #[serde(default)]
    pub watch: Option<Vec<WatchBindingConfig>>,

    /// Extra shell tasks from `[task.<name>]`.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// Validated configuration.
///
/// Can only be obtained through `TryFrom<RawConfigFile>` (see
/// `config::validate`), so holders may assume globs compile, custom tasks
/// form a DAG and numeric limits are sane.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub paths: PathsSection,
    pub generate: GenerateSection,
    pub integration: IntegrationSection,
    pub runtime: RuntimeSection,
    pub watch: Vec<WatchBindingConfig>,
    pub task: BTreeMap<String, TaskConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        let watch = raw
            .watch
            .unwrap_or_else(|| default_watch_bindings(&raw.paths));
        Self {
            paths: raw.paths,
            generate: raw.generate,
            integration: raw.integration,
            runtime: raw.runtime,
            watch,
            task: raw.task,
        }
    }

    pub fn tasks(&self) -> &BTreeMap<String, TaskConfig> {
        &self.task
    }

    pub fn watch_bindings(&self) -> &[WatchBindingConfig] {
        &self.watch
    }
}

/// `[paths]` section. Globs are relative to the project root.
#[derive(Debug, Clone, Deserialize)]
pub struct PathsSection {
    #[serde(default = "default_tutorials")]
    pub tutorials: String,

    #[serde(default = "default_examples_dir")]
    pub examples_dir: String,

    #[serde(default = "default_examples")]
    pub examples: String,

    /// Glob for third-party dependencies; only used by the default `dist`
    /// watch binding.
    #[serde(default = "default_deps")]
    pub deps: String,
}

fn default_tutorials() -> String {
    "docs/tutorials/*.md".to_string()
}

fn default_examples_dir() -> String {
    "examples".to_string()
}

fn default_examples() -> String {
    "examples/*.py".to_string()
}

fn default_deps() -> String {
    "node_modules/**/*".to_string()
}

impl Default for PathsSection {
    fn default() -> Self {
        Self {
            tutorials: default_tutorials(),
            examples_dir: default_examples_dir(),
            examples: default_examples(),
            deps: default_deps(),
        }
    }
}

/// `[generate]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateSection {
    /// Extension appended to outputs whose tutorial name carries none
    /// (`intro.md` -> `intro.py`, but `intro.sh.md` -> `intro.sh`).
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Fenced-block languages to keep. Empty keeps every block.
    #[serde(default)]
    pub languages: Vec<String>,

    /// Whether four-space indented blocks count as code.
    #[serde(default = "default_indented_blocks")]
    pub indented_blocks: bool,

    #[serde(default)]
    pub on_error: ErrorPolicy,
}

fn default_extension() -> String {
    "py".to_string()
}

fn default_indented_blocks() -> bool {
    true
}

impl Default for GenerateSection {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            languages: Vec::new(),
            indented_blocks: default_indented_blocks(),
            on_error: ErrorPolicy::default(),
        }
    }
}

/// `[integration]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct IntegrationSection {
    /// Shell command run against the generated examples. The example paths
    /// are passed as positional arguments (`$@` under `sh`).
    #[serde(default)]
    pub cmd: Option<String>,
}

/// `[runtime]` section: how watch-mode triggers are scheduled.
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeSection {
    #[serde(default)]
    pub triggered_while_running_behaviour: TriggerWhileRunningBehaviour,

    /// Maximum number of queued runs to remember. The default of 1 coalesces
    /// every trigger seen during a run into a single follow-up run.
    #[serde(default = "default_queue_length")]
    pub queue_length: usize,
}

fn default_queue_length() -> usize {
    1
}

impl Default for RuntimeSection {
    fn default() -> Self {
        Self {
            triggered_while_running_behaviour: TriggerWhileRunningBehaviour::default(),
            queue_length: default_queue_length(),
        }
    }
}

/// One `[[watch]]` entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WatchBindingConfig {
    pub glob: String,
    pub tasks: Vec<String>,

    /// Only trigger when the changed file's content actually differs from
    /// the last time it was seen.
    #[serde(default)]
    pub use_hash: bool,
}

/// The bindings used when the config file has no `[[watch]]` entries.
///
/// The `dist` task is not part of the built-in graph; the binding is kept so
/// the missing task is reported when a dependency file changes.
pub fn default_watch_bindings(paths: &PathsSection) -> Vec<WatchBindingConfig> {
    vec![
        WatchBindingConfig {
            glob: paths.tutorials.clone(),
            tasks: vec![names::INTEGRATION.to_string()],
            use_hash: false,
        },
        WatchBindingConfig {
            glob: paths.deps.clone(),
            tasks: vec!["dist".to_string()],
            use_hash: false,
        },
    ]
}

/// `[task.<name>]` section: an extra shell task.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Command run through the platform shell from the project root.
    pub cmd: String,

    /// Tasks (built-in or custom) that must run first.
    #[serde(default)]
    pub after: Vec<String>,
}
