#![allow(dead_code)]

use litdag::config::{ConfigFile, RawConfigFile, TaskConfig, WatchBindingConfig};
use litdag::types::{ErrorPolicy, TriggerWhileRunningBehaviour};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the built-in defaults; every setter overrides one key.
#[derive(Default)]
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tutorials(mut self, glob: &str) -> Self {
        self.config.paths.tutorials = glob.to_string();
        self
    }

    /// Set both the output directory and the matching `examples` glob.
    pub fn examples_dir(mut self, dir: &str, extension: &str) -> Self {
        self.config.paths.examples_dir = dir.to_string();
        self.config.paths.examples = format!("{dir}/*.{extension}");
        self.config.generate.extension = extension.to_string();
        self
    }

    pub fn deps(mut self, glob: &str) -> Self {
        self.config.paths.deps = glob.to_string();
        self
    }

    pub fn languages(mut self, langs: &[&str]) -> Self {
        self.config.generate.languages = langs.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn on_error(mut self, policy: ErrorPolicy) -> Self {
        self.config.generate.on_error = policy;
        self
    }

    pub fn integration_cmd(mut self, cmd: &str) -> Self {
        self.config.integration.cmd = Some(cmd.to_string());
        self
    }

    pub fn behaviour(mut self, behaviour: TriggerWhileRunningBehaviour) -> Self {
        self.config.runtime.triggered_while_running_behaviour = behaviour;
        self
    }

    pub fn queue_length(mut self, len: usize) -> Self {
        self.config.runtime.queue_length = len;
        self
    }

    /// Add a `[[watch]]` binding. The first call replaces the defaults.
    pub fn watch(mut self, glob: &str, tasks: &[&str], use_hash: bool) -> Self {
        self.config
            .watch
            .get_or_insert_with(Vec::new)
            .push(WatchBindingConfig {
                glob: glob.to_string(),
                tasks: tasks.iter().map(|s| s.to_string()).collect(),
                use_hash,
            });
        self
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.config.task.insert(name.to_string(), task);
        self
    }

    /// The raw file, for tests that exercise validation themselves.
    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

/// Builder for a custom `[task.<name>]` entry.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            task: TaskConfig {
                cmd: cmd.to_string(),
                after: vec![],
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
