// src/dag/graph.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::ConfigFile;
use crate::dag::names;
use crate::engine::TaskName;
use crate::errors::{LitdagError, Result};

/// What running a task actually does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    Clean,
    GenerateExamples,
    Integration,
    /// No body of its own; exists only to pull in its dependencies.
    Alias,
    /// Start the filesystem watcher once the chain has finished.
    Watch,
    /// `[task.<name>]` from the config file.
    Shell(String),
}

/// A node in the task graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDef {
    pub name: TaskName,
    /// Direct prerequisites.
    pub after: Vec<TaskName>,
    pub action: TaskAction,
}

impl TaskDef {
    fn builtin(name: &str, after: &[&str], action: TaskAction) -> Self {
        Self {
            name: name.to_string(),
            after: after.iter().map(|s| s.to_string()).collect(),
            action,
        }
    }
}

/// The fixed pipeline: clean -> generate-examples -> integration -> default
/// -> watch.
pub fn builtin_tasks() -> Vec<TaskDef> {
    vec![
        TaskDef::builtin(names::CLEAN, &[], TaskAction::Clean),
        TaskDef::builtin(
            names::GENERATE_EXAMPLES,
            &[names::CLEAN],
            TaskAction::GenerateExamples,
        ),
        TaskDef::builtin(
            names::INTEGRATION,
            &[names::GENERATE_EXAMPLES],
            TaskAction::Integration,
        ),
        TaskDef::builtin(names::DEFAULT, &[names::INTEGRATION], TaskAction::Alias),
        TaskDef::builtin(names::WATCH, &[names::DEFAULT], TaskAction::Watch),
    ]
}

/// Internal node structure: the definition plus its direct dependents.
#[derive(Debug, Clone)]
struct GraphNode {
    def: TaskDef,
    dependents: Vec<TaskName>,
}

/// Validated, immutable task DAG keyed by task name.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    nodes: BTreeMap<TaskName, GraphNode>,
}

impl TaskGraph {
    /// Built-in tasks plus every `[task.<name>]` in the config.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let custom = cfg.tasks().iter().map(|(name, task)| TaskDef {
            name: name.clone(),
            after: task.after.clone(),
            action: TaskAction::Shell(task.cmd.clone()),
        });

        Self::from_tasks(builtin_tasks().into_iter().chain(custom))
    }

    /// Build and validate a graph from arbitrary task definitions.
    ///
    /// Fails on duplicate names, unknown or self dependencies, and cycles.
    pub fn from_tasks(tasks: impl IntoIterator<Item = TaskDef>) -> Result<Self> {
        let mut nodes: BTreeMap<TaskName, GraphNode> = BTreeMap::new();

        for def in tasks {
            if nodes.contains_key(&def.name) {
                return Err(LitdagError::ConfigError(format!(
                    "task '{}' is defined more than once",
                    def.name
                )));
            }
            nodes.insert(
                def.name.clone(),
                GraphNode {
                    def,
                    dependents: Vec::new(),
                },
            );
        }

        validate_dependencies(&nodes)?;
        validate_acyclic(&nodes)?;

        // Populate dependents now that every reference is known to resolve.
        let edges: Vec<(TaskName, TaskName)> = nodes
            .values()
            .flat_map(|n| {
                n.def
                    .after
                    .iter()
                    .map(|dep| (dep.clone(), n.def.name.clone()))
            })
            .collect();
        for (dep, task) in edges {
            if let Some(dep_node) = nodes.get_mut(&dep) {
                dep_node.dependents.push(task);
            }
        }

        Ok(Self { nodes })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TaskDef> {
        self.nodes.get(name).map(|n| &n.def)
    }

    /// All task names, sorted.
    pub fn tasks(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    /// Immediate dependencies of a task (its `after` list).
    pub fn dependencies_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.def.after.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a task.
    pub fn dependents_of(&self, name: &str) -> &[TaskName] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }
}

fn validate_dependencies(nodes: &BTreeMap<TaskName, GraphNode>) -> Result<()> {
    for (name, node) in nodes.iter() {
        for dep in node.def.after.iter() {
            if dep == name {
                return Err(LitdagError::ConfigError(format!(
                    "task '{}' cannot depend on itself in `after`",
                    name
                )));
            }
            if !nodes.contains_key(dep) {
                return Err(LitdagError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
        }
    }
    Ok(())
}

fn validate_acyclic(nodes: &BTreeMap<TaskName, GraphNode>) -> Result<()> {
    // Edge direction: dep -> task.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in nodes.keys() {
        graph.add_node(name.as_str());
    }

    for (name, node) in nodes.iter() {
        for dep in node.def.after.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => Err(LitdagError::DagCycle(format!(
            "cycle detected in task graph involving task '{}'",
            cycle.node_id()
        ))),
    }
}
