// src/dag/mod.rs

//! Task graph and plan resolution.
//!
//! - [`graph`] holds the validated directed acyclic graph of tasks, built once
//!   at startup from the built-in pipeline plus `[task.<name>]` entries.
//! - [`plan`] turns a set of requested targets into the ordered chain of
//!   tasks one invocation executes.

pub mod graph;
pub mod plan;

pub use graph::{TaskAction, TaskDef, TaskGraph, builtin_tasks};
pub use plan::resolve;

/// Names of the built-in tasks.
pub mod names {
    pub const CLEAN: &str = "clean";
    pub const GENERATE_EXAMPLES: &str = "generate-examples";
    pub const INTEGRATION: &str = "integration";
    pub const DEFAULT: &str = "default";
    pub const WATCH: &str = "watch";

    pub const ALL: [&str; 5] = [CLEAN, GENERATE_EXAMPLES, INTEGRATION, DEFAULT, WATCH];
}
