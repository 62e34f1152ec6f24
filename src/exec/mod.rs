// src/exec/mod.rs

//! Process execution and chain dispatch.
//!
//! - [`shell`] runs a single command through the platform shell with
//!   `tokio::process::Command`, streaming its output.
//! - [`backend`] provides the [`ExecutorBackend`] trait the watch runtime
//!   dispatches chains to, and [`PipelineExecutor`], the production backend
//!   that runs them on a [`crate::tasks::Pipeline`]. Tests substitute a fake.

pub mod backend;
pub mod shell;

pub use backend::{ExecutorBackend, PipelineExecutor};
pub use shell::run_shell;
