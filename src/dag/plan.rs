// src/dag/plan.rs

//! Resolve requested targets into an execution chain.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::dag::graph::TaskGraph;
use crate::engine::TaskName;
use crate::errors::{LitdagError, Result};

/// Resolve `targets` into the ordered list of tasks to execute.
///
/// - Every target and all of its transitive prerequisites are included.
/// - Each task appears exactly once, so diamonds collapse to one execution.
/// - Prerequisites always come before their dependents; among tasks that are
///   ready at the same time the alphabetically smaller name goes first, which
///   keeps plans deterministic.
///
/// Unknown targets fail with [`LitdagError::TaskNotFound`] before anything
/// runs. Cycles cannot occur here since [`TaskGraph`] rejects them on
/// construction.
pub fn resolve<S: AsRef<str>>(graph: &TaskGraph, targets: &[S]) -> Result<Vec<TaskName>> {
    let mut included: BTreeSet<&str> = BTreeSet::new();
    let mut stack: Vec<&str> = Vec::new();

    for target in targets {
        let target = target.as_ref();
        let def = graph
            .get(target)
            .ok_or_else(|| LitdagError::TaskNotFound(target.to_string()))?;
        stack.push(def.name.as_str());
    }

    while let Some(name) = stack.pop() {
        if !included.insert(name) {
            continue;
        }
        for dep in graph.dependencies_of(name) {
            stack.push(dep.as_str());
        }
    }

    // Kahn's algorithm restricted to the included subgraph.
    let mut in_degree: BTreeMap<&str, usize> = included
        .iter()
        .map(|name| (*name, graph.dependencies_of(name).len()))
        .collect();

    let mut ready: BTreeSet<&str> = in_degree
        .iter()
        .filter(|(_, deg)| **deg == 0)
        .map(|(name, _)| *name)
        .collect();

    let mut order = Vec::with_capacity(included.len());

    while let Some(name) = ready.pop_first() {
        order.push(name.to_string());

        for dependent in graph.dependents_of(name) {
            if let Some(deg) = in_degree.get_mut(dependent.as_str()) {
                *deg -= 1;
                if *deg == 0 {
                    ready.insert(dependent.as_str());
                }
            }
        }
    }

    if order.len() != included.len() {
        return Err(LitdagError::DagCycle(format!(
            "could not order tasks {:?}",
            included
                .iter()
                .filter(|name| !order.iter().any(|o| o.as_str() == **name))
                .collect::<Vec<_>>()
        )));
    }

    debug!(?order, "resolved task plan");
    Ok(order)
}
