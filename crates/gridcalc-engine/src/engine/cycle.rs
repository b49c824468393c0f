//! Circular dependency reporting.
//!
//! The scheduler only knows that some cells could not be ordered. This module
//! uses depth-first search over those cells to name one actual cycle
//! (e.g., A1 -> B1 -> C1 -> A1) for the error message.

use std::collections::HashSet;

use super::CellRef;
use super::graph::DependencyGraph;

/// Find a cycle reachable from `start`.
/// Returns Some(cycle_path) if a cycle is found, None otherwise. The path
/// starts and ends with the same cell.
pub fn detect_cycle(start: &CellRef, graph: &DependencyGraph) -> Option<Vec<CellRef>> {
    let mut visiting = HashSet::new();
    let mut done = HashSet::new();
    let mut path = Vec::new();

    if detect_cycle_dfs(start, graph, &mut visiting, &mut done, &mut path) {
        // Drop the lead-in before the repeated cell.
        let repeated = path.last()?.clone();
        let first = path.iter().position(|c| *c == repeated)?;
        Some(path.split_off(first))
    } else {
        None
    }
}

/// Find a cycle among `stuck` cells, trying them in the order given.
pub fn find_cycle(stuck: &[CellRef], graph: &DependencyGraph) -> Option<Vec<CellRef>> {
    stuck.iter().find_map(|cell| detect_cycle(cell, graph))
}

fn detect_cycle_dfs(
    current: &CellRef,
    graph: &DependencyGraph,
    visiting: &mut HashSet<CellRef>,
    done: &mut HashSet<CellRef>,
    path: &mut Vec<CellRef>,
) -> bool {
    if visiting.contains(current) {
        path.push(current.clone());
        return true;
    }
    if done.contains(current) {
        return false;
    }

    let deps = match graph.get(current) {
        Some(deps) => deps,
        None => return false,
    };

    visiting.insert(current.clone());
    path.push(current.clone());

    for dep in deps {
        if detect_cycle_dfs(dep, graph, visiting, done, path) {
            return true;
        }
    }

    path.pop();
    visiting.remove(current);
    done.insert(current.clone());
    false
}
