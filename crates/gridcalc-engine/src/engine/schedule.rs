//! Deterministic evaluation order.
//!
//! Kahn's algorithm over the dependency graph. Whenever several cells are
//! ready, the one with the lexically smallest address ("A10" before "A2")
//! goes first, so the order never depends on how the caller built the sheet.

use log::debug;
use std::collections::{BTreeMap, HashMap};

use super::CellRef;
use super::cycle::find_cycle;
use super::graph::DependencyGraph;

/// Order every cell of the graph after the cells it depends on.
///
/// Dependencies on addresses that are not in the graph are ignored here; the
/// evaluator reports them when it reads them. On failure returns the cells of
/// one cycle (first cell repeated at the end), or all unordered cells if no
/// single cycle could be isolated.
pub fn topological_order(graph: &DependencyGraph) -> Result<Vec<CellRef>, Vec<CellRef>> {
    let mut pending: HashMap<&CellRef, usize> = HashMap::with_capacity(graph.len());
    let mut dependents: HashMap<&CellRef, Vec<&CellRef>> = HashMap::new();

    for (cell, deps) in graph {
        let mut count = 0;
        for dep in deps {
            if graph.contains_key(dep) {
                count += 1;
                dependents.entry(dep).or_default().push(cell);
            }
        }
        pending.insert(cell, count);
    }

    let mut ready: BTreeMap<String, &CellRef> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(cell, _)| (cell.address(), *cell))
        .collect();

    let mut order = Vec::with_capacity(graph.len());
    while let Some((_, cell)) = ready.pop_first() {
        order.push(cell.clone());
        if let Some(users) = dependents.get(cell) {
            for user in users {
                if let Some(count) = pending.get_mut(user) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(user.address(), *user);
                    }
                }
            }
        }
    }

    if order.len() == graph.len() {
        debug!(
            "evaluation order: {}",
            order
                .iter()
                .map(|c| c.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
        return Ok(order);
    }

    let mut stuck: Vec<CellRef> = pending
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(cell, _)| cell.clone())
        .collect();
    stuck.sort_by_key(|c| c.address());

    Err(find_cycle(&stuck, graph).unwrap_or(stuck))
}
