//! Dependency graph construction.
//!
//! Parses every formula in the sheet, records which cells it reads and
//! rejects formulas that read themselves. Indirect cycles are left to the
//! scheduler.

use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::ast::Formula;
use super::deps::{extract_dependencies, spill_targets};
use super::parser::parse_formula;
use super::{CellContent, CellRef, EvalConfig, GraphError, Sheet};

/// Cell -> cells it directly reads. Every sheet cell has an entry.
pub type DependencyGraph = BTreeMap<CellRef, BTreeSet<CellRef>>;

/// Output of [`build_graph`]: the adjacency mapping plus the parsed formulas,
/// so nothing has to be parsed twice.
#[derive(Clone, Debug, Default)]
pub struct BuiltGraph {
    pub graph: DependencyGraph,
    pub formulas: BTreeMap<CellRef, Formula>,
}

/// Build the dependency graph for a sheet.
///
/// Besides the cells a formula names, its dependency set includes:
/// - the targets of any alias (`Reference`) cell it reads, followed up to
///   `config.max_depth` hops, so a formula reached through an alias settles first;
/// - the cells whose spills write into any cell it reads.
pub fn build_graph(sheet: &Sheet, config: &EvalConfig) -> Result<BuiltGraph, GraphError> {
    let mut built = BuiltGraph::default();

    for (cell, content) in sheet {
        if !content.is_formula() {
            built.graph.insert(cell.clone(), BTreeSet::new());
            continue;
        }

        // Error positions count from the `=` of the cell input.
        let input = content.to_input_string();
        let formula = parse_formula(&input).map_err(|source| GraphError::Parse {
            cell: cell.clone(),
            source,
        })?;

        let mut deps = extract_dependencies(&formula);
        let direct: Vec<CellRef> = deps.iter().cloned().collect();
        for dep in &direct {
            deps.extend(alias_closure(sheet, dep, config.max_depth));
        }

        if deps.contains(cell) {
            return Err(GraphError::CircularDependency {
                cells: vec![cell.clone()],
            });
        }

        built.graph.insert(cell.clone(), deps);
        built.formulas.insert(cell.clone(), formula);
    }

    link_spills(sheet, &mut built)?;

    debug!(
        "dependency graph: {} cells, {} formulas",
        built.graph.len(),
        built.formulas.len()
    );
    Ok(built)
}

/// Alias targets reachable from `start` through `Reference` cells.
fn alias_closure(sheet: &Sheet, start: &CellRef, max_depth: usize) -> Vec<CellRef> {
    let mut reached = Vec::new();
    let mut seen = HashSet::new();
    let mut current = start;

    while let Some(CellContent::Reference(target)) = sheet.get(current) {
        if !seen.insert(target.clone()) {
            // Alias loop; evaluation reports it once the hop limit is hit.
            break;
        }
        if reached.len() >= max_depth {
            warn!(
                "alias chain from {} is longer than {} hops; stopping dependency walk",
                start, max_depth
            );
            break;
        }
        reached.push(target.clone());
        current = target;
    }

    reached
}

/// Make readers of spill targets depend on the spilling cell.
fn link_spills(sheet: &Sheet, built: &mut BuiltGraph) -> Result<(), GraphError> {
    let mut owners: BTreeMap<CellRef, BTreeSet<CellRef>> = BTreeMap::new();

    for (cell, formula) in &built.formulas {
        for target in spill_targets(formula, cell) {
            if matches!(sheet.get(&target), Some(CellContent::Formula(_))) {
                return Err(GraphError::SpillBlocked {
                    cell: cell.clone(),
                    target,
                });
            }
            owners.entry(target).or_default().insert(cell.clone());
        }
    }

    if owners.is_empty() {
        return Ok(());
    }

    for (cell, deps) in built.graph.iter_mut() {
        let extra: Vec<CellRef> = deps
            .iter()
            .filter_map(|dep| owners.get(dep))
            .flatten()
            .filter(|owner| *owner != cell)
            .cloned()
            .collect();
        deps.extend(extra);
    }

    Ok(())
}
