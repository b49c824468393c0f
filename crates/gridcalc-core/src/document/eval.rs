//! Full-sheet evaluation pipeline.
//!
//! Graph -> order -> evaluate each formula on a working copy -> coerce.
//! The caller's sheet is only borrowed; a failed pass publishes nothing.

use log::debug;
use std::collections::BTreeMap;

use crate::error::{GridcalcError, Result};
use gridcalc_engine::engine::{
    CellRef, CellState, EvalConfig, Evaluator, Sheet, Value, build_graph, coerce_state,
    topological_order, working_grid,
};

/// Result of a successful pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// Every input cell plus any cell written by a spill.
    pub values: BTreeMap<CellRef, Value>,
    /// The order cells were settled in.
    pub order: Vec<CellRef>,
}

impl Evaluation {
    /// Look a value up by A1 address.
    pub fn get(&self, address: &str) -> Option<&Value> {
        let cell_ref = CellRef::from_str(address)?;
        self.values.get(&cell_ref)
    }

    /// Values keyed by A1 address text.
    pub fn by_address(&self) -> BTreeMap<String, Value> {
        self.values
            .iter()
            .map(|(cell, value)| (cell.to_string(), value.clone()))
            .collect()
    }
}

/// Evaluate every formula in the sheet.
pub fn evaluate(sheet: &Sheet, config: &EvalConfig) -> Result<Evaluation> {
    let built = build_graph(sheet, config)?;
    let order = topological_order(&built.graph)
        .map_err(|cells| GridcalcError::CircularDependency { cells })?;

    let mut grid = working_grid(sheet);
    for cell in &order {
        let Some(formula) = built.formulas.get(cell) else {
            continue;
        };

        let evaluated = Evaluator::new(&grid, cell, config)
            .evaluate(formula)
            .map_err(|source| GridcalcError::Eval {
                cell: cell.clone(),
                source,
            })?;

        debug!("{} = {}", cell, evaluated.value);
        grid.insert(cell.clone(), CellState::Value(evaluated.value));
        for (target, value) in evaluated.writes {
            grid.insert(target, CellState::Value(value));
        }
    }

    let values = grid
        .into_iter()
        .map(|(cell, state)| (cell, coerce_state(state)))
        .collect();

    Ok(Evaluation { values, order })
}
