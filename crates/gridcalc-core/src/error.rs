//! Error types for Gridcalc core.

use std::path::PathBuf;

use gridcalc_engine::engine::{CellRef, EvalError, GraphError, ParseError};
use thiserror::Error;

/// Errors that can occur while building or evaluating a sheet.
#[derive(Error, Debug)]
pub enum GridcalcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid cell address: {0:?}")]
    InvalidAddress(String),

    #[error("Parse error in {cell} at position {}: {}", .source.position, .source.message)]
    Parse {
        cell: CellRef,
        #[source]
        source: ParseError,
    },

    #[error("Circular dependency detected: {}", format_cells(.cells))]
    CircularDependency { cells: Vec<CellRef> },

    #[error("{cell} cannot spill into {target}: target holds a formula")]
    SpillBlocked { cell: CellRef, target: CellRef },

    #[error("Error evaluating {cell}: {source}")]
    Eval {
        cell: CellRef,
        #[source]
        source: EvalError,
    },

    #[error("Grid of {rows} rows x {cols} columns is too large to render (max {limit} cells)")]
    GridTooLarge {
        rows: usize,
        cols: usize,
        limit: usize,
    },

    #[error("Config error in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

impl From<GraphError> for GridcalcError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Parse { cell, source } => GridcalcError::Parse { cell, source },
            GraphError::CircularDependency { cells } => GridcalcError::CircularDependency { cells },
            GraphError::SpillBlocked { cell, target } => {
                GridcalcError::SpillBlocked { cell, target }
            }
        }
    }
}

fn format_cells(cells: &[CellRef]) -> String {
    cells
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

pub type Result<T> = std::result::Result<T, GridcalcError>;
