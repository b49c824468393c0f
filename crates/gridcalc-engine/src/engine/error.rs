//! Engine error types.

use thiserror::Error;

use super::CellRef;

/// A syntax error in formula text.
///
/// `position` is the byte offset of the offending token, counted from the
/// start of the cell input with surrounding whitespace removed (the leading
/// `=` included).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("parse error at position {position}: {message}")]
pub struct ParseError {
    pub position: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        ParseError {
            position,
            message: message.into(),
        }
    }
}

/// Errors raised while evaluating a single formula.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("reference chain starting at {reference} exceeds {limit} hops")]
    DepthExceeded { reference: CellRef, limit: usize },

    #[error("division by zero")]
    DivisionByZero,

    #[error("reference to empty address {reference}")]
    UnresolvedReference { reference: CellRef },

    #[error("{reference} holds non-numeric value {text:?}")]
    NotNumeric { reference: CellRef, text: String },

    #[error("{reference} is a formula that has not been evaluated yet")]
    PendingFormula { reference: CellRef },

    #[error("operator {op} cannot combine {lhs} and {rhs}")]
    TypeMismatch {
        op: String,
        lhs: String,
        rhs: String,
    },
}

/// Errors raised while building the dependency graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("{cell}: {source}")]
    Parse {
        cell: CellRef,
        #[source]
        source: ParseError,
    },

    #[error("circular dependency detected: {}", format_cycle(.cells))]
    CircularDependency { cells: Vec<CellRef> },

    #[error("{cell} cannot spill into {target}: target holds a formula")]
    SpillBlocked { cell: CellRef, target: CellRef },
}

pub(crate) fn format_cycle(cells: &[CellRef]) -> String {
    cells
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
