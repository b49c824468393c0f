//! Spreadsheet engine API.
//!
//! This module provides the formula language and the scheduling pieces:
//!
//! - [`CellRef`] - Cell addresses (A1 notation <-> row/col indices)
//! - [`CellContent`], [`Sheet`], [`CellState`], [`Grid`] - Input and working cells
//! - [`parse_formula`] - Formula text -> [`Formula`] AST
//! - [`extract_dependencies`] - Cells a formula reads
//! - [`build_graph`] - Dependency graph with self-reference check
//! - [`topological_order`] - Deterministic evaluation order
//! - [`Evaluator`] - Evaluate one formula for an active cell
//! - [`coerce_state`] - Final value coercion
//! - [`format_value`] - Format values for display

pub mod ast;
mod cell;
mod cell_ref;
mod coerce;
mod config;
mod cycle;
mod deps;
mod error;
mod eval;
mod format;
mod graph;
mod parser;
mod schedule;
mod value;

pub use ast::{BinaryOp, Expr, Formula, Range};
pub use cell::{CellContent, CellState, Grid, Sheet, working_grid};
pub use cell_ref::CellRef;
pub use coerce::{coerce_state, coerce_text};
pub use config::{DEFAULT_MAX_DEPTH, DivisionPolicy, EvalConfig};
pub use cycle::{detect_cycle, find_cycle};
pub use deps::{extract_dependencies, spill_ranges, spill_targets};
pub use error::{EvalError, GraphError, ParseError};
pub use eval::{Evaluated, Evaluator, apply_binary, resolve_number};
pub use format::{format_number, format_value};
pub use graph::{BuiltGraph, DependencyGraph, build_graph};
pub use parser::parse_formula;
pub use schedule::topological_order;
pub use value::{Value, parse_number};
