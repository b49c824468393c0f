//! Cell content and the working grid.
//!
//! - [`CellContent`] - what the caller put in a cell (blank, literal, alias or formula)
//! - [`Sheet`] - the input mapping from address to content
//! - [`CellState`] / [`Grid`] - the working copy a pass evaluates into

use std::collections::BTreeMap;

use super::Value;
use super::cell_ref::CellRef;

/// The content of an input cell.
#[derive(Clone, Debug, PartialEq)]
pub enum CellContent {
    Empty,
    Literal(String),
    /// Literal text that is itself a cell address. Reading the cell follows
    /// the alias to its target.
    Reference(CellRef),
    /// Formula text, without the leading `=`.
    Formula(String),
}

impl CellContent {
    /// Classify raw input text.
    /// - Empty string or whitespace -> Empty
    /// - Starts with '=' -> Formula (without the '=')
    /// - Canonical cell address ("A1", not "a1" or "A01") -> Reference
    /// - Otherwise -> Literal
    pub fn from_input(input: &str) -> CellContent {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return CellContent::Empty;
        }

        if let Some(formula) = trimmed.strip_prefix('=') {
            return CellContent::Formula(formula.to_string());
        }

        if let Some(target) = CellRef::from_str(trimmed) {
            if target.to_string() == trimmed {
                return CellContent::Reference(target);
            }
        }

        CellContent::Literal(trimmed.to_string())
    }

    /// Get the input text back.
    pub fn to_input_string(&self) -> String {
        match self {
            CellContent::Empty => String::new(),
            CellContent::Literal(s) => s.clone(),
            CellContent::Reference(target) => target.to_string(),
            CellContent::Formula(s) => format!("={}", s),
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, CellContent::Formula(_))
    }
}

/// Input sheet: address -> content.
pub type Sheet = BTreeMap<CellRef, CellContent>;

/// A cell in the working grid: still holding its input content, or settled.
#[derive(Clone, Debug, PartialEq)]
pub enum CellState {
    Content(CellContent),
    Value(Value),
}

/// Working grid for one evaluation pass.
pub type Grid = BTreeMap<CellRef, CellState>;

/// Copy a sheet into a fresh working grid.
pub fn working_grid(sheet: &Sheet) -> Grid {
    sheet
        .iter()
        .map(|(cell, content)| (cell.clone(), CellState::Content(content.clone())))
        .collect()
}
