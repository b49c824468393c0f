//! Printable grids for evaluated sheets.
//!
//! Both renderers lay values out on the rectangle spanning every column from
//! the first to the last used one, and every row from 1 to the last used one.
//! Gaps are printed blank.

mod md;
mod text;

pub use md::write_markdown;
pub use text::write_text;

use gridcalc_engine::engine::{CellRef, Value, format_value};
use std::collections::BTreeMap;

use crate::error::{GridcalcError, Result};

/// Largest grid, counted in cells including gaps, that will be rendered.
pub const MAX_RENDER_CELLS: usize = 1_000_000;

/// Column range and last row of the grid.
pub(crate) struct GridBounds {
    pub min_col: usize,
    pub max_col: usize,
    pub max_row: usize,
}

///
/// Fails with [`GridcalcError::GridTooLarge`] when the rectangle holds more
/// than [`MAX_RENDER_CELLS`] cells.
pub(crate) fn find_grid_bounds(values: &BTreeMap<CellRef, Value>) -> Result<Option<GridBounds>> {
    let mut cells = values.keys();
    let Some(first) = cells.next() else {
        return Ok(None);
    };
    let mut bounds = GridBounds {
        min_col: first.col,
        max_col: first.col,
        max_row: first.row,
    };

    for cell_ref in cells {
        bounds.min_col = bounds.min_col.min(cell_ref.col);
        bounds.max_col = bounds.max_col.max(cell_ref.col);
        bounds.max_row = bounds.max_row.max(cell_ref.row);
    }

    let rows = bounds.max_row.saturating_add(1);
    let cols = (bounds.max_col - bounds.min_col).saturating_add(1);
    if rows.saturating_mul(cols) > MAX_RENDER_CELLS {
        return Err(GridcalcError::GridTooLarge {
            rows,
            cols,
            limit: MAX_RENDER_CELLS,
        });
    }

    Ok(Some(bounds))
}

/// Display text for a grid position; blank when nothing is there.
pub(crate) fn cell_display(values: &BTreeMap<CellRef, Value>, col: usize, row: usize) -> String {
    values
        .get(&CellRef::new(col, row))
        .map(format_value)
        .unwrap_or_default()
}
