//! Plain text table rendering.
//!
//! Columns are separated by two spaces. Columns holding only numbers are
//! right-aligned, everything else is left-aligned. Trailing spaces are trimmed.

use gridcalc_engine::engine::{CellRef, Value};
use std::collections::BTreeMap;
use std::io::Write;

use super::{cell_display, find_grid_bounds};
use crate::error::Result;

const SEPARATOR: &str = "  ";

struct Column {
    header: String,
    cells: Vec<String>,
    width: usize,
    right_align: bool,
}

impl Column {
    fn pad(&self, text: &str) -> String {
        if self.right_align {
            format!("{:>width$}", text, width = self.width)
        } else {
            format!("{:<width$}", text, width = self.width)
        }
    }
}

/// Write the evaluated grid as an aligned text table.
pub fn write_text<W: Write>(w: &mut W, values: &BTreeMap<CellRef, Value>) -> Result<()> {
    let Some(bounds) = find_grid_bounds(values)? else {
        return Ok(());
    };

    let rows = bounds.max_row + 1;
    let mut columns = vec![build_column(
        String::new(),
        (1..=rows).map(|r| r.to_string()).collect(),
        true,
    )];

    for col in bounds.min_col..=bounds.max_col {
        let numeric = (0..rows).all(|row| match values.get(&CellRef::new(col, row)) {
            Some(Value::Number(_)) | None => true,
            Some(Value::Text(s)) => s.is_empty(),
            Some(Value::Bool(_)) => false,
        });
        let cells = (0..rows).map(|row| cell_display(values, col, row)).collect();
        columns.push(build_column(CellRef::col_to_letters(col), cells, numeric));
    }

    write_line(w, columns.iter().map(|c| c.pad(&c.header)))?;
    write_line(w, columns.iter().map(|c| "-".repeat(c.width)))?;
    for row in 0..rows {
        write_line(w, columns.iter().map(|c| c.pad(&c.cells[row])))?;
    }

    Ok(())
}

fn build_column(header: String, cells: Vec<String>, right_align: bool) -> Column {
    let width = cells
        .iter()
        .map(|c| c.chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
        .max(1);
    Column {
        header,
        cells,
        width,
        right_align,
    }
}

fn write_line<W: Write>(w: &mut W, fields: impl Iterator<Item = String>) -> std::io::Result<()> {
    let line = fields.collect::<Vec<_>>().join(SEPARATOR);
    writeln!(w, "{}", line.trim_end())
}

#[cfg(test)]
mod tests {
    use super::write_text;
    use gridcalc_engine::engine::{CellRef, Value};
    use std::collections::BTreeMap;

    fn render(cells: &[(&str, Value)]) -> String {
        let values: BTreeMap<CellRef, Value> = cells
            .iter()
            .map(|(addr, v)| (CellRef::from_str(addr).unwrap(), v.clone()))
            .collect();
        let mut out = Vec::new();
        write_text(&mut out, &values).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_aligns_numbers_right_and_text_left() {
        let actual = render(&[
            ("A1", Value::Number(1.0)),
            ("A2", Value::Number(94.0)),
            ("B1", Value::Text("x".into())),
        ]);
        assert_eq!(actual, "    A  B\n-  --  -\n1   1  x\n2  94\n");
    }

    #[test]
    fn text_fills_missing_rows_and_columns() {
        let actual = render(&[
            ("A2", Value::Number(5.0)),
            ("C1", Value::Bool(true)),
        ]);
        assert_eq!(
            actual,
            "   A  B  C\n-  -  -  ----\n1        TRUE\n2  5\n"
        );
    }

    #[test]
    fn text_empty_sheet_prints_nothing() {
        assert_eq!(render(&[]), "");
    }
}
