//! Markdown table rendering

use gridcalc_engine::engine::{CellRef, Value};
use std::collections::BTreeMap;
use std::io::Write;

use super::{cell_display, find_grid_bounds};
use crate::error::Result;

/// Write the evaluated grid as a markdown table.
pub fn write_markdown<W: Write>(w: &mut W, values: &BTreeMap<CellRef, Value>) -> Result<()> {
    let bounds = find_grid_bounds(values)?;

    writeln!(w, "# Sheet")?;
    writeln!(w)?;

    let Some(bounds) = bounds else {
        writeln!(w, "*Empty spreadsheet*")?;
        return Ok(());
    };

    // Header with column letters
    write!(w, "|   |")?;
    for col in bounds.min_col..=bounds.max_col {
        write!(w, " {} |", CellRef::col_to_letters(col))?;
    }
    writeln!(w)?;

    write!(w, "|---|")?;
    for _ in bounds.min_col..=bounds.max_col {
        write!(w, "---|")?;
    }
    writeln!(w)?;

    for row in 0..=bounds.max_row {
        write!(w, "| {} |", row + 1)?; // 1-based row numbers
        for col in bounds.min_col..=bounds.max_col {
            let display = cell_display(values, col, row);
            write!(w, " {} |", escape_markdown(&display))?;
        }
        writeln!(w)?;
    }

    Ok(())
}

/// Escape special markdown characters in cell content
fn escape_markdown(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}

#[cfg(test)]
mod tests {
    use super::write_markdown;
    use gridcalc_engine::engine::{CellRef, Value};
    use std::collections::BTreeMap;

    fn render(cells: &[(&str, Value)]) -> String {
        let values: BTreeMap<CellRef, Value> = cells
            .iter()
            .map(|(addr, v)| (CellRef::from_str(addr).unwrap(), v.clone()))
            .collect();
        let mut out = Vec::new();
        write_markdown(&mut out, &values).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn markdown_fills_gaps() {
        let actual = render(&[
            ("A1", Value::Number(1.0)),
            ("A2", Value::Number(94.0)),
            ("C1", Value::Text("a|b".into())),
        ]);
        let expected = "# Sheet\n\n\
|   | A | B | C |\n\
|---|---|---|---|\n\
| 1 | 1 |  | a\\|b |\n\
| 2 | 94 |  |  |\n";
        assert_eq!(actual, expected);
    }

    #[test]
    fn markdown_empty_sheet() {
        assert_eq!(render(&[]), "# Sheet\n\n*Empty spreadsheet*\n");
    }
}
