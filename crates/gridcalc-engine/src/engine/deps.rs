//! Dependency extraction from parsed formulas.
//!
//! Collects every cell a formula reads:
//! - Bare cell references: `A1`, the `THEN`/`ELSE` cells of `IF`
//! - Every member of a range, whether it feeds `SUM`, `COUNT`, `IN` or a spill

use std::collections::BTreeSet;

use super::CellRef;
use super::ast::{Expr, Formula, Range};

/// All cells the formula reads.
pub fn extract_dependencies(formula: &Formula) -> BTreeSet<CellRef> {
    let mut deps = BTreeSet::new();

    formula.root.walk(&mut |expr| match expr {
        Expr::Cell(cell) => {
            deps.insert(cell.clone());
        }
        Expr::Spill(range) | Expr::Sum(range) | Expr::Count(range) | Expr::In { range, .. } => {
            deps.extend(range.cells());
        }
        Expr::If {
            then, otherwise, ..
        } => {
            deps.insert(then.clone());
            deps.insert(otherwise.clone());
        }
        Expr::Number(_) | Expr::Date(_) | Expr::Binary { .. } => {}
    });

    deps
}

/// Ranges used as bare spill terms, in evaluation order.
pub fn spill_ranges(formula: &Formula) -> Vec<&Range> {
    let mut ranges = Vec::new();
    formula.root.walk(&mut |expr| {
        if let Expr::Spill(range) = expr {
            ranges.push(range);
        }
    });
    ranges
}

/// Cells a formula in `active` writes through its spills.
///
/// Each source row maps to the same row of the active cell's column. The
/// active cell itself is not listed.
pub fn spill_targets(formula: &Formula, active: &CellRef) -> BTreeSet<CellRef> {
    spill_ranges(formula)
        .into_iter()
        .flat_map(|range| range.cells())
        .map(|source| source.in_column(active.col))
        .filter(|target| target != active)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::parse_formula;

    fn deps_of(text: &str) -> Vec<String> {
        let formula = parse_formula(text).unwrap();
        let mut names: Vec<String> = extract_dependencies(&formula)
            .into_iter()
            .map(|c| c.to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_extract_dependencies_literals_only() {
        assert!(deps_of("=10").is_empty());
        assert!(deps_of("=(10 + 20)").is_empty());
        assert!(deps_of("=2024-01-05").is_empty());
    }

    #[test]
    fn test_extract_dependencies_bare_cells() {
        assert_eq!(deps_of("=((A1 * B1) - C2)"), vec!["A1", "B1", "C2"]);
    }

    #[test]
    fn test_extract_dependencies_expands_ranges() {
        assert_eq!(deps_of("=SUM(A1:A3)"), vec!["A1", "A2", "A3"]);
        assert_eq!(deps_of("=COUNT(B2:B3)"), vec!["B2", "B3"]);
        assert_eq!(deps_of("=IN(A1:A2, C1)"), vec!["A1", "A2", "C1"]);
        assert_eq!(deps_of("=A1:A2"), vec!["A1", "A2"]);
    }

    #[test]
    fn test_extract_dependencies_if_branches() {
        assert_eq!(
            deps_of("=IF(A1 > 1) THEN B1 ELSE C1"),
            vec!["A1", "B1", "C1"]
        );
    }

    #[test]
    fn test_spill_targets_use_active_column() {
        let formula = parse_formula("=A1:A3").unwrap();
        let active = CellRef::from_str("B2").unwrap();
        let targets: Vec<String> = spill_targets(&formula, &active)
            .into_iter()
            .map(|c| c.to_string())
            .collect();
        assert_eq!(targets, vec!["B1", "B3"]);
    }

    #[test]
    fn test_no_spill_targets_without_bare_range() {
        let formula = parse_formula("=SUM(A1:A3)").unwrap();
        let active = CellRef::from_str("B2").unwrap();
        assert!(spill_targets(&formula, &active).is_empty());
    }
}
