//! Formula syntax tree.
//!
//! [`Formula`] wraps the single top-level expression of a cell. A range shows
//! up in two roles: as the argument of `SUM`, `COUNT` or `IN` it is a plain
//! [`Range`] field, and as a bare term it becomes [`Expr::Spill`].

use chrono::NaiveDate;
use std::fmt;

use super::CellRef;

/// Largest number of cells a single range may span.
pub const MAX_RANGE_CELLS: usize = 1_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Gt,
    Lt,
}

impl BinaryOp {
    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
            BinaryOp::Gt => '>',
            BinaryOp::Lt => '<',
        }
    }

    pub fn from_symbol(c: char) -> Option<BinaryOp> {
        match c {
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Sub),
            '*' => Some(BinaryOp::Mul),
            '/' => Some(BinaryOp::Div),
            '>' => Some(BinaryOp::Gt),
            '<' => Some(BinaryOp::Lt),
            _ => None,
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, BinaryOp::Gt | BinaryOp::Lt)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An inclusive single-column span of cells, `start.row <= end.row`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Range {
    start: CellRef,
    end: CellRef,
}

impl Range {
    /// Build a range, rejecting multi-column and reversed spans.
    pub fn new(start: CellRef, end: CellRef) -> Result<Range, String> {
        if start.col != end.col {
            return Err(format!(
                "range {}:{} spans more than one column",
                start, end
            ));
        }
        if start.row > end.row {
            return Err(format!("range {}:{} ends before it starts", start, end));
        }
        if end.row - start.row >= MAX_RANGE_CELLS {
            return Err(format!(
                "range {}:{} exceeds {} cells",
                start, end, MAX_RANGE_CELLS
            ));
        }
        Ok(Range { start, end })
    }

    /// Member addresses, top to bottom.
    pub fn cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        (self.start.row..=self.end.row).map(move |row| CellRef::new(self.start.col, row))
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Cell(CellRef),
    Number(f64),
    Date(NaiveDate),
    /// Bare range: copies the span into the active cell's column.
    Spill(Range),
    Sum(Range),
    Count(Range),
    In {
        range: Range,
        needle: Box<Expr>,
    },
    If {
        condition: Box<Expr>,
        then: CellRef,
        otherwise: CellRef,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Visit this node and all of its children, parents first.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Expr)) {
        visit(self);
        match self {
            Expr::In { needle, .. } => needle.walk(visit),
            Expr::If { condition, .. } => condition.walk(visit),
            Expr::Binary { lhs, rhs, .. } => {
                lhs.walk(visit);
                rhs.walk(visit);
            }
            Expr::Cell(_)
            | Expr::Number(_)
            | Expr::Date(_)
            | Expr::Spill(_)
            | Expr::Sum(_)
            | Expr::Count(_) => {}
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Cell(cell) => write!(f, "{}", cell),
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Expr::Spill(range) => write!(f, "{}", range),
            Expr::Sum(range) => write!(f, "SUM({})", range),
            Expr::Count(range) => write!(f, "COUNT({})", range),
            Expr::In { range, needle } => write!(f, "IN({}, {})", range, needle),
            Expr::If {
                condition,
                then,
                otherwise,
            } => {
                // The condition is always printed with its own parentheses.
                let inner = condition.to_string();
                let inner = inner
                    .strip_prefix('(')
                    .and_then(|s| s.strip_suffix(')'))
                    .unwrap_or(&inner);
                write!(f, "IF({}) THEN {} ELSE {}", inner, then, otherwise)
            }
            Expr::Binary { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op, rhs),
        }
    }
}

/// A parsed formula: the start/term wrapper around one expression.
#[derive(Clone, Debug, PartialEq)]
pub struct Formula {
    pub root: Expr,
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "={}", self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(name: &str) -> CellRef {
        CellRef::from_str(name).unwrap()
    }

    #[test]
    fn test_range_rejects_multi_column() {
        assert!(Range::new(cell("A1"), cell("B3")).is_err());
    }

    #[test]
    fn test_range_rejects_reversed_rows() {
        assert!(Range::new(cell("A3"), cell("A1")).is_err());
    }

    #[test]
    fn test_range_cells_are_inclusive() {
        let range = Range::new(cell("C2"), cell("C4")).unwrap();
        let names: Vec<String> = range.cells().map(|c| c.to_string()).collect();
        assert_eq!(names, vec!["C2", "C3", "C4"]);
    }

    #[test]
    fn test_display_if() {
        let expr = Expr::If {
            condition: Box::new(Expr::binary(
                BinaryOp::Gt,
                Expr::Cell(cell("A1")),
                Expr::Number(10.0),
            )),
            then: cell("A3"),
            otherwise: cell("A1"),
        };
        assert_eq!(expr.to_string(), "IF(A1 > 10) THEN A3 ELSE A1");
    }
}
