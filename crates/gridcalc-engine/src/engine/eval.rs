//! Formula evaluation.
//!
//! An [`Evaluator`] is bound to one active cell and reads from the working
//! grid without mutating it. Spills come back as a list of writes alongside
//! the value; the caller applies them once the whole formula has succeeded.

use log::debug;

use super::ast::{BinaryOp, Expr, Formula, Range};
use super::value::parse_number;
use super::{CellContent, CellRef, CellState, DivisionPolicy, EvalConfig, EvalError, Grid, Value};

/// Result of evaluating one formula.
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluated {
    pub value: Value,
    /// Spill writes, in the order they were produced.
    pub writes: Vec<(CellRef, Value)>,
}

pub struct Evaluator<'a> {
    grid: &'a Grid,
    active: &'a CellRef,
    config: &'a EvalConfig,
    writes: Vec<(CellRef, Value)>,
}

impl<'a> Evaluator<'a> {
    pub fn new(grid: &'a Grid, active: &'a CellRef, config: &'a EvalConfig) -> Self {
        Evaluator {
            grid,
            active,
            config,
            writes: Vec::new(),
        }
    }

    pub fn evaluate(mut self, formula: &Formula) -> Result<Evaluated, EvalError> {
        let value = self.eval(&formula.root)?;
        Ok(Evaluated {
            value,
            writes: self.writes,
        })
    }

    fn eval(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Cell(cell) => Ok(Value::Number(self.resolve(cell)?)),
            Expr::Number(n) => Ok(Value::Number(*n)),
            Expr::Date(d) => Ok(Value::Text(d.format("%Y-%m-%d").to_string())),
            Expr::Spill(range) => self.spill(range),
            Expr::Sum(range) => Ok(Value::Number(self.resolve_range(range)?.iter().sum())),
            Expr::Count(range) => {
                let positive = self
                    .resolve_range(range)?
                    .into_iter()
                    .filter(|n| *n > 0.0)
                    .count();
                Ok(Value::Number(positive as f64))
            }
            Expr::In { range, needle } => {
                let members = self.resolve_range(range)?;
                let needle = self.eval(needle)?;
                let found = needle
                    .as_number()
                    .is_some_and(|n| members.iter().any(|m| *m == n));
                Ok(Value::Bool(found))
            }
            Expr::If {
                condition,
                then,
                otherwise,
            } => {
                let condition = self.eval(condition)?;
                // Both branches are read so that a broken branch fails the
                // formula no matter which way the condition goes.
                let then = self.resolve(then)?;
                let otherwise = self.resolve(otherwise)?;
                Ok(Value::Number(if condition.is_truthy() {
                    then
                } else {
                    otherwise
                }))
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                apply_binary(*op, &lhs, &rhs, self.config)
            }
        }
    }

    fn resolve(&self, cell: &CellRef) -> Result<f64, EvalError> {
        resolve_number(self.grid, cell, self.config)
    }

    fn resolve_range(&self, range: &Range) -> Result<Vec<f64>, EvalError> {
        range.cells().map(|cell| self.resolve(&cell)).collect()
    }

    /// Copy the range into the active cell's column, row for row.
    ///
    /// Yields the value landing on the active row, or the first value of the
    /// span when the active row is outside it.
    fn spill(&mut self, range: &Range) -> Result<Value, EvalError> {
        let values = self.resolve_range(range)?;
        let col = self.active.col;
        let mut own = None;

        for (source, n) in range.cells().zip(values.iter().copied()) {
            let target = source.in_column(col);
            if target == *self.active {
                own = Some(n);
            } else {
                self.writes.push((target, Value::Number(n)));
            }
        }

        let value = own.or_else(|| values.first().copied()).unwrap_or(0.0);
        debug!(
            "{} spills {} into column {}",
            self.active,
            range,
            CellRef::col_to_letters(col)
        );
        Ok(Value::Number(value))
    }
}

/// Read a cell as a number, following alias cells.
///
/// Each alias followed is one hop; more than `config.max_depth` hops fails with
/// [`EvalError::DepthExceeded`]. Blank cells read as 0.
pub fn resolve_number(grid: &Grid, cell: &CellRef, config: &EvalConfig) -> Result<f64, EvalError> {
    let mut current = cell;
    let mut hops = 0usize;

    loop {
        let state = grid
            .get(current)
            .ok_or_else(|| EvalError::UnresolvedReference {
                reference: current.clone(),
            })?;

        match state {
            CellState::Content(CellContent::Reference(target)) => {
                hops += 1;
                if hops > config.max_depth {
                    return Err(EvalError::DepthExceeded {
                        reference: cell.clone(),
                        limit: config.max_depth,
                    });
                }
                current = target;
            }
            CellState::Content(CellContent::Empty) => return Ok(0.0),
            CellState::Content(CellContent::Literal(text)) | CellState::Value(Value::Text(text)) => {
                return parse_number(text).ok_or_else(|| not_numeric(current, text));
            }
            CellState::Content(CellContent::Formula(_)) => {
                return Err(EvalError::PendingFormula {
                    reference: current.clone(),
                });
            }
            CellState::Value(value) => {
                return value
                    .as_number()
                    .ok_or_else(|| not_numeric(current, &value.to_string()));
            }
        }
    }
}

fn not_numeric(reference: &CellRef, text: &str) -> EvalError {
    EvalError::NotNumeric {
        reference: reference.clone(),
        text: text.to_string(),
    }
}

/// Apply a binary operator.
///
/// Arithmetic needs two numbers. `>` and `<` compare two numbers, or two
/// texts lexically (ISO dates therefore compare by date).
pub fn apply_binary(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
    config: &EvalConfig,
) -> Result<Value, EvalError> {
    let mismatch = || EvalError::TypeMismatch {
        op: op.to_string(),
        lhs: lhs.type_name().to_string(),
        rhs: rhs.type_name().to_string(),
    };

    if op.is_comparison() {
        if let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) {
            return Ok(Value::Bool(match op {
                BinaryOp::Gt => a > b,
                _ => a < b,
            }));
        }
        if let (Value::Text(a), Value::Text(b)) = (lhs, rhs) {
            return Ok(Value::Bool(match op {
                BinaryOp::Gt => a > b,
                _ => a < b,
            }));
        }
        return Err(mismatch());
    }

    let (Some(a), Some(b)) = (lhs.as_number(), rhs.as_number()) else {
        return Err(mismatch());
    };

    let n = match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => {
            if b == 0.0 && config.division == DivisionPolicy::Error {
                return Err(EvalError::DivisionByZero);
            }
            a / b
        }
        BinaryOp::Gt | BinaryOp::Lt => return Err(mismatch()),
    };
    Ok(Value::Number(n))
}
