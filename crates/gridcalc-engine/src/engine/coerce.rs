//! Final value coercion.
//!
//! Once a pass has settled every cell, numeric-looking text becomes a number
//! and everything else passes through unchanged.

use super::value::parse_number;
use super::{CellContent, CellState, Value};

/// Numeric-looking text -> number, anything else -> text.
pub fn coerce_text(text: &str) -> Value {
    match parse_number(text) {
        Some(n) => Value::Number(n),
        None => Value::Text(text.to_string()),
    }
}

/// The published value of a cell at the end of a pass.
///
/// Alias cells publish their own text; only formulas read through them.
pub fn coerce_state(state: CellState) -> Value {
    match state {
        CellState::Value(Value::Text(text)) => coerce_text(&text),
        CellState::Value(value) => value,
        CellState::Content(CellContent::Literal(text)) => coerce_text(&text),
        CellState::Content(content) => Value::Text(content.to_input_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::CellRef;

    #[test]
    fn test_numeric_text_becomes_number() {
        assert_eq!(coerce_text("5"), Value::Number(5.0));
        assert_eq!(coerce_text("2.1"), Value::Number(2.1));
        assert_eq!(coerce_text("hello"), Value::Text("hello".to_string()));
    }

    #[test]
    fn test_coerce_state_passes_through() {
        assert_eq!(
            coerce_state(CellState::Content(CellContent::Empty)),
            Value::Text(String::new())
        );
        assert_eq!(
            coerce_state(CellState::Content(CellContent::Reference(CellRef::new(0, 0)))),
            Value::Text("A1".to_string())
        );
        assert_eq!(
            coerce_state(CellState::Value(Value::Bool(true))),
            Value::Bool(true)
        );
        assert_eq!(
            coerce_state(CellState::Value(Value::Text("2024-01-05".into()))),
            Value::Text("2024-01-05".to_string())
        );
    }
}
