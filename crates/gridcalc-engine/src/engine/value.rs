//! Computed cell values.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// A settled cell value.
///
/// Booleans only come out of comparisons and `IN`; when read back through a
/// cell reference they count as 1 and 0.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Value {
    /// Numeric view of the value, if it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(s) => parse_number(s),
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::Text(s) => !s.is_empty(),
        }
    }

    /// Short type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Bool(_) => "boolean",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&super::format::format_value(self))
    }
}

/// Parse numeric-looking text ("5", "-2.1", "1e3").
///
/// Words that `f64::from_str` also accepts ("inf", "NaN") are not numbers here.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if !number_re().is_match(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn number_re() -> &'static Regex {
    static NUMBER_RE: OnceLock<Regex> = OnceLock::new();
    NUMBER_RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
            .expect("number regex must compile")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_accepts_plain_numbers() {
        assert_eq!(parse_number("5"), Some(5.0));
        assert_eq!(parse_number(" 2.1 "), Some(2.1));
        assert_eq!(parse_number("-3"), Some(-3.0));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number(".5"), Some(0.5));
    }

    #[test]
    fn test_parse_number_rejects_words() {
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("A1"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("2024-01-05"), None);
    }

    #[test]
    fn test_bool_reads_as_one_or_zero() {
        assert_eq!(Value::Bool(true).as_number(), Some(1.0));
        assert_eq!(Value::Bool(false).as_number(), Some(0.0));
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::Number(-1.0).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(!Value::Text(String::new()).is_truthy());
        assert!(Value::Text("x".into()).is_truthy());
    }
}
