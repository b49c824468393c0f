use super::Value;

/// Format a value for display.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Number(n) => format_number(*n),
        Value::Text(s) => s.clone(),
        Value::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
    }
}

/// Format a number for display.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "#NAN!".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "#INF!" } else { "-#INF!" }.to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(5.0), "5");
        assert_eq!(format_number(1.05), "1.05");
        assert_eq!(format_number(f64::INFINITY), "#INF!");
        assert_eq!(format_number(f64::NEG_INFINITY), "-#INF!");
        assert_eq!(format_number(f64::NAN), "#NAN!");
    }

    #[test]
    fn test_format_bool() {
        assert_eq!(format_value(&Value::Bool(true)), "TRUE");
    }
}
