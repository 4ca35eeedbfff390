use serde_json::Value;

use crate::model::display_value;

/// Collapse ranges like `"35-45"` or `"35g-45g"` to their average, `"40.0"`.
///
/// Numbers come back as their string form and empty input as an empty string.
/// Anything that does not average cleanly is passed through unchanged.
pub fn average_range(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => average_text(s),
        Value::Null | Value::Bool(false) => String::new(),
        other => display_value(other),
    }
}

fn average_text(text: &str) -> String {
    if text.is_empty() || !text.contains('-') {
        return text.to_string();
    }

    let mut parts = text.split('-');
    let low = parts.next().and_then(parse_numeric);
    let high = parts.next().and_then(parse_numeric);

    match (low, high) {
        (Some(low), Some(high)) => format!("{:.1}", (low + high) / 2.0),
        _ => text.to_string(),
    }
}

/// Keep only the digits and decimal points of `part` and parse the result.
fn parse_numeric(part: &str) -> Option<f64> {
    let digits: String = part
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_range() {
        assert_eq!(average_range(&json!("35-45")), "40.0");
    }

    #[test]
    fn test_range_with_units() {
        assert_eq!(average_range(&json!("20g-25g")), "22.5");
        assert_eq!(average_range(&json!("1.5 - 2 g")), "1.8");
    }

    #[test]
    fn test_exact_ties_round_to_even() {
        assert_eq!(average_range(&json!("1-1.5")), "1.2");
        assert_eq!(average_range(&json!("0-0.5")), "0.2");
        assert_eq!(average_range(&json!("2-2.5")), "2.2");
    }

    #[test]
    fn test_single_value_unchanged() {
        assert_eq!(average_range(&json!("100")), "100");
        assert_eq!(average_range(&json!("abc")), "abc");
    }

    #[test]
    fn test_empty_values() {
        assert_eq!(average_range(&json!("")), "");
        assert_eq!(average_range(&json!(null)), "");
    }

    #[test]
    fn test_numbers_become_strings() {
        assert_eq!(average_range(&json!(120)), "120");
        assert_eq!(average_range(&json!(2.5)), "2.5");
    }

    #[test]
    fn test_unparseable_range_passes_through() {
        assert_eq!(average_range(&json!("low-high")), "low-high");
        assert_eq!(average_range(&json!("-5")), "-5");
        assert_eq!(average_range(&json!("1.2.3-4")), "1.2.3-4");
    }
}
