//! Output formatters

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// JSON formatter
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format a value as pretty JSON
    pub fn format<T: Serialize + ?Sized>(value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }
}

/// Plain text formatter
pub struct PlainFormatter;

impl PlainFormatter {
    /// Format a value as indented `key: value` lines
    pub fn format<T: Serialize + ?Sized>(value: &T) -> Result<String> {
        let json = serde_json::to_value(value)?;
        Ok(Self::format_value(&json, 0))
    }

    fn format_value(value: &Value, indent: usize) -> String {
        let indent_str = "  ".repeat(indent);
        match value {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            Value::Array(arr) => arr
                .iter()
                .map(|v| format!("{}- {}", indent_str, Self::format_value(v, indent + 1).trim_start()))
                .collect::<Vec<_>>()
                .join("\n"),
            Value::Object(obj) => obj
                .iter()
                .map(|(k, v)| match v {
                    Value::Array(_) | Value::Object(_) => {
                        format!("{}{}:\n{}", indent_str, k, Self::format_value(v, indent + 1))
                    }
                    _ => format!("{}{}: {}", indent_str, k, Self::format_value(v, indent + 1)),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Outcome {
        unit: String,
        entries_written: usize,
    }

    #[test]
    fn test_json_formatter() {
        let outcome = Outcome {
            unit: "2kki/bp/all".to_string(),
            entries_written: 42,
        };
        let json = JsonFormatter::format(&outcome).unwrap();
        assert!(json.contains("\"entries_written\": 42"));
    }

    #[test]
    fn test_plain_formatter() {
        let outcome = Outcome {
            unit: "2kki/bp/all".to_string(),
            entries_written: 42,
        };
        let plain = PlainFormatter::format(&outcome).unwrap();
        let mut lines: Vec<_> = plain.lines().collect();
        lines.sort();
        assert_eq!(lines, vec!["entries_written: 42", "unit: 2kki/bp/all"]);
    }

    #[test]
    fn test_plain_formatter_nests_lists() {
        let plain = PlainFormatter::format(&serde_json::json!({ "games": ["2kki", "yume"] })).unwrap();
        assert_eq!(plain, "games:\n  - 2kki\n  - yume");
    }
}
