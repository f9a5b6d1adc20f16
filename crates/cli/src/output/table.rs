//! Table formatting utilities

use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, *};

/// Table formatter
pub struct TableFormatter;

impl TableFormatter {
    /// Create a new table with default styling
    pub fn styled() -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    /// Create a simple table with headers and rows
    pub fn simple(headers: Vec<&str>, rows: Vec<Vec<String>>) -> String {
        let mut table = Self::styled();
        table.set_header(headers);

        for row in rows {
            table.add_row(row);
        }

        table.to_string()
    }

    /// Create a key-value table
    pub fn key_value(items: Vec<(&str, String)>) -> String {
        let mut table = Self::styled();

        for (key, value) in items {
            table.add_row(vec![key.to_string(), value]);
        }

        table.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_table() {
        let rows = vec![
            vec!["1".to_string(), "Urotsuki".to_string(), "420".to_string()],
            vec!["2".to_string(), "Madotsuki".to_string(), "390".to_string()],
        ];
        let table = TableFormatter::simple(vec!["#", "Player", "Value"], rows);
        assert!(table.contains("Urotsuki"));
        assert!(table.contains("Player"));
    }

    #[test]
    fn test_key_value_table() {
        let table = TableFormatter::key_value(vec![("Entries", "63".to_string())]);
        assert!(table.contains("Entries"));
        assert!(table.contains("63"));
    }
}
