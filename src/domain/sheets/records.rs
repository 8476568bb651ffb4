use std::collections::HashSet;

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// One data row keyed by the header row, in column order.
pub type Record = Map<String, Value>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordsError {
    #[error("the header row in the worksheet is not unique: {0:?}")]
    DuplicateHeader(String),
}

pub trait CellText {
    fn cell_text(&self) -> String;
}

impl CellText for Value {
    fn cell_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Turns numeric-looking text into a JSON number; everything else stays text.
pub fn numericise(value: &str) -> Value {
    if value.is_empty() {
        return Value::String(String::new());
    }
    if let Ok(int) = value.parse::<i64>() {
        return Value::Number(int.into());
    }
    if let Some(number) = value.parse::<f64>().ok().and_then(Number::from_f64) {
        return Value::Number(number);
    }
    Value::String(value.to_owned())
}

/// Builds records from a worksheet dump whose first row is the header.
/// Short rows are padded with empty strings; cells past the header are dropped.
pub fn records_from_values(values: &[Vec<Value>]) -> Result<Vec<Record>, RecordsError> {
    let Some((header, rows)) = values.split_first() else {
        return Ok(Vec::new());
    };

    let keys: Vec<String> = header.iter().map(CellText::cell_text).collect();
    let mut seen = HashSet::with_capacity(keys.len());
    if let Some(duplicate) = keys.iter().find(|key| !seen.insert(key.as_str())) {
        return Err(RecordsError::DuplicateHeader(duplicate.clone()));
    }

    Ok(rows
        .iter()
        .map(|row| {
            keys.iter()
                .enumerate()
                .map(|(index, key)| {
                    let text = row.get(index).map(CellText::cell_text).unwrap_or_default();
                    (key.clone(), numericise(&text))
                })
                .collect()
        })
        .collect())
}

/// Row-major search for the first cell whose text equals `query`. Returns the
/// 1-based (row, column).
pub fn find_first(values: &[Vec<Value>], query: &str) -> Option<(u32, u32)> {
    values.iter().enumerate().find_map(|(row_index, row)| {
        row.iter()
            .position(|cell| cell.cell_text() == query)
            .map(|col_index| (row_index as u32 + 1, col_index as u32 + 1))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<Value>> {
        rows.iter()
            .map(|row| row.iter().map(|cell| json!(cell)).collect())
            .collect()
    }

    #[test]
    fn test_numericise() {
        assert_eq!(numericise("12"), json!(12));
        assert_eq!(numericise("-3"), json!(-3));
        assert_eq!(numericise("1.5"), json!(1.5));
        assert_eq!(numericise("abc"), json!("abc"));
        assert_eq!(numericise(""), json!(""));
        assert_eq!(numericise("NaN"), json!("NaN"));
    }

    #[test]
    fn test_records_keep_header_order() {
        let values = grid(&[&["Name", "Age", "City"], &["Alice", "30", "Paris"]]);
        let records = records_from_values(&values).unwrap();
        assert_eq!(records.len(), 1);
        let keys: Vec<&String> = records[0].keys().collect();
        assert_eq!(keys, vec!["Name", "Age", "City"]);
        assert_eq!(records[0]["Age"], json!(30));
    }

    #[test]
    fn test_records_pad_and_truncate_rows() {
        let values = grid(&[&["A", "B"], &["1"], &["x", "y", "z"]]);
        let records = records_from_values(&values).unwrap();
        assert_eq!(records[0]["B"], json!(""));
        assert_eq!(records[1].len(), 2);
        assert_eq!(records[1]["B"], json!("y"));
    }

    #[test]
    fn test_records_empty_sheet() {
        assert!(records_from_values(&[]).unwrap().is_empty());
        assert!(records_from_values(&grid(&[&["Only", "Header"]]))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_records_duplicate_header() {
        let values = grid(&[&["A", "B", "A"], &["1", "2", "3"]]);
        assert_eq!(
            records_from_values(&values),
            Err(RecordsError::DuplicateHeader("A".to_string()))
        );
    }

    #[test]
    fn test_find_first_is_row_major() {
        let values = grid(&[&["a", "b"], &["c", "target"], &["target", "d"]]);
        assert_eq!(find_first(&values, "target"), Some((2, 2)));
        assert_eq!(find_first(&values, "missing"), None);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(json!("x").cell_text(), "x");
        assert_eq!(json!(3).cell_text(), "3");
        assert_eq!(Value::Null.cell_text(), "");
    }
}
