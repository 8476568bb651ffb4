use google_sheets4::api::{BatchClearValuesRequest, ValueRange};
use serde_json::Value;

pub trait ValueRangeFactory {
    fn from_rows(rows: Vec<Vec<Value>>) -> Self;
}

impl ValueRangeFactory for ValueRange {
    fn from_rows(rows: Vec<Vec<Value>>) -> Self {
        ValueRange {
            major_dimension: Some("ROWS".to_string()),
            range: None,
            values: Some(rows),
        }
    }
}

pub fn batch_clear_request(ranges: Vec<String>) -> BatchClearValuesRequest {
    BatchClearValuesRequest {
        ranges: Some(ranges),
    }
}

/// Normalizes a caller-supplied value into the row-major grid the values API
/// expects: a scalar fills one cell, a flat array fills one row and a nested
/// array is sent as-is.
pub fn to_rows(value: Value) -> Vec<Vec<Value>> {
    match value {
        Value::Array(items) if items.iter().all(Value::is_array) && !items.is_empty() => items
            .into_iter()
            .map(|row| match row {
                Value::Array(cells) => cells,
                other => vec![other],
            })
            .collect(),
        Value::Array(items) => vec![items],
        scalar => vec![vec![scalar]],
    }
}
