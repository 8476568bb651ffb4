use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A row or column number as received from a caller. Agent frameworks often
/// hand numbers over as strings, so coercion happens at call time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Integer(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordinateError {
    #[error("invalid literal for an integer coordinate: {0:?}")]
    NotAnInteger(String),
    #[error("coordinate must be a positive 1-based number, got {0}")]
    OutOfRange(i64),
}

impl Coordinate {
    /// Coerces to an integer: floats are truncated, strings are trimmed and
    /// parsed as base-10 integers.
    pub fn to_integer(&self) -> Result<i64, CoordinateError> {
        match self {
            Coordinate::Integer(value) => Ok(*value),
            Coordinate::Float(value) if value.is_finite() => Ok(value.trunc() as i64),
            Coordinate::Float(value) => Err(CoordinateError::NotAnInteger(value.to_string())),
            Coordinate::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| CoordinateError::NotAnInteger(text.clone())),
        }
    }

    /// Coerces to a 1-based spreadsheet number (row or column).
    pub fn to_number(&self) -> Result<u32, CoordinateError> {
        let value = self.to_integer()?;
        u32::try_from(value)
            .ok()
            .filter(|number| *number >= 1)
            .ok_or(CoordinateError::OutOfRange(value))
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Coordinate::Integer(1)
    }
}

impl From<i64> for Coordinate {
    fn from(value: i64) -> Self {
        Coordinate::Integer(value)
    }
}

impl From<i32> for Coordinate {
    fn from(value: i32) -> Self {
        Coordinate::Integer(value.into())
    }
}

impl From<u32> for Coordinate {
    fn from(value: u32) -> Self {
        Coordinate::Integer(value.into())
    }
}

impl From<f64> for Coordinate {
    fn from(value: f64) -> Self {
        Coordinate::Float(value)
    }
}

impl From<&str> for Coordinate {
    fn from(value: &str) -> Self {
        Coordinate::Text(value.to_owned())
    }
}

impl From<String> for Coordinate {
    fn from(value: String) -> Self {
        Coordinate::Text(value)
    }
}
