use std::{fmt::Formatter, num::ParseIntError, str::FromStr};

use thiserror::Error;

/// A spreadsheet row, stored as a zero-based index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Row {
    index: u32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RowParseError {
    #[error("Row is not a number: {0}")]
    NotANumber(#[from] ParseIntError),
    #[error("Row numbers start at 1")]
    Zero,
}

impl Row {
    pub fn from_index(index: u32) -> Self {
        Row { index }
    }

    /// Builds a row from its 1-based number, `None` for row `0`.
    pub fn from_number(number: u32) -> Option<Self> {
        number.checked_sub(1).map(Row::from_index)
    }

    /// Returns the row number as a 1-based index.
    /// # Examples
    /// ```
    /// use sheets_action::domain::sheets::row::Row;
    /// let row = Row::from_index(0);
    /// assert_eq!(row.number(), 1);
    /// let row = Row::from_index(25);
    /// assert_eq!(row.number(), 26);
    /// ```
    pub fn number(&self) -> u32 {
        self.index.saturating_add(1)
    }

    pub fn index(&self) -> u32 {
        self.index
    }
}

impl std::fmt::Display for Row {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl std::fmt::Debug for Row {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row(index: {}, row: {})", self.index(), self.number())
    }
}

impl FromStr for Row {
    type Err = RowParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = s.parse::<u32>()?;
        Row::from_number(number).ok_or(RowParseError::Zero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_display() {
        assert_eq!(Row::from_index(0).to_string(), "1");
    }

    #[test]
    fn test_row_debug() {
        assert_eq!(format!("{:?}", Row::from_index(4)), "Row(index: 4, row: 5)");
    }

    #[test]
    fn test_row_from_number() {
        assert_eq!(Row::from_number(5), Some(Row::from_index(4)));
        assert_eq!(Row::from_number(0), None);
    }

    #[test]
    fn test_row_from_str() {
        let row: Row = "5".parse().unwrap();
        assert_eq!(row.index(), 4);
    }

    #[test]
    fn test_row_from_str_error() {
        assert!(matches!("abc".parse::<Row>(), Err(RowParseError::NotANumber(_))));
        assert_eq!("0".parse::<Row>(), Err(RowParseError::Zero));
    }
}
