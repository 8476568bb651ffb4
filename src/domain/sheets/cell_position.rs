use error_stack::{report, ResultExt};

use super::{
    a1_notation::{A1Notation, A1NotationParseError, FromA1Notation, ToA1Notation},
    column::{parse_col, Column},
    row::Row,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellPosition {
    pub col: Column,
    pub row: Row,
}

impl CellPosition {
    /// Builds a position from 1-based row and column numbers.
    pub fn from_row_col(row: u32, col: u32) -> Option<Self> {
        Some(CellPosition {
            row: Row::from_number(row)?,
            col: Column::from_number(col)?,
        })
    }
}

impl ToA1Notation for CellPosition {
    fn to_a1_notation(&self, sheet_name: Option<&str>) -> A1Notation {
        match sheet_name {
            Some(sheet_name) => A1Notation(format!("'{}'!{}{}", sheet_name, self.col, self.row)),
            None => A1Notation(format!("{}{}", self.col, self.row)),
        }
    }
}

impl FromA1Notation for CellPosition {
    type Err = A1NotationParseError;

    fn from_a1_notation(a1_notation: &A1Notation) -> error_stack::Result<Self, Self::Err> {
        let label = a1_notation.0.trim().replace('$', "");
        if label.is_empty() {
            return Err(report!(A1NotationParseError::Empty));
        }

        let split_at = label
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| report!(A1NotationParseError::RowParseError))
            .attach_printable_lazy(|| format!("No row number in cell label {label:?}"))?;
        let (letters, digits) = label.split_at(split_at);

        Ok(CellPosition {
            col: parse_col(letters)
                .change_context(A1NotationParseError::ColumnParseError)
                .attach_printable_lazy(|| format!("Invalid column in cell label {label:?}"))?,
            row: digits
                .parse::<Row>()
                .change_context(A1NotationParseError::RowParseError)
                .attach_printable_lazy(|| format!("Invalid row in cell label {label:?}"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_cell() {
        let pos = CellPosition::from_a1_notation(&"B12".into()).unwrap();
        assert_eq!(pos.col.number(), 2);
        assert_eq!(pos.row.number(), 12);
    }

    #[test]
    fn test_parse_absolute_cell() {
        let pos = CellPosition::from_a1_notation(&"$AA$3".into()).unwrap();
        assert_eq!(pos.col.number(), 27);
        assert_eq!(pos.row.index(), 2);
    }

    #[test]
    fn test_parse_invalid_cells() {
        assert!(CellPosition::from_a1_notation(&"".into()).is_err());
        assert!(CellPosition::from_a1_notation(&"B".into()).is_err());
        assert!(CellPosition::from_a1_notation(&"12".into()).is_err());
        assert!(CellPosition::from_a1_notation(&"B0".into()).is_err());
        assert!(CellPosition::from_a1_notation(&"B1C".into()).is_err());
    }

    #[test]
    fn test_to_a1_notation() {
        let pos = CellPosition::from_row_col(1, 4).unwrap();
        assert_eq!(pos.to_a1_notation(None).0, "D1");
        assert_eq!(pos.to_a1_notation(Some("Sheet1")).0, "'Sheet1'!D1");
    }

    #[test]
    fn test_from_row_col_rejects_zero() {
        assert_eq!(CellPosition::from_row_col(0, 1), None);
        assert_eq!(CellPosition::from_row_col(1, 0), None);
    }
}
