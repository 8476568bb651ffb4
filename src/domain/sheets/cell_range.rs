use serde_json::{json, Value};

use super::{
    a1_notation::{
        generic_a1_notation_split, A1Notation, A1NotationParseError, FromA1Notation, ToA1Notation,
    },
    cell_position::CellPosition,
    column::Column,
    row::Row,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub start: CellPosition,
    pub end: CellPosition,
    pub sheet_title: Option<String>,
}

impl CellRange {
    pub fn row_count(&self) -> u32 {
        self.end.row.index() - self.start.row.index() + 1
    }

    pub fn column_count(&self) -> u32 {
        self.end.col.index() - self.start.col.index() + 1
    }

    /// Grid range JSON object for Sheets batch requests: 0-based indices with
    /// exclusive ends.
    pub fn to_grid_range(&self, sheet_id: i32) -> Value {
        json!({
            "sheetId": sheet_id,
            "startRowIndex": self.start.row.index(),
            "endRowIndex": self.end.row.index() + 1,
            "startColumnIndex": self.start.col.index(),
            "endColumnIndex": self.end.col.index() + 1,
        })
    }
}

impl ToA1Notation for CellRange {
    fn to_a1_notation(&self, sheet_name: Option<&str>) -> A1Notation {
        let local = if self.start == self.end {
            self.start.to_a1_notation(None).0
        } else {
            format!(
                "{}:{}",
                self.start.to_a1_notation(None),
                self.end.to_a1_notation(None)
            )
        };

        match sheet_name {
            Some(sheet_name) => A1Notation(format!(
                "'{}'!{}",
                sheet_name.trim_start_matches('\'').trim_end_matches('\''),
                local
            )),
            None => A1Notation(local),
        }
    }
}

impl FromA1Notation for CellRange {
    type Err = A1NotationParseError;

    fn from_a1_notation(a1_notation: &A1Notation) -> error_stack::Result<Self, Self::Err> {
        let parts = generic_a1_notation_split(a1_notation);
        let first = CellPosition::from_a1_notation(&A1Notation(parts.start))?;
        let second = CellPosition::from_a1_notation(&A1Notation(parts.end))?;

        // Corners may be given in any order ("B2:A1").
        let start = CellPosition {
            row: Row::from_index(first.row.index().min(second.row.index())),
            col: Column::from_index(first.col.index().min(second.col.index())),
        };
        let end = CellPosition {
            row: Row::from_index(first.row.index().max(second.row.index())),
            col: Column::from_index(first.col.index().max(second.col.index())),
        };

        Ok(CellRange {
            start,
            end,
            sheet_title: parts.sheet_title,
        })
    }
}
