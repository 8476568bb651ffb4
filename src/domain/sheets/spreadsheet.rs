use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorksheetHandle {
    pub id: i32,
    pub title: String,
    pub index: i32,
    pub row_count: i32,
    pub column_count: i32,
}

/// Metadata of an opened spreadsheet. Fetched fresh on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadsheetHandle {
    pub id: String,
    pub title: String,
    pub url: String,
    pub worksheets: Vec<WorksheetHandle>,
}

impl SpreadsheetHandle {
    pub fn worksheet(&self, title: &str) -> Option<&WorksheetHandle> {
        self.worksheets.iter().find(|sheet| sheet.title == title)
    }
}
