use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::instrument;

use super::{
    client::{SheetTarget, SpreadsheetClient, DEFAULT_COLS, DEFAULT_ROWS},
    operation_error::into_payload,
};
use crate::domain::sheets::{
    coordinate::Coordinate,
    options::{MergeType, Recipients, ValueInputOption},
};

/// Spreadsheet locator and worksheet title shared by most actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_or_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worksheet_title: Option<String>,
}

impl TargetArgs {
    pub fn target(&self) -> SheetTarget<'_> {
        SheetTarget {
            key_or_url: self.key_or_url.as_deref(),
            worksheet_title: self.worksheet_title.as_deref(),
        }
    }
}

/// One call against the spreadsheet, as sent by the agent:
///
/// ```json
/// {"action": "update_cell_by_coordinates", "row": 1, "col": 4, "value": "Bingo!!"}
/// {"action": "format_cell", "worksheet_title": "Sheet4", "cell": "A8", "format_options": {"textFormat": {"bold": true}}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SheetsAction {
    OpenSpreadsheet {
        #[serde(default)]
        key_or_url: Option<String>,
    },
    #[serde(alias = "get_all_records")]
    OpenWorksheet {
        #[serde(flatten)]
        target: TargetArgs,
    },
    CreateSpreadsheet {
        title: String,
    },
    CreateWorksheet {
        title: String,
        #[serde(default)]
        key_or_url: Option<String>,
        #[serde(default = "default_rows")]
        rows: u32,
        #[serde(default = "default_cols")]
        cols: u32,
    },
    DeleteWorksheet {
        #[serde(flatten)]
        target: TargetArgs,
    },
    ShareSpreadsheet {
        #[serde(alias = "email_addresses")]
        emails: Recipients,
        #[serde(default)]
        key_or_url: Option<String>,
        #[serde(default, alias = "perm_type")]
        permissions: String,
        #[serde(default)]
        role: String,
    },
    UpdateCell {
        cell: String,
        value: Value,
        #[serde(flatten)]
        target: TargetArgs,
    },
    UpdateCellByCoordinates {
        row: Coordinate,
        col: Coordinate,
        #[serde(default = "empty_value")]
        value: Value,
        #[serde(flatten)]
        target: TargetArgs,
    },
    FormatCell {
        #[serde(default)]
        cell: String,
        #[serde(default)]
        format_options: Value,
        #[serde(flatten)]
        target: TargetArgs,
    },
    MergeCells {
        cells: String,
        #[serde(default)]
        merge_type: MergeType,
        #[serde(flatten)]
        target: TargetArgs,
    },
    InsertRows {
        values: Vec<Vec<Value>>,
        #[serde(default)]
        row_index: Coordinate,
        #[serde(default)]
        value_input_option: ValueInputOption,
        #[serde(default)]
        inherit_from_before: bool,
        #[serde(flatten)]
        target: TargetArgs,
    },
    BatchClear {
        #[serde(alias = "range")]
        ranges: Vec<String>,
        #[serde(flatten)]
        target: TargetArgs,
    },
    FindCell {
        value: String,
        #[serde(flatten)]
        target: TargetArgs,
    },
}

fn default_rows() -> u32 {
    DEFAULT_ROWS
}

fn default_cols() -> u32 {
    DEFAULT_COLS
}

fn empty_value() -> Value {
    Value::String(String::new())
}

impl SheetsAction {
    pub fn name(&self) -> &'static str {
        match self {
            SheetsAction::OpenSpreadsheet { .. } => "open_spreadsheet",
            SheetsAction::OpenWorksheet { .. } => "open_worksheet",
            SheetsAction::CreateSpreadsheet { .. } => "create_spreadsheet",
            SheetsAction::CreateWorksheet { .. } => "create_worksheet",
            SheetsAction::DeleteWorksheet { .. } => "delete_worksheet",
            SheetsAction::ShareSpreadsheet { .. } => "share_spreadsheet",
            SheetsAction::UpdateCell { .. } => "update_cell",
            SheetsAction::UpdateCellByCoordinates { .. } => "update_cell_by_coordinates",
            SheetsAction::FormatCell { .. } => "format_cell",
            SheetsAction::MergeCells { .. } => "merge_cells",
            SheetsAction::InsertRows { .. } => "insert_rows",
            SheetsAction::BatchClear { .. } => "batch_clear",
            SheetsAction::FindCell { .. } => "find_cell",
        }
    }
}

impl SpreadsheetClient {
    /// Runs `action` and returns its result as a single JSON value: the
    /// natural result, or `{"error": "..."}`.
    #[instrument(skip(self, action), fields(action = action.name()))]
    pub async fn execute(&self, action: SheetsAction) -> Value {
        match action {
            SheetsAction::OpenSpreadsheet { key_or_url } => {
                into_payload(self.open_spreadsheet(key_or_url.as_deref()).await)
            }
            SheetsAction::OpenWorksheet { target } => {
                into_payload(self.get_all_records(target.target()).await)
            }
            SheetsAction::CreateSpreadsheet { title } => {
                into_payload(self.create_spreadsheet(&title).await)
            }
            SheetsAction::CreateWorksheet {
                title,
                key_or_url,
                rows,
                cols,
            } => into_payload(
                self.create_worksheet(&title, key_or_url.as_deref(), rows, cols)
                    .await,
            ),
            SheetsAction::DeleteWorksheet { target } => {
                into_payload(self.delete_worksheet(target.target()).await)
            }
            SheetsAction::ShareSpreadsheet {
                emails,
                key_or_url,
                permissions,
                role,
            } => into_payload(
                self.share_spreadsheet(emails, key_or_url.as_deref(), &permissions, &role)
                    .await,
            ),
            SheetsAction::UpdateCell {
                cell,
                value,
                target,
            } => into_payload(self.update_cell(&cell, value, target.target()).await),
            SheetsAction::UpdateCellByCoordinates {
                row,
                col,
                value,
                target,
            } => into_payload(
                self.update_cell_by_coordinates(row, col, value, target.target())
                    .await,
            ),
            SheetsAction::FormatCell {
                cell,
                format_options,
                target,
            } => into_payload(
                self.format_cell(&cell, format_options, target.target())
                    .await,
            ),
            SheetsAction::MergeCells {
                cells,
                merge_type,
                target,
            } => into_payload(self.merge_cells(&cells, merge_type, target.target()).await),
            SheetsAction::InsertRows {
                values,
                row_index,
                value_input_option,
                inherit_from_before,
                target,
            } => into_payload(
                self.insert_rows(
                    values,
                    row_index,
                    value_input_option,
                    inherit_from_before,
                    target.target(),
                )
                .await,
            ),
            SheetsAction::BatchClear { ranges, target } => {
                into_payload(self.batch_clear(ranges, target.target()).await)
            }
            SheetsAction::FindCell { value, target } => {
                into_payload(self.find_cell(&value, target.target()).await)
            }
        }
    }

    /// Like [`execute`](Self::execute), but parses the action first. A payload
    /// that is not a valid action also yields an error object.
    pub async fn execute_json(&self, action: &str) -> Value {
        match serde_json::from_str::<SheetsAction>(action) {
            Ok(action) => self.execute(action).await,
            Err(error) => {
                tracing::error!("Invalid action payload: {error}");
                json!({ "error": format!("Invalid action: {error}") })
            }
        }
    }
}
