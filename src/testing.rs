//! In-memory `SheetsBackend` used by the client and action tests.

use std::{collections::BTreeMap, sync::Mutex};

use error_stack::{report, ResultExt};
use serde_json::{json, Value};

use crate::{
    domain::sheets::{
        a1_notation::{A1Notation, FromA1Notation},
        cell_position::CellPosition,
        locator::spreadsheet_url,
        options::{PermissionRequest, ValueInputOption},
        records::CellText,
        spreadsheet::{SpreadsheetHandle, WorksheetHandle},
    },
    ports::{SheetsBackend, SheetsError},
};

/// Mutating requests received by the fake, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum FakeCall {
    CreateSpreadsheet {
        title: String,
    },
    BatchUpdate {
        spreadsheet_id: String,
        requests: Vec<Value>,
    },
    ValuesUpdate {
        spreadsheet_id: String,
        range: String,
        values: Vec<Vec<Value>>,
        value_input_option: ValueInputOption,
    },
    ValuesAppend {
        spreadsheet_id: String,
        range: String,
        values: Vec<Vec<Value>>,
        value_input_option: ValueInputOption,
    },
    BatchClear {
        spreadsheet_id: String,
        ranges: Vec<String>,
    },
    InsertPermission {
        file_id: String,
        permission: Value,
    },
}

#[derive(Debug)]
struct FakeSheet {
    id: i32,
    title: String,
    grid: Vec<Vec<Value>>,
}

#[derive(Debug)]
struct FakeSpreadsheet {
    title: String,
    sheets: Vec<FakeSheet>,
}

impl FakeSpreadsheet {
    fn sheet_mut(&mut self, title: &str) -> error_stack::Result<&mut FakeSheet, SheetsError> {
        self.sheets
            .iter_mut()
            .find(|sheet| sheet.title == title)
            .ok_or_else(|| report!(SheetsError::WorksheetNotFound(title.to_owned())))
    }
}

#[derive(Debug, Default)]
struct FakeState {
    spreadsheets: BTreeMap<String, FakeSpreadsheet>,
    calls: Vec<FakeCall>,
    fetched: Vec<String>,
    failure: Option<SheetsError>,
    created: u32,
}

impl FakeState {
    fn check(&self) -> error_stack::Result<(), SheetsError> {
        match &self.failure {
            Some(failure) => Err(report!(failure.clone())),
            None => Ok(()),
        }
    }

    fn spreadsheet_mut(
        &mut self,
        spreadsheet_id: &str,
    ) -> error_stack::Result<&mut FakeSpreadsheet, SheetsError> {
        self.spreadsheets
            .get_mut(spreadsheet_id)
            .ok_or_else(|| report!(SheetsError::FailedToOpenSpreadsheet))
    }
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new() -> Self {
        FakeBackend::default()
    }

    /// Seeds a spreadsheet. Worksheet ids follow declaration order from 0.
    pub fn add_spreadsheet(&self, key: &str, title: &str, sheets: &[(&str, &[&[&str]])]) {
        let sheets = sheets
            .iter()
            .enumerate()
            .map(|(index, (sheet_title, rows))| FakeSheet {
                id: index as i32,
                title: sheet_title.to_string(),
                grid: rows
                    .iter()
                    .map(|row| row.iter().map(|cell| json!(cell)).collect())
                    .collect(),
            })
            .collect();

        self.state.lock().unwrap().spreadsheets.insert(
            key.to_owned(),
            FakeSpreadsheet {
                title: title.to_owned(),
                sheets,
            },
        );
    }

    pub fn has_spreadsheet(&self, key: &str) -> bool {
        self.state.lock().unwrap().spreadsheets.contains_key(key)
    }

    /// Makes every later request fail with `failure`.
    pub fn fail_with(&self, failure: SheetsError) {
        self.state.lock().unwrap().failure = Some(failure);
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Keys passed to `fetch_spreadsheet`, in order.
    pub fn fetched(&self) -> Vec<String> {
        self.state.lock().unwrap().fetched.clone()
    }

    /// Rendered text of a cell, by 1-based coordinates.
    pub fn cell(&self, key: &str, sheet_title: &str, row: usize, col: usize) -> Option<String> {
        let state = self.state.lock().unwrap();
        let sheet = state
            .spreadsheets
            .get(key)?
            .sheets
            .iter()
            .find(|sheet| sheet.title == sheet_title)?;
        sheet
            .grid
            .get(row - 1)?
            .get(col - 1)
            .map(CellText::cell_text)
    }

    fn write_rows(
        &self,
        call: FakeCall,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
    ) -> error_stack::Result<(usize, usize), SheetsError> {
        let mut state = self.state.lock().unwrap();
        state.check()?;
        state.calls.push(call);

        let (title, local) = split_range(range);
        let start = local
            .as_deref()
            .and_then(|local| local.split(':').next())
            .unwrap_or("A1");
        let position = CellPosition::from_a1_notation(&A1Notation::from(start))
            .map_err(|_| report!(SheetsError::InvalidRange(range.to_owned())))?;

        let sheet = state.spreadsheet_mut(spreadsheet_id)?.sheet_mut(&title)?;
        let (row, col) = (position.row.index() as usize, position.col.index() as usize);
        let mut cells = 0;
        for (row_offset, row_values) in values.iter().enumerate() {
            for (col_offset, value) in row_values.iter().enumerate() {
                write_cell(&mut sheet.grid, row + row_offset, col + col_offset, value.clone());
                cells += 1;
            }
        }
        Ok((values.len(), cells))
    }
}

fn split_range(range: &str) -> (String, Option<String>) {
    match range.rsplit_once('!') {
        Some((title, local)) => (unquote(title), Some(local.to_owned())),
        None => (unquote(range), None),
    }
}

fn unquote(title: &str) -> String {
    title
        .strip_prefix('\'')
        .and_then(|title| title.strip_suffix('\''))
        .map(|title| title.replace("''", "'"))
        .unwrap_or_else(|| title.to_owned())
}

fn write_cell(grid: &mut Vec<Vec<Value>>, row: usize, col: usize, value: Value) {
    if grid.len() <= row {
        grid.resize(row + 1, Vec::new());
    }
    let cells = &mut grid[row];
    if cells.len() <= col {
        cells.resize(col + 1, json!(""));
    }
    cells[col] = value;
}

fn apply_request(
    spreadsheet: &mut FakeSpreadsheet,
    request: &Value,
) -> error_stack::Result<Value, SheetsError> {
    if let Some(properties) = request.pointer("/addSheet/properties") {
        let id = spreadsheet.sheets.iter().map(|sheet| sheet.id).max().unwrap_or(-1) + 1;
        let title = properties["title"].as_str().unwrap_or_default().to_owned();
        spreadsheet.sheets.push(FakeSheet {
            id,
            title: title.clone(),
            grid: Vec::new(),
        });
        return Ok(json!({"addSheet": {"properties": {"sheetId": id, "title": title}}}));
    }

    if let Some(id) = request.pointer("/deleteSheet/sheetId").and_then(Value::as_i64) {
        let before = spreadsheet.sheets.len();
        spreadsheet.sheets.retain(|sheet| i64::from(sheet.id) != id);
        if spreadsheet.sheets.len() == before {
            return Err(report!(SheetsError::FailedBatchUpdate));
        }
        return Ok(json!({}));
    }

    if let Some(range) = request.pointer("/insertDimension/range") {
        let id = range["sheetId"].as_i64().unwrap_or_default();
        let start = range["startIndex"].as_u64().unwrap_or_default() as usize;
        let end = range["endIndex"].as_u64().unwrap_or_default() as usize;
        let sheet = spreadsheet
            .sheets
            .iter_mut()
            .find(|sheet| i64::from(sheet.id) == id)
            .ok_or_else(|| report!(SheetsError::FailedBatchUpdate))?;
        let at = start.min(sheet.grid.len());
        for _ in start..end {
            sheet.grid.insert(at, Vec::new());
        }
        return Ok(json!({}));
    }

    Ok(json!({}))
}

#[async_trait::async_trait]
impl SheetsBackend for FakeBackend {
    async fn fetch_spreadsheet(
        &self,
        spreadsheet_id: &str,
    ) -> error_stack::Result<SpreadsheetHandle, SheetsError> {
        let mut state = self.state.lock().unwrap();
        state.fetched.push(spreadsheet_id.to_owned());
        state.check()?;

        let spreadsheet = state
            .spreadsheets
            .get(spreadsheet_id)
            .ok_or_else(|| report!(SheetsError::FailedToOpenSpreadsheet))?;

        Ok(SpreadsheetHandle {
            id: spreadsheet_id.to_owned(),
            title: spreadsheet.title.clone(),
            url: spreadsheet_url(spreadsheet_id),
            worksheets: spreadsheet
                .sheets
                .iter()
                .enumerate()
                .map(|(index, sheet)| WorksheetHandle {
                    id: sheet.id,
                    title: sheet.title.clone(),
                    index: index as i32,
                    row_count: sheet.grid.len() as i32,
                    column_count: sheet.grid.iter().map(Vec::len).max().unwrap_or(0) as i32,
                })
                .collect(),
        })
    }

    async fn create_spreadsheet(
        &self,
        title: &str,
    ) -> error_stack::Result<SpreadsheetHandle, SheetsError> {
        let key = {
            let mut state = self.state.lock().unwrap();
            state.check()?;
            state.calls.push(FakeCall::CreateSpreadsheet {
                title: title.to_owned(),
            });
            state.created += 1;
            format!("created-{}", state.created)
        };

        self.add_spreadsheet(&key, title, &[("Sheet1", &[])]);
        Ok(SpreadsheetHandle {
            url: spreadsheet_url(&key),
            id: key,
            title: title.to_owned(),
            worksheets: Vec::new(),
        })
    }

    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<Value>,
    ) -> error_stack::Result<Value, SheetsError> {
        let mut state = self.state.lock().unwrap();
        state.check()?;
        state.calls.push(FakeCall::BatchUpdate {
            spreadsheet_id: spreadsheet_id.to_owned(),
            requests: requests.clone(),
        });

        let spreadsheet = state.spreadsheet_mut(spreadsheet_id)?;
        let replies = requests
            .iter()
            .map(|request| apply_request(spreadsheet, request))
            .collect::<error_stack::Result<Vec<_>, _>>()?;

        Ok(json!({"spreadsheetId": spreadsheet_id, "replies": replies}))
    }

    async fn values_get(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> error_stack::Result<Vec<Vec<Value>>, SheetsError> {
        let mut state = self.state.lock().unwrap();
        state.check()?;
        let (title, _) = split_range(range);
        let sheet = state.spreadsheet_mut(spreadsheet_id)?.sheet_mut(&title)?;
        Ok(sheet.grid.clone())
    }

    async fn values_update(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
        value_input_option: ValueInputOption,
    ) -> error_stack::Result<Value, SheetsError> {
        let call = FakeCall::ValuesUpdate {
            spreadsheet_id: spreadsheet_id.to_owned(),
            range: range.to_owned(),
            values: values.clone(),
            value_input_option,
        };
        let (rows, cells) = self.write_rows(call, spreadsheet_id, range, values)?;

        Ok(json!({
            "spreadsheetId": spreadsheet_id,
            "updatedRange": range,
            "updatedRows": rows,
            "updatedCells": cells,
        }))
    }

    async fn values_append(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
        value_input_option: ValueInputOption,
    ) -> error_stack::Result<Value, SheetsError> {
        let call = FakeCall::ValuesAppend {
            spreadsheet_id: spreadsheet_id.to_owned(),
            range: range.to_owned(),
            values: values.clone(),
            value_input_option,
        };
        let (rows, cells) = self.write_rows(call, spreadsheet_id, range, values)?;

        Ok(json!({
            "spreadsheetId": spreadsheet_id,
            "tableRange": range,
            "updates": {"updatedRange": range, "updatedRows": rows, "updatedCells": cells},
        }))
    }

    async fn values_batch_clear(
        &self,
        spreadsheet_id: &str,
        ranges: Vec<String>,
    ) -> error_stack::Result<Value, SheetsError> {
        let mut state = self.state.lock().unwrap();
        state.check()?;
        state.calls.push(FakeCall::BatchClear {
            spreadsheet_id: spreadsheet_id.to_owned(),
            ranges: ranges.clone(),
        });
        Ok(json!({"spreadsheetId": spreadsheet_id, "clearedRanges": ranges}))
    }

    async fn insert_permission(
        &self,
        file_id: &str,
        permission: &PermissionRequest,
    ) -> error_stack::Result<Value, SheetsError> {
        let mut state = self.state.lock().unwrap();
        state.check()?;
        let mut body = serde_json::to_value(permission).unwrap();
        state.calls.push(FakeCall::InsertPermission {
            file_id: file_id.to_owned(),
            permission: body.clone(),
        });

        if let Some(email) = &permission.email_address {
            if !email.contains('@') {
                return Err(report!(SheetsError::FailedToShare))
                    .attach_printable(format!("Invalid email address {email:?}"));
            }
        }

        body["kind"] = json!("drive#permission");
        body["id"] = json!(format!("perm-{}", state.calls.len()));
        Ok(body)
    }
}
