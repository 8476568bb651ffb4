use serde_json::Value;
use thiserror::Error;

use crate::domain::sheets::{
    options::{PermissionRequest, ValueInputOption},
    spreadsheet::SpreadsheetHandle,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SheetsError {
    #[error("Invalid spreadsheet locator")]
    InvalidLocator,
    #[error("Failed to open spreadsheet")]
    FailedToOpenSpreadsheet,
    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),
    #[error("Invalid coordinate")]
    InvalidCoordinate,
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Invalid format options")]
    InvalidFormat,
    #[error("Invalid share options")]
    InvalidShareOptions,
    #[error("Invalid insert: {0}")]
    InvalidInsert(&'static str),
    #[error("Malformed worksheet data")]
    MalformedData,
    #[error("Cell not found: {0:?}")]
    CellNotFound(String),
    #[error("Failed to create spreadsheet")]
    FailedToCreateSpreadsheet,
    #[error("Failed to read range")]
    FailedToFetchRange,
    #[error("Failed to write range")]
    FailedToWriteRange,
    #[error("Failed to clear ranges")]
    FailedToClearRanges,
    #[error("Batch update failed")]
    FailedBatchUpdate,
    #[error("Failed to share spreadsheet")]
    FailedToShare,
    #[error("Unexpected response from the spreadsheet service")]
    UnexpectedResponse,
}

/// Transport seam between the client and the remote spreadsheet service.
///
/// Request and response payloads use the REST JSON shapes of the Sheets v4 and
/// Drive v3 APIs so implementations can forward them untouched.
#[async_trait::async_trait]
pub trait SheetsBackend: Send + Sync {
    /// Fetches spreadsheet metadata, including every worksheet's properties.
    async fn fetch_spreadsheet(
        &self,
        spreadsheet_id: &str,
    ) -> error_stack::Result<SpreadsheetHandle, SheetsError>;

    async fn create_spreadsheet(
        &self,
        title: &str,
    ) -> error_stack::Result<SpreadsheetHandle, SheetsError>;

    /// `spreadsheets.batchUpdate`. Returns the raw response body.
    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<Value>,
    ) -> error_stack::Result<Value, SheetsError>;

    async fn values_get(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> error_stack::Result<Vec<Vec<Value>>, SheetsError>;

    async fn values_update(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
        value_input_option: ValueInputOption,
    ) -> error_stack::Result<Value, SheetsError>;

    async fn values_append(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
        value_input_option: ValueInputOption,
    ) -> error_stack::Result<Value, SheetsError>;

    async fn values_batch_clear(
        &self,
        spreadsheet_id: &str,
        ranges: Vec<String>,
    ) -> error_stack::Result<Value, SheetsError>;

    /// Drive `permissions.create` on the spreadsheet file.
    async fn insert_permission(
        &self,
        file_id: &str,
        permission: &PermissionRequest,
    ) -> error_stack::Result<Value, SheetsError>;
}
