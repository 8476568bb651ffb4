use error_stack::{report, ResultExt};
use google_sheets4::{
    api::{BatchUpdateSpreadsheetRequest, Spreadsheet, SpreadsheetProperties, ValueRange},
    Sheets,
};
use serde_json::{json, Value};
use tracing::instrument;

use super::{
    auth::{self, SetupError},
    drive::{DrivePermissions, DRIVE_SCOPE},
    http_client::{self, Connector},
    value_range_factory::{batch_clear_request, ValueRangeFactory},
};
use crate::{
    domain::{
        credentials::ServiceAccountCredentials,
        sheets::{
            locator::spreadsheet_url,
            options::{PermissionRequest, ValueInputOption},
            spreadsheet::{SpreadsheetHandle, WorksheetHandle},
        },
    },
    ports::{SheetsBackend, SheetsError},
};

/// `SheetsBackend` talking to the real Sheets v4 and Drive v3 APIs.
pub struct GoogleSheetsBackend {
    hub: Sheets<Connector>,
    drive: DrivePermissions,
    client_email: String,
}

impl std::fmt::Debug for GoogleSheetsBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GoogleSheetsBackend {{ client_email: {:?}, drive: {:?} }}",
            self.client_email,
            self.drive.base_url()
        )
    }
}

impl GoogleSheetsBackend {
    #[instrument(name = "GoogleSheetsBackend::connect")]
    pub async fn connect(
        credentials: &ServiceAccountCredentials,
    ) -> error_stack::Result<Self, SetupError> {
        let client = http_client::http_client()?;
        let auth = auth::auth(credentials, client.clone()).await?;
        let mut hub = Sheets::new(client, auth);

        let universe_domain = credentials.universe_domain();
        let sheets_url = format!("https://sheets.{universe_domain}/");
        hub.base_url(sheets_url.clone());
        hub.root_url(sheets_url);

        Ok(GoogleSheetsBackend {
            hub,
            drive: DrivePermissions::new(universe_domain),
            client_email: credentials.client_email.clone(),
        })
    }

    async fn drive_token(&self) -> error_stack::Result<String, SheetsError> {
        self.hub
            .auth
            .get_token(&[DRIVE_SCOPE])
            .await
            .map_err(|error| {
                report!(SheetsError::FailedToShare)
                    .attach_printable(format!("Could not obtain a Drive token: {error}"))
            })?
            .ok_or_else(|| report!(SheetsError::FailedToShare))
            .attach_printable("Authenticator returned no Drive token")
    }
}

fn to_handle(spreadsheet: Spreadsheet) -> error_stack::Result<SpreadsheetHandle, SheetsError> {
    let id = spreadsheet
        .spreadsheet_id
        .ok_or(report!(SheetsError::UnexpectedResponse))
        .attach_printable("Spreadsheet id not present in response")?;

    let worksheets = spreadsheet
        .sheets
        .unwrap_or_default()
        .into_iter()
        .filter_map(|sheet| sheet.properties)
        .map(|props| {
            let grid = props.grid_properties.unwrap_or_default();
            WorksheetHandle {
                id: props.sheet_id.unwrap_or(0),
                title: props.title.unwrap_or_default(),
                index: props.index.unwrap_or(0),
                row_count: grid.row_count.unwrap_or(0),
                column_count: grid.column_count.unwrap_or(0),
            }
        })
        .collect();

    Ok(SpreadsheetHandle {
        url: spreadsheet
            .spreadsheet_url
            .unwrap_or_else(|| spreadsheet_url(&id)),
        title: spreadsheet
            .properties
            .and_then(|props| props.title)
            .unwrap_or_default(),
        id,
        worksheets,
    })
}

fn to_json<T: serde::Serialize>(response: &T) -> error_stack::Result<Value, SheetsError> {
    serde_json::to_value(response).change_context(SheetsError::UnexpectedResponse)
}

#[async_trait::async_trait]
impl SheetsBackend for GoogleSheetsBackend {
    #[instrument(skip(self))]
    async fn fetch_spreadsheet(
        &self,
        spreadsheet_id: &str,
    ) -> error_stack::Result<SpreadsheetHandle, SheetsError> {
        let (_, spreadsheet) = self
            .hub
            .spreadsheets()
            .get(spreadsheet_id)
            .doit()
            .await
            .change_context(SheetsError::FailedToOpenSpreadsheet)
            .attach_printable_lazy(|| format!("Failed to fetch spreadsheet {spreadsheet_id}"))?;

        to_handle(spreadsheet)
    }

    #[instrument(skip(self))]
    async fn create_spreadsheet(
        &self,
        title: &str,
    ) -> error_stack::Result<SpreadsheetHandle, SheetsError> {
        let request = Spreadsheet {
            properties: Some(SpreadsheetProperties {
                title: Some(title.to_owned()),
                ..Default::default()
            }),
            ..Default::default()
        };

        let (_, spreadsheet) = self
            .hub
            .spreadsheets()
            .create(request)
            .doit()
            .await
            .change_context(SheetsError::FailedToCreateSpreadsheet)?;

        to_handle(spreadsheet)
    }

    #[instrument(skip(self, requests))]
    async fn batch_update(
        &self,
        spreadsheet_id: &str,
        requests: Vec<Value>,
    ) -> error_stack::Result<Value, SheetsError> {
        let request: BatchUpdateSpreadsheetRequest =
            serde_json::from_value(json!({ "requests": requests }))
                .change_context(SheetsError::FailedBatchUpdate)
                .attach_printable("Batch update request does not match the Sheets schema")?;

        let (_, response) = self
            .hub
            .spreadsheets()
            .batch_update(request, spreadsheet_id)
            .doit()
            .await
            .change_context(SheetsError::FailedBatchUpdate)?;

        to_json(&response)
    }

    #[instrument(skip(self))]
    async fn values_get(
        &self,
        spreadsheet_id: &str,
        range: &str,
    ) -> error_stack::Result<Vec<Vec<Value>>, SheetsError> {
        let (_, value_range) = self
            .hub
            .spreadsheets()
            .values_get(spreadsheet_id, range)
            .doit()
            .await
            .change_context(SheetsError::FailedToFetchRange)
            .attach_printable_lazy(|| format!("Failed to fetch values for range {range}"))?;

        Ok(value_range.values.unwrap_or_default())
    }

    #[instrument(skip(self, values))]
    async fn values_update(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
        value_input_option: ValueInputOption,
    ) -> error_stack::Result<Value, SheetsError> {
        let (_, response) = self
            .hub
            .spreadsheets()
            .values_update(ValueRange::from_rows(values), spreadsheet_id, range)
            .value_input_option(&value_input_option.to_string())
            .doit()
            .await
            .change_context(SheetsError::FailedToWriteRange)
            .attach_printable_lazy(|| format!("Failed to write to range {range}"))?;

        to_json(&response)
    }

    #[instrument(skip(self, values))]
    async fn values_append(
        &self,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<Value>>,
        value_input_option: ValueInputOption,
    ) -> error_stack::Result<Value, SheetsError> {
        let (_, response) = self
            .hub
            .spreadsheets()
            .values_append(ValueRange::from_rows(values), spreadsheet_id, range)
            .value_input_option(&value_input_option.to_string())
            .doit()
            .await
            .change_context(SheetsError::FailedToWriteRange)
            .attach_printable_lazy(|| format!("Failed to append at range {range}"))?;

        to_json(&response)
    }

    #[instrument(skip(self))]
    async fn values_batch_clear(
        &self,
        spreadsheet_id: &str,
        ranges: Vec<String>,
    ) -> error_stack::Result<Value, SheetsError> {
        let (_, response) = self
            .hub
            .spreadsheets()
            .values_batch_clear(batch_clear_request(ranges), spreadsheet_id)
            .doit()
            .await
            .change_context(SheetsError::FailedToClearRanges)?;

        to_json(&response)
    }

    #[instrument(skip(self))]
    async fn insert_permission(
        &self,
        file_id: &str,
        permission: &PermissionRequest,
    ) -> error_stack::Result<Value, SheetsError> {
        let token = self.drive_token().await?;
        self.drive.create(&token, file_id, permission).await
    }
}
