use std::{str::FromStr, sync::Arc};

use error_stack::{report, ResultExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::instrument;

use super::operation_error::{guarded, OperationResult};
use crate::{
    adapters::{
        config::sheets_config::SheetsActionConfig,
        sheets::{auth::SetupError, google_backend::GoogleSheetsBackend, value_range_factory},
    },
    domain::{
        settings::{LocatorPolicy, SheetDefaults},
        sheets::{
            a1_notation::{absolute_range_name, quote_sheet_title, FromA1Notation, ToA1Notation},
            cell_position::CellPosition,
            cell_range::CellRange,
            coordinate::Coordinate,
            locator::SpreadsheetLocator,
            options::{
                MergeType, PermissionRequest, PermissionType, Recipients, Role, ValueInputOption,
            },
            records::{self, Record},
            spreadsheet::{SpreadsheetHandle, WorksheetHandle},
        },
    },
    ports::{SheetsBackend, SheetsError},
};

pub const DEFAULT_ROWS: u32 = 100;
pub const DEFAULT_COLS: u32 = 20;

/// Per-call overrides of the client defaults. `None` and `""` both mean "use
/// the default".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetTarget<'a> {
    pub key_or_url: Option<&'a str>,
    pub worksheet_title: Option<&'a str>,
}

impl<'a> SheetTarget<'a> {
    pub fn spreadsheet(key_or_url: &'a str) -> Self {
        SheetTarget {
            key_or_url: Some(key_or_url),
            worksheet_title: None,
        }
    }

    pub fn worksheet(worksheet_title: &'a str) -> Self {
        SheetTarget {
            key_or_url: None,
            worksheet_title: Some(worksheet_title),
        }
    }

    pub fn with_worksheet(self, worksheet_title: &'a str) -> Self {
        SheetTarget {
            worksheet_title: Some(worksheet_title),
            ..self
        }
    }
}

/// Result of a successful `find_cell`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoundCell {
    pub status: u16,
    pub row: u32,
    pub column: u32,
}

/// Uniform facade over the remote spreadsheet service.
///
/// Every public operation is a failure boundary: errors are logged with their
/// full report and returned as [`OperationError`](super::operation_error::OperationError).
/// Spreadsheet and worksheet are resolved again on every call.
pub struct SpreadsheetClient {
    backend: Arc<dyn SheetsBackend>,
    defaults: RwLock<SheetDefaults>,
    locator_policy: LocatorPolicy,
}

impl std::fmt::Debug for SpreadsheetClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpreadsheetClient")
            .field("locator_policy", &self.locator_policy)
            .finish_non_exhaustive()
    }
}

impl SpreadsheetClient {
    pub fn new(
        backend: Arc<dyn SheetsBackend>,
        defaults: SheetDefaults,
        locator_policy: LocatorPolicy,
    ) -> Self {
        SpreadsheetClient {
            backend,
            defaults: RwLock::new(defaults),
            locator_policy,
        }
    }

    /// Authenticates against the remote service. Setup failures are returned
    /// as-is rather than converted into an operation error.
    #[instrument(name = "SpreadsheetClient::connect", skip(config))]
    pub async fn connect(config: &SheetsActionConfig) -> error_stack::Result<Self, SetupError> {
        let backend = GoogleSheetsBackend::connect(&config.credentials).await?;
        Ok(SpreadsheetClient::new(
            Arc::new(backend),
            config.defaults(),
            config.locator_policy,
        ))
    }

    pub async fn defaults(&self) -> SheetDefaults {
        self.defaults.read().await.clone()
    }

    /// Replaces the defaults used by later calls that omit an override.
    pub async fn set_defaults(&self, defaults: SheetDefaults) {
        tracing::info!(?defaults, "updating sheet defaults");
        *self.defaults.write().await = defaults;
    }

    pub fn locator_policy(&self) -> LocatorPolicy {
        self.locator_policy
    }

    async fn resolve_spreadsheet(
        &self,
        defaults: &SheetDefaults,
        key_or_url: Option<&str>,
    ) -> error_stack::Result<SpreadsheetHandle, SheetsError> {
        let requested = defaults.key_or_url(key_or_url);
        let locator = SpreadsheetLocator::parse(requested)
            .change_context(SheetsError::InvalidLocator)
            .attach_printable_lazy(|| format!("Could not resolve locator {requested:?}"))?;

        let key = match (self.locator_policy, &locator) {
            (_, SpreadsheetLocator::Url { key, .. }) => key.clone(),
            (LocatorPolicy::FollowLocator, SpreadsheetLocator::Key(key)) => key.clone(),
            (LocatorPolicy::PinnedDefaultKey, SpreadsheetLocator::Key(_)) => {
                SpreadsheetLocator::parse(&defaults.key_or_url)
                    .change_context(SheetsError::InvalidLocator)
                    .attach_printable("No usable default spreadsheet locator is configured")?
                    .key()
                    .to_owned()
            }
        };

        tracing::trace!(key = %key, url = locator.is_url(), "opening spreadsheet");
        self.backend.fetch_spreadsheet(&key).await
    }

    async fn resolve(
        &self,
        target: SheetTarget<'_>,
    ) -> error_stack::Result<(SpreadsheetHandle, WorksheetHandle), SheetsError> {
        let defaults = self.defaults().await;
        let title = defaults.worksheet_title(target.worksheet_title).to_owned();
        let spreadsheet = self.resolve_spreadsheet(&defaults, target.key_or_url).await?;

        let worksheet = spreadsheet
            .worksheet(&title)
            .cloned()
            .ok_or_else(|| report!(SheetsError::WorksheetNotFound(title.clone())))
            .attach_printable_lazy(|| {
                format!(
                    "Spreadsheet {} has worksheets {:?}",
                    spreadsheet.id,
                    spreadsheet
                        .worksheets
                        .iter()
                        .map(|sheet| sheet.title.as_str())
                        .collect::<Vec<_>>()
                )
            })?;

        Ok((spreadsheet, worksheet))
    }

    async fn read_worksheet(
        &self,
        spreadsheet: &SpreadsheetHandle,
        worksheet: &WorksheetHandle,
    ) -> error_stack::Result<Vec<Vec<Value>>, SheetsError> {
        self.backend
            .values_get(&spreadsheet.id, &quote_sheet_title(&worksheet.title))
            .await
    }

    #[instrument(skip(self))]
    pub async fn open_spreadsheet(
        &self,
        key_or_url: Option<&str>,
    ) -> OperationResult<SpreadsheetHandle> {
        guarded("open_spreadsheet", async {
            let defaults = self.defaults().await;
            self.resolve_spreadsheet(&defaults, key_or_url).await
        })
        .await
    }

    /// Opens a worksheet and lists its rows as header-keyed records.
    #[instrument(skip(self))]
    pub async fn get_all_records(&self, target: SheetTarget<'_>) -> OperationResult<Vec<Record>> {
        guarded("get_all_records", async {
            let (spreadsheet, worksheet) = self.resolve(target).await?;
            let values = self.read_worksheet(&spreadsheet, &worksheet).await?;
            records::records_from_values(&values)
                .change_context(SheetsError::MalformedData)
                .attach_printable_lazy(|| format!("Worksheet {:?}", worksheet.title))
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn create_spreadsheet(&self, title: &str) -> OperationResult<String> {
        guarded("create_spreadsheet", async {
            let spreadsheet = self.backend.create_spreadsheet(title).await?;
            tracing::info!(id = %spreadsheet.id, "created spreadsheet");
            Ok(spreadsheet.id)
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn create_worksheet(
        &self,
        title: &str,
        key_or_url: Option<&str>,
        rows: u32,
        cols: u32,
    ) -> OperationResult<i32> {
        guarded("create_worksheet", async {
            let defaults = self.defaults().await;
            let spreadsheet = self.resolve_spreadsheet(&defaults, key_or_url).await?;

            let response = self
                .backend
                .batch_update(
                    &spreadsheet.id,
                    vec![json!({
                        "addSheet": {
                            "properties": {
                                "title": title,
                                "sheetType": "GRID",
                                "gridProperties": {"rowCount": rows, "columnCount": cols},
                            }
                        }
                    })],
                )
                .await?;

            response
                .pointer("/replies/0/addSheet/properties/sheetId")
                .and_then(Value::as_i64)
                .and_then(|id| i32::try_from(id).ok())
                .ok_or_else(|| report!(SheetsError::UnexpectedResponse))
                .attach_printable("addSheet reply carries no sheet id")
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn delete_worksheet(&self, target: SheetTarget<'_>) -> OperationResult<bool> {
        guarded("delete_worksheet", async {
            let (spreadsheet, worksheet) = self.resolve(target).await?;
            self.backend
                .batch_update(
                    &spreadsheet.id,
                    vec![json!({"deleteSheet": {"sheetId": worksheet.id}})],
                )
                .await?;
            Ok(true)
        })
        .await
    }

    /// Shares the spreadsheet with each recipient. Results keep the input
    /// order; an empty permission type or role means `user` / `writer`.
    #[instrument(skip(self, recipients))]
    pub async fn share_spreadsheet(
        &self,
        recipients: impl Into<Recipients>,
        key_or_url: Option<&str>,
        perm_type: &str,
        role: &str,
    ) -> OperationResult<Vec<Value>> {
        let recipients = recipients.into().into_vec();
        guarded("share_spreadsheet", async {
            let perm_type = parse_or_default::<PermissionType>(perm_type)
                .attach_printable_lazy(|| format!("Unknown permission type {perm_type:?}"))?;
            let role = parse_or_default::<Role>(role)
                .attach_printable_lazy(|| format!("Unknown role {role:?}"))?;

            let defaults = self.defaults().await;
            let spreadsheet = self.resolve_spreadsheet(&defaults, key_or_url).await?;

            let permissions: Vec<PermissionRequest> = recipients
                .iter()
                .map(|recipient| PermissionRequest::new(recipient, perm_type, role))
                .collect();

            futures::future::try_join_all(
                permissions
                    .iter()
                    .map(|permission| self.backend.insert_permission(&spreadsheet.id, permission)),
            )
            .await
        })
        .await
    }

    /// Writes `value` to a cell or range given in A1 notation. Values are
    /// stored as entered.
    #[instrument(skip(self, value))]
    pub async fn update_cell(
        &self,
        cell: &str,
        value: Value,
        target: SheetTarget<'_>,
    ) -> OperationResult<Value> {
        guarded("update_cell", async {
            let (spreadsheet, worksheet) = self.resolve(target).await?;
            let range = absolute_range_name(&worksheet.title, cell);
            self.backend
                .values_update(
                    &spreadsheet.id,
                    range.as_ref(),
                    value_range_factory::to_rows(value),
                    ValueInputOption::Raw,
                )
                .await
        })
        .await
    }

    /// Writes one cell addressed by 1-based coordinates. Values are parsed as
    /// if typed into the UI.
    #[instrument(skip(self, row, col, value))]
    pub async fn update_cell_by_coordinates(
        &self,
        row: impl Into<Coordinate>,
        col: impl Into<Coordinate>,
        value: Value,
        target: SheetTarget<'_>,
    ) -> OperationResult<Value> {
        let (row, col) = (row.into(), col.into());
        guarded("update_cell_by_coordinates", async {
            let row_number = row
                .to_number()
                .change_context(SheetsError::InvalidCoordinate)
                .attach_printable_lazy(|| format!("row {row:?}"))?;
            let col_number = col
                .to_number()
                .change_context(SheetsError::InvalidCoordinate)
                .attach_printable_lazy(|| format!("column {col:?}"))?;
            let position = CellPosition::from_row_col(row_number, col_number)
                .ok_or_else(|| report!(SheetsError::InvalidCoordinate))?;

            let (spreadsheet, worksheet) = self.resolve(target).await?;
            let range = absolute_range_name(&worksheet.title, position.to_a1_notation(None).as_ref());
            self.backend
                .values_update(
                    &spreadsheet.id,
                    range.as_ref(),
                    vec![vec![value]],
                    ValueInputOption::UserEntered,
                )
                .await
        })
        .await
    }

    /// Applies `format_options` (a Sheets `CellFormat` object) to a cell or
    /// range.
    #[instrument(skip(self, format_options))]
    pub async fn format_cell(
        &self,
        cell: &str,
        format_options: Value,
        target: SheetTarget<'_>,
    ) -> OperationResult<Value> {
        guarded("format_cell", async {
            let options = match format_options {
                Value::Object(options) if !options.is_empty() => options,
                other => {
                    return Err(report!(SheetsError::InvalidFormat))
                        .attach_printable(format!("Format options must be a non-empty object, got {other}"))
                }
            };
            let range = parse_range(cell)?;

            let (spreadsheet, worksheet) = self.resolve(target).await?;
            let fields = format!(
                "userEnteredFormat({})",
                options.keys().map(String::as_str).collect::<Vec<_>>().join(",")
            );

            self.backend
                .batch_update(
                    &spreadsheet.id,
                    vec![json!({
                        "repeatCell": {
                            "range": range.to_grid_range(worksheet.id),
                            "cell": {"userEnteredFormat": options},
                            "fields": fields,
                        }
                    })],
                )
                .await
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn merge_cells(
        &self,
        cells: &str,
        merge_type: MergeType,
        target: SheetTarget<'_>,
    ) -> OperationResult<Value> {
        guarded("merge_cells", async {
            let range = parse_range(cells)?;
            let (spreadsheet, worksheet) = self.resolve(target).await?;

            self.backend
                .batch_update(
                    &spreadsheet.id,
                    vec![json!({
                        "mergeCells": {
                            "mergeType": merge_type,
                            "range": range.to_grid_range(worksheet.id),
                        }
                    })],
                )
                .await
        })
        .await
    }

    /// Inserts `values` as new rows starting at 1-based `row_index`.
    #[instrument(skip(self, values, row_index))]
    pub async fn insert_rows(
        &self,
        values: Vec<Vec<Value>>,
        row_index: impl Into<Coordinate>,
        value_input_option: ValueInputOption,
        inherit_from_before: bool,
        target: SheetTarget<'_>,
    ) -> OperationResult<Value> {
        let row_index = row_index.into();
        guarded("insert_rows", async {
            let row = row_index
                .to_number()
                .change_context(SheetsError::InvalidCoordinate)
                .attach_printable_lazy(|| format!("row index {row_index:?}"))?;
            if inherit_from_before && row == 1 {
                return Err(report!(SheetsError::InvalidInsert(
                    "inherit_from_before cannot be used when inserting row(s) at the top of a spreadsheet"
                )));
            }

            let start_index = row - 1;
            let end_index = u32::try_from(values.len())
                .ok()
                .and_then(|row_count| start_index.checked_add(row_count))
                .ok_or_else(|| report!(SheetsError::InvalidInsert("row index out of range")))
                .attach_printable_lazy(|| format!("{} row(s) at row {row}", values.len()))?;

            let (spreadsheet, worksheet) = self.resolve(target).await?;

            self.backend
                .batch_update(
                    &spreadsheet.id,
                    vec![json!({
                        "insertDimension": {
                            "range": {
                                "sheetId": worksheet.id,
                                "dimension": "ROWS",
                                "startIndex": start_index,
                                "endIndex": end_index,
                            },
                            "inheritFromBefore": inherit_from_before,
                        }
                    })],
                )
                .await?;

            let range = absolute_range_name(&worksheet.title, &format!("A{row}"));
            self.backend
                .values_append(&spreadsheet.id, range.as_ref(), values, value_input_option)
                .await
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn batch_clear(
        &self,
        ranges: Vec<String>,
        target: SheetTarget<'_>,
    ) -> OperationResult<Value> {
        guarded("batch_clear", async {
            let (spreadsheet, worksheet) = self.resolve(target).await?;
            let ranges = ranges
                .iter()
                .map(|range| String::from(absolute_range_name(&worksheet.title, range)))
                .collect();

            self.backend
                .values_batch_clear(&spreadsheet.id, ranges)
                .await
        })
        .await
    }

    /// Finds the first cell (row-major) whose text equals `value`.
    #[instrument(skip(self))]
    pub async fn find_cell(&self, value: &str, target: SheetTarget<'_>) -> OperationResult<FoundCell> {
        guarded("find_cell", async {
            let (spreadsheet, worksheet) = self.resolve(target).await?;
            let values = self.read_worksheet(&spreadsheet, &worksheet).await?;

            let (row, column) = records::find_first(&values, value)
                .ok_or_else(|| report!(SheetsError::CellNotFound(value.to_owned())))
                .attach_printable_lazy(|| format!("Worksheet {:?}", worksheet.title))?;

            Ok(FoundCell {
                status: 200,
                row,
                column,
            })
        })
        .await
    }
}

fn parse_range(range: &str) -> error_stack::Result<CellRange, SheetsError> {
    CellRange::from_a1_notation(&range.into())
        .change_context(SheetsError::InvalidRange(range.to_owned()))
}

fn parse_or_default<T>(value: &str) -> error_stack::Result<T, SheetsError>
where
    T: FromStr<Err = strum::ParseError> + Default,
{
    match value.trim() {
        "" => Ok(T::default()),
        value => T::from_str(value).change_context(SheetsError::InvalidShareOptions),
    }
}
