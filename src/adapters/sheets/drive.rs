use error_stack::{report, Report, ResultExt};
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use crate::{domain::sheets::options::PermissionRequest, ports::SheetsError};

pub const DRIVE_SCOPE: &str = "https://www.googleapis.com/auth/drive";

#[derive(Error, Debug)]
#[error("Drive API responded with {status}: {message}")]
pub struct DriveApiError {
    pub status: u16,
    pub message: String,
}

/// Minimal Drive v3 client covering the permissions endpoint.
#[derive(Debug, Clone)]
pub struct DrivePermissions {
    http: reqwest::Client,
    base_url: String,
}

impl DrivePermissions {
    pub fn new(universe_domain: &str) -> Self {
        DrivePermissions {
            http: reqwest::Client::new(),
            base_url: format!("https://www.{universe_domain}/drive/v3"),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self, token))]
    pub async fn create(
        &self,
        token: &str,
        file_id: &str,
        permission: &PermissionRequest,
    ) -> error_stack::Result<Value, SheetsError> {
        let response = self
            .http
            .post(format!("{}/files/{}/permissions", self.base_url, file_id))
            .bearer_auth(token)
            .query(&[
                ("sendNotificationEmail", permission.notify.to_string()),
                ("supportsAllDrives", "true".to_string()),
            ])
            .json(permission)
            .send()
            .await
            .change_context(SheetsError::FailedToShare)
            .attach_printable_lazy(|| format!("Permission request for file {file_id} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Report::new(DriveApiError {
                status: status.as_u16(),
                message: error_message(&text),
            })
            .change_context(SheetsError::FailedToShare));
        }

        let body: Value = response
            .json()
            .await
            .change_context(SheetsError::UnexpectedResponse)
            .attach_printable_lazy(|| format!("Drive API responded with {status}"))?;

        if body.is_null() {
            return Err(report!(SheetsError::UnexpectedResponse))
                .attach_printable("Drive API returned an empty permission body");
        }

        Ok(body)
    }
}

/// Message of a Drive error body. Bodies that are not the usual JSON error
/// object (an HTML gateway page, say) are passed through as text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|body| {
            body.pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_owned())
}
