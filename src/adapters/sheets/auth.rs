use error_stack::{report, ResultExt};
use google_sheets4::hyper;
use google_sheets4::oauth2::{self, authenticator::Authenticator};
use thiserror::Error;
use tracing::instrument;

use super::http_client::Connector;
use crate::domain::credentials::ServiceAccountCredentials;

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Invalid service account credentials")]
    InvalidCredentials,
    #[error("Could not create the HTTPS client")]
    FailedToBuildHttpClient,
    #[error("Could not create an authenticator")]
    FailedToBuildAuthenticator,
}

/// Converts the credential bundle into the key type understood by the OAuth
/// client. Fields the OAuth client has no use for (universe domain) are
/// dropped.
pub fn service_account_key(
    credentials: &ServiceAccountCredentials,
) -> error_stack::Result<oauth2::ServiceAccountKey, SetupError> {
    for (field, value) in [
        ("client_email", &credentials.client_email),
        ("private_key", &credentials.private_key),
        ("token_uri", &credentials.token_uri),
    ] {
        if value.trim().is_empty() {
            return Err(report!(SetupError::InvalidCredentials))
                .attach_printable(format!("Service account field '{field}' is empty"));
        }
    }

    let value =
        serde_json::to_value(credentials).change_context(SetupError::InvalidCredentials)?;
    serde_json::from_value(value)
        .change_context(SetupError::InvalidCredentials)
        .attach_printable("Credential bundle is not a valid service account key")
}

#[instrument(skip(client))]
pub async fn auth(
    credentials: &ServiceAccountCredentials,
    client: hyper::Client<Connector>,
) -> error_stack::Result<Authenticator<Connector>, SetupError> {
    let secret = service_account_key(credentials)?;

    oauth2::ServiceAccountAuthenticator::with_client(secret, client)
        .build()
        .await
        .change_context(SetupError::FailedToBuildAuthenticator)
        .attach_printable_lazy(|| {
            format!(
                "Service account {} was rejected while building the authenticator",
                credentials.client_email
            )
        })
}
