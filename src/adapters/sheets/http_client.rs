use error_stack::ResultExt;
use google_sheets4::{hyper, hyper_rustls};

use super::auth::SetupError;

pub type Connector = hyper_rustls::HttpsConnector<hyper::client::HttpConnector>;

/// HTTPS client trusting the platform's native root certificates.
pub fn http_client() -> error_stack::Result<hyper::Client<Connector>, SetupError> {
    let connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_native_roots()
        .change_context(SetupError::FailedToBuildHttpClient)
        .attach_printable("Could not load the native root certificates")?
        .https_or_http()
        .enable_http1()
        .build();

    Ok(hyper::Client::builder().build(connector))
}
