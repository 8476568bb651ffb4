use serde::{Deserialize, Serialize};

pub const DEFAULT_UNIVERSE_DOMAIN: &str = "googleapis.com";

/// Service-account identity used to authenticate against the Sheets and Drive
/// APIs. Field names match the JSON key file issued by the cloud console.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAccountCredentials {
    #[serde(rename = "type")]
    pub info_type: String,
    pub project_id: String,
    pub private_key_id: String,
    pub private_key: String,
    pub client_email: String,
    pub client_id: String,
    pub auth_uri: String,
    pub token_uri: String,
    pub auth_provider_x509_cert_url: String,
    pub client_x509_cert_url: String,
    #[serde(default)]
    pub universe_domain: String,
}

impl ServiceAccountCredentials {
    pub fn universe_domain(&self) -> &str {
        match self.universe_domain.trim() {
            "" => DEFAULT_UNIVERSE_DOMAIN,
            domain => domain,
        }
    }
}

impl std::fmt::Debug for ServiceAccountCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountCredentials")
            .field("type", &self.info_type)
            .field("project_id", &self.project_id)
            .field("private_key_id", &self.private_key_id)
            .field("private_key", &"<redacted>")
            .field("client_email", &self.client_email)
            .field("client_id", &self.client_id)
            .field("universe_domain", &self.universe_domain())
            .finish()
    }
}
