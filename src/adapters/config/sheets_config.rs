use serde::{Deserialize, Serialize};

use crate::domain::{
    credentials::ServiceAccountCredentials,
    settings::{LocatorPolicy, SheetDefaults},
};

/// Settings of the spreadsheet action: the service account plus the default
/// spreadsheet and worksheet used when a call names none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetsActionConfig {
    pub credentials: ServiceAccountCredentials,
    #[serde(default)]
    pub key_or_url: String,
    #[serde(default)]
    pub worksheet_title: String,
    #[serde(default)]
    pub locator_policy: LocatorPolicy,
}

impl SheetsActionConfig {
    pub fn defaults(&self) -> SheetDefaults {
        SheetDefaults::new(self.key_or_url.clone(), self.worksheet_title.clone())
    }
}
