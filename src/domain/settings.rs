use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Locator and worksheet used when a call does not name its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetDefaults {
    pub key_or_url: String,
    pub worksheet_title: String,
}

impl SheetDefaults {
    pub fn new(key_or_url: impl Into<String>, worksheet_title: impl Into<String>) -> Self {
        SheetDefaults {
            key_or_url: key_or_url.into(),
            worksheet_title: worksheet_title.into(),
        }
    }

    pub fn key_or_url<'a>(&'a self, key_or_url: Option<&'a str>) -> &'a str {
        pick(key_or_url, &self.key_or_url)
    }

    pub fn worksheet_title<'a>(&'a self, worksheet_title: Option<&'a str>) -> &'a str {
        pick(worksheet_title, &self.worksheet_title)
    }
}

fn pick<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
    match value {
        Some(value) if !value.is_empty() => value,
        _ => default,
    }
}

/// How a non-URL locator is opened.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LocatorPolicy {
    /// The resolved locator is opened, whether it is a URL or a key.
    #[default]
    FollowLocator,
    /// URLs are opened as given, but keys always resolve to the default
    /// locator, ignoring any per-call key.
    PinnedDefaultKey,
}
