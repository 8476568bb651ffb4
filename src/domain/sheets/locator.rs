use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static URL_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/spreadsheets/d/([a-zA-Z0-9\-_]+)").expect("Spreadsheet URL pattern is valid")
});

/// Either a bare spreadsheet key or a browser URL that embeds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpreadsheetLocator {
    Key(String),
    Url { url: String, key: String },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocatorError {
    #[error("Spreadsheet locator is empty")]
    Empty,
    #[error("No valid spreadsheet key found in URL: {0}")]
    NoValidUrlKeyFound(String),
}

impl SpreadsheetLocator {
    /// Anything containing the `http` scheme marker is a URL, everything else
    /// is a key.
    pub fn parse(key_or_url: &str) -> Result<Self, LocatorError> {
        let key_or_url = key_or_url.trim();
        if key_or_url.is_empty() {
            return Err(LocatorError::Empty);
        }

        if is_url(key_or_url) {
            let key = extract_id_from_url(key_or_url)?;
            Ok(SpreadsheetLocator::Url {
                url: key_or_url.to_owned(),
                key,
            })
        } else {
            Ok(SpreadsheetLocator::Key(key_or_url.to_owned()))
        }
    }

    pub fn key(&self) -> &str {
        match self {
            SpreadsheetLocator::Key(key) => key,
            SpreadsheetLocator::Url { key, .. } => key,
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, SpreadsheetLocator::Url { .. })
    }
}

pub fn is_url(key_or_url: &str) -> bool {
    key_or_url.contains("http")
}

pub fn extract_id_from_url(url: &str) -> Result<String, LocatorError> {
    URL_KEY_RE
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|key| key.as_str().to_owned())
        .ok_or_else(|| LocatorError::NoValidUrlKeyFound(url.to_owned()))
}

pub fn spreadsheet_url(key: &str) -> String {
    format!("https://docs.google.com/spreadsheets/d/{key}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        let locator = SpreadsheetLocator::parse("1VJI0G67jWe4KFeD").unwrap();
        assert_eq!(locator, SpreadsheetLocator::Key("1VJI0G67jWe4KFeD".to_string()));
        assert!(!locator.is_url());
    }

    #[test]
    fn test_parse_url() {
        let url = "https://docs.google.com/spreadsheets/d/1VJI0G67-jWe_4KFeD/edit#gid=0";
        let locator = SpreadsheetLocator::parse(url).unwrap();
        assert!(locator.is_url());
        assert_eq!(locator.key(), "1VJI0G67-jWe_4KFeD");
    }

    #[test]
    fn test_parse_url_without_key() {
        assert_eq!(
            SpreadsheetLocator::parse("https://example.com/nothing"),
            Err(LocatorError::NoValidUrlKeyFound(
                "https://example.com/nothing".to_string()
            ))
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(SpreadsheetLocator::parse("  "), Err(LocatorError::Empty));
    }

    #[test]
    fn test_spreadsheet_url() {
        assert_eq!(spreadsheet_url("abc"), "https://docs.google.com/spreadsheets/d/abc");
    }
}
