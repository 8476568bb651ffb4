use std::path::{Path, PathBuf};

use config::Config;
use error_stack::{report, ResultExt};
use serde::{Deserialize, Serialize};
use serde_path_to_error::{Deserializer as PathDeserializer, Segment, Track};
use thiserror::Error;
use tracing::instrument;

use super::sheets_config::SheetsActionConfig;

pub const DEFAULT_CONFIG_PATH: &str = "Config";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub sheets: SheetsActionConfig,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Error reading config file '{0}'")]
    FailedToRead(String),
    #[error("Failed to deserialize config file '{0}'")]
    FailedToDeserialize(String),
    #[error("Failed to write config file '{0}'")]
    FailedToWrite(String),
}

/// Config file location: `CONFIG_PATH`, or `Config` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// Loads the settings from `config_path`. The extension may be omitted, in
/// which case every format known to `config` is tried.
#[instrument]
pub fn load_config(config_path: &str) -> error_stack::Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(config::File::with_name(config_path))
        .build()
        .change_context_lazy(|| ConfigError::FailedToRead(config_path.to_owned()))?;

    let value = config
        .try_deserialize::<serde_json::Value>()
        .change_context_lazy(|| ConfigError::FailedToDeserialize(config_path.to_owned()))?;

    use serde::de::IntoDeserializer;
    let mut track = Track::new();
    let path_de = PathDeserializer::new(value.into_deserializer(), &mut track);
    AppConfig::deserialize(path_de).map_err(|e| {
        let path_str = track
            .path()
            .iter()
            .map(|seg| match seg {
                Segment::Seq { index } => format!("[{}]", index),
                Segment::Map { key } => format!(".{}", key),
                Segment::Enum { variant } => format!("::{}", variant),
                Segment::Unknown => String::from("<?>"),
            })
            .collect::<String>();
        report!(ConfigError::FailedToDeserialize(config_path.to_owned()))
            .attach_printable(format!("{e}"))
            .attach_printable(format!("Field path: {}", path_str.trim_start_matches('.')))
    })
}

/// Writes the settings as pretty JSON. A path without extension gets `.json`
/// so that [`load_config`] finds it again. Returns the path written.
#[instrument(skip(config))]
pub fn save_config(
    config_path: &Path,
    config: &AppConfig,
) -> error_stack::Result<PathBuf, ConfigError> {
    let path = match config_path.extension() {
        Some(_) => config_path.to_path_buf(),
        None => config_path.with_extension("json"),
    };
    let failed = || ConfigError::FailedToWrite(path.display().to_string());

    let contents = serde_json::to_string_pretty(config).change_context_lazy(failed)?;
    std::fs::write(&path, contents).change_context_lazy(failed)?;

    tracing::info!(path = %path.display(), "saved settings");
    Ok(path)
}
