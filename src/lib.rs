//! Spreadsheet action for agent frameworks: a uniform call surface over the
//! Google Sheets and Drive APIs whose failures come back as
//! `{"error": "<message>"}` values instead of panics or raw errors.

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

#[cfg(test)]
mod testing;

pub use adapters::config::{
    app_config::{load_config, save_config, AppConfig},
    sheets_config::SheetsActionConfig,
};
pub use application::{OperationError, OperationResult, SheetsAction, SpreadsheetClient};
