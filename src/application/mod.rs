pub mod action;
pub mod client;
pub mod operation_error;

pub use action::{SheetsAction, TargetArgs};
pub use client::{FoundCell, SheetTarget, SpreadsheetClient};
pub use operation_error::{into_payload, OperationError, OperationResult};
