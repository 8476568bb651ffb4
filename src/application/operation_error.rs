use std::future::Future;

use error_stack::{Context, Report};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Failure returned by every catalog operation. Serializes as
/// `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{error}")]
pub struct OperationError {
    pub error: String,
}

pub type OperationResult<T> = Result<T, OperationError>;

impl OperationError {
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        OperationError {
            error: if message.trim().is_empty() {
                "unknown error".to_string()
            } else {
                message
            },
        }
    }

    /// Uses the chain of contexts (outermost first) as the message.
    pub fn from_report<C: Context>(report: &Report<C>) -> Self {
        OperationError::new(format!("{report:#}"))
    }

    pub fn message(&self) -> &str {
        &self.error
    }
}

/// Awaits `future`, logging the full report and converting it to an
/// `OperationError` on failure.
pub(crate) async fn guarded<T, C, F>(operation: &'static str, future: F) -> OperationResult<T>
where
    C: Context,
    F: Future<Output = error_stack::Result<T, C>>,
{
    match future.await {
        Ok(value) => {
            tracing::debug!(operation, "operation succeeded");
            Ok(value)
        }
        Err(report) => {
            tracing::error!(operation, "operation failed: {report:?}");
            Err(OperationError::from_report(&report))
        }
    }
}

/// Flattens an operation result into the single JSON value handed back to the
/// agent: the natural result, or the error object.
pub fn into_payload<T: Serialize>(result: OperationResult<T>) -> Value {
    let result = result.and_then(|value| {
        serde_json::to_value(value)
            .map_err(|error| OperationError::new(format!("Failed to serialize result: {error}")))
    });

    match result {
        Ok(value) => value,
        Err(OperationError { error }) => json!({ "error": error }),
    }
}
