use serde_json::Value;

use crate::strict;

/// Shown when the service response carries no usable error message of its own.
pub const DEFAULT_ERROR_MESSAGE: &str = "Error while fetching from Mr.DLib.";

/// Message to show the user for an error-shaped response such as `{"message": "..."}`.
///
/// Returns the reported `message` when the body is a JSON object holding a non-blank
/// string under that key, and [`DEFAULT_ERROR_MESSAGE`] otherwise.
pub fn extract_error_message(text: &str) -> String {
    let reported = strict::from_str(text)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_owned))
        .filter(|m| !m.trim().is_empty());
    match reported {
        Some(message) => message,
        None => {
            tracing::debug!("no message in error response, using default");
            DEFAULT_ERROR_MESSAGE.to_string()
        }
    }
}
