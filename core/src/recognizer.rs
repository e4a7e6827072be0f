use serde_json::Value;

use crate::strict;
use crate::RECOMMENDATIONS_KEY;

/// Cheap pre-check: is `text` a JSON object with a `recommendations` key?
///
/// The key's value is not inspected. Malformed input yields `false`, never an error.
pub fn is_recognized_format(text: &str) -> bool {
    match strict::from_str(text) {
        Ok(Value::Object(root)) => root.contains_key(RECOMMENDATIONS_KEY),
        Ok(_) => {
            tracing::debug!("payload is JSON but not an object");
            false
        }
        Err(e) => {
            tracing::debug!(error = %e, "payload is not valid JSON");
            false
        }
    }
}
