use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::ClientError;

// Helper to join path to base URL
pub(super) fn build_url(base: &Url, path: &str) -> Result<Url, ClientError> {
    Ok(base.join(path)?)
}

/// Extracts a collection field from a response body, mapping each element
/// into `T`. An absent or null field is an empty collection, not an error.
pub(super) fn collection_field<T: DeserializeOwned>(
    body: &Value,
    field: &str,
) -> Result<Vec<T>, ClientError> {
    match body.get(field) {
        Some(items) if !items.is_null() => Ok(serde_json::from_value(items.clone())?),
        _ => Ok(Vec::new()),
    }
}

/// The boolean `success` flag some endpoints answer with. Anything but a
/// literal `true` counts as failure.
pub(super) fn success_flag(body: &Value) -> bool {
    body.get("success").and_then(Value::as_bool).unwrap_or(false)
}

/// The `status` string of the update endpoints ("OK" on success).
pub(super) fn status_text(body: &Value) -> String {
    body.get("status")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// The server's free-form `error` text, empty when not supplied.
pub(super) fn error_text(body: &Value) -> String {
    body.get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
