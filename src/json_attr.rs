//! String attributes that carry a JSON document.
//!
//! Docker Swarm settings (health check, restart policy, placement, ...) are
//! free-form objects on the platform side. They are configured as JSON text,
//! sent as structured JSON, and rendered back as text on read. When the
//! remote value is semantically equal to the configured text, the configured
//! text is kept so formatting differences never show up as a diff.

use serde_json::Value;

use crate::error::ProviderError;

/// Parse a configured JSON string for sending to the API.
pub fn parse(attribute: &str, text: Option<&str>) -> Result<Option<Value>, ProviderError> {
    match text {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => serde_json::from_str(text).map(Some).map_err(|e| {
            ProviderError::Validation(format!("{} is not valid JSON: {}", attribute, e))
        }),
    }
}

/// Render a remote value as attribute text, preferring `prior` when it
/// describes the same document.
pub fn render(remote: Option<&Value>, prior: Option<&str>) -> Option<String> {
    let remote = match remote? {
        Value::Null => return None,
        // Some rows store the document as a string.
        Value::String(s) => serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.clone())),
        other => other.clone(),
    };

    if let Some(prior) = prior {
        if serde_json::from_str::<Value>(prior).ok().as_ref() == Some(&remote) {
            return Some(prior.to_string());
        }
    }
    serde_json::to_string(&remote).ok()
}
