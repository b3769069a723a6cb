//! Errors raised by the Dokploy HTTP client.

use thiserror::Error;

/// A failed call against the Dokploy API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The configured host is not a usable base URL.
    #[error("invalid Dokploy host '{0}'")]
    InvalidHost(String),

    /// The API key cannot be sent as an HTTP header value.
    #[error("API key contains characters that are not allowed in an HTTP header")]
    InvalidApiKey,

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    /// The request never produced an HTTP response.
    #[error("{procedure}: request failed: {source}")]
    Http {
        /// The API procedure being called.
        procedure: String,
        /// The transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("{procedure}: HTTP {status}: {message}")]
    Api {
        /// The API procedure being called.
        procedure: String,
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },

    /// The response body did not match the expected shape.
    #[error("{procedure}: failed to decode response: {source}")]
    Decode {
        /// The API procedure being called.
        procedure: String,
        /// The decoding error.
        #[source]
        source: serde_json::Error,
    },

    /// A field the provider relies on was absent from the response.
    #[error("{procedure}: response is missing '{field}'")]
    MissingField {
        /// The API procedure being called.
        procedure: String,
        /// The missing field.
        field: String,
    },

    /// A listing did not contain an entry with the expected name.
    #[error("{procedure}: no entry named '{name}'")]
    NoMatch {
        /// The listing procedure.
        procedure: String,
        /// The name searched for.
        name: String,
    },
}

impl ClientError {
    /// Whether the error means the requested object does not exist.
    ///
    /// The API does not use 404 consistently, so the message text is
    /// checked as well.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Api { status, message, .. } => {
                *status == 404 || message.to_ascii_lowercase().contains("not found")
            }
            _ => false,
        }
    }

    /// The HTTP status code, if the API answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> ClientError {
        ClientError::Api {
            procedure: "domain.one".to_string(),
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_not_found_detection() {
        assert!(api(404, "").is_not_found());
        assert!(api(400, "Domain not found").is_not_found());
        assert!(api(500, "SSH Key NOT FOUND").is_not_found());
        assert!(!api(500, "database is locked").is_not_found());
        assert!(!ClientError::InvalidHost("x".to_string()).is_not_found());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            api(401, "Unauthorized").to_string(),
            "domain.one: HTTP 401: Unauthorized"
        );
        assert_eq!(api(401, "Unauthorized").status(), Some(401));
    }
}
