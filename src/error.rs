//! Error types for the Dokploy provider.

use thiserror::Error;

use crate::client::ClientError;

/// Errors that can occur while serving a provider operation.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The requested resource was not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A validation error occurred.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An internal provider error occurred.
    #[error("Provider error: {0}")]
    Sdk(String),

    /// The provider is not configured, or its configuration is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested resource or data source type is unknown.
    #[error("Unknown resource type: {0}")]
    UnknownResource(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The Dokploy API returned a response the provider could not use.
    #[error("API error: {0}")]
    Api(String),

    /// Resource already exists (create conflict).
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    /// Permission denied (authentication/authorization failure).
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Quota or rate limit exceeded.
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Service temporarily unavailable.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Operation timed out.
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// Operation not supported by the resource type.
    #[error("Unimplemented: {0}")]
    Unimplemented(String),

    /// The request was rejected by the API.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ProviderError {
    /// Get the error message without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(msg)
            | Self::Validation(msg)
            | Self::Sdk(msg)
            | Self::Configuration(msg)
            | Self::UnknownResource(msg)
            | Self::Api(msg)
            | Self::AlreadyExists(msg)
            | Self::PermissionDenied(msg)
            | Self::ResourceExhausted(msg)
            | Self::Unavailable(msg)
            | Self::DeadlineExceeded(msg)
            | Self::Unimplemented(msg)
            | Self::InvalidRequest(msg) => msg,
            Self::Serialization(_) => "serialization error (see Debug output)",
        }
    }

    /// Whether this error means the remote object no longer exists.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<ClientError> for ProviderError {
    fn from(err: ClientError) -> Self {
        if err.is_not_found() {
            return Self::NotFound(err.to_string());
        }
        match &err {
            ClientError::Api { status, .. } => match *status {
                401 | 403 => Self::PermissionDenied(err.to_string()),
                409 => Self::AlreadyExists(err.to_string()),
                429 => Self::ResourceExhausted(err.to_string()),
                400 | 422 => Self::InvalidRequest(err.to_string()),
                s if s >= 500 => Self::Unavailable(err.to_string()),
                _ => Self::Api(err.to_string()),
            },
            ClientError::Http { source, .. } if source.is_timeout() => {
                Self::DeadlineExceeded(err.to_string())
            }
            ClientError::Http { .. } => Self::Unavailable(err.to_string()),
            ClientError::Decode { .. }
            | ClientError::MissingField { .. }
            | ClientError::NoMatch { .. } => {
                Self::Api(err.to_string())
            }
            ClientError::InvalidHost(_) | ClientError::InvalidApiKey | ClientError::Build(_) => {
                Self::Configuration(err.to_string())
            }
        }
    }
}

impl From<ProviderError> for tonic::Status {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::NotFound(msg) => tonic::Status::not_found(msg),
            ProviderError::Validation(msg) => tonic::Status::invalid_argument(msg),
            ProviderError::Configuration(msg) => tonic::Status::failed_precondition(msg),
            ProviderError::UnknownResource(msg) => tonic::Status::not_found(msg),
            ProviderError::Sdk(msg) => tonic::Status::internal(msg),
            ProviderError::Api(msg) => tonic::Status::unknown(msg),
            ProviderError::Serialization(err) => {
                tonic::Status::invalid_argument(format!("Serialization error: {}", err))
            }
            ProviderError::AlreadyExists(msg) => tonic::Status::already_exists(msg),
            ProviderError::PermissionDenied(msg) => tonic::Status::permission_denied(msg),
            ProviderError::ResourceExhausted(msg) => tonic::Status::resource_exhausted(msg),
            ProviderError::Unavailable(msg) => tonic::Status::unavailable(msg),
            ProviderError::DeadlineExceeded(msg) => tonic::Status::deadline_exceeded(msg),
            ProviderError::Unimplemented(msg) => tonic::Status::unimplemented(msg),
            ProviderError::InvalidRequest(msg) => tonic::Status::invalid_argument(msg),
        }
    }
}
