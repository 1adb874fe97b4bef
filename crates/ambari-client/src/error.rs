//! Error types for the Ambari client.
//!
//! Every operation, read or write, reports failure through [`ClientError`].

use ambari_core::{CoreError, NameError, ServiceName};
use thiserror::Error;

/// A result type using `ClientError`.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to the Ambari server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered 404 for the requested resource.
    #[error("resource not found: {resource}")]
    NotFound {
        /// Path of the missing resource.
        resource: String,
    },

    /// The server answered with any other non-success status.
    #[error("Ambari returned {status}: {message}")]
    Remote {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body, or the status reason.
        message: String,
    },

    /// A located resource did not carry an `href` link.
    #[error("resource {resource} has no href link")]
    MissingLink {
        /// Path of the resource that was located.
        resource: String,
    },

    /// The service catalog has no component list for the service.
    #[error("no components configured for service {0}")]
    UnknownService(ServiceName),

    /// A configuration or catalog file could not be read.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request could not be sent or timed out.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A success response did not have the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Local validation failed before a request was sent.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<NameError> for ClientError {
    fn from(err: NameError) -> Self {
        Self::Core(CoreError::InvalidName(err))
    }
}

impl ClientError {
    /// Returns the HTTP status reported by the server, if any.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound { .. } => Some(404),
            Self::Remote { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true if the error means the resource does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if repeating an idempotent request might succeed.
    #[must_use]
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Remote { status, .. } => *status >= 500,
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
