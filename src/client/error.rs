//! API client error types.

use thiserror::Error;

use crate::auth::AuthError;

/// Failure classification for [`ApiClient::call`](crate::ApiClient::call).
///
/// Every outcome of a call is exactly one of these kinds; nothing is
/// swallowed, and the domain layer can present a specific message per kind.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credential negotiation failed; propagated unchanged.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Transport-level failure: no response was received (DNS, connection
    /// refused, timeout, cancellation).
    #[error("network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The server responded with a non-2xx status. The body is not assumed
    /// to be parseable.
    #[error("server returned HTTP {status} {status_text}")]
    Http { status: u16, status_text: String },

    /// The server responded 2xx but the body was not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Discriminant for [`ApiError`], for logging and dispatch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiErrorKind {
    Auth,
    Network,
    Http,
    Decode,
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Auth(_) => ApiErrorKind::Auth,
            ApiError::Network(_) => ApiErrorKind::Network,
            ApiError::Http { .. } => ApiErrorKind::Http,
            ApiError::Decode(_) => ApiErrorKind::Decode,
        }
    }

    /// HTTP status for [`ApiError::Http`], `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
