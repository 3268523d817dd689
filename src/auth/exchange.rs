//! Token-exchange collaborator contract.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;

/// Access token returned by an exchange collaborator.
pub struct ExchangedToken {
    /// Token to present as a bearer authorization value.
    pub access_token: SecretString,
    /// Expiry, when the issuer supplied one.
    pub expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for ExchangedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangedToken")
            .field("access_token", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Exchange failure as reported by the collaborator.
#[derive(Clone, Debug)]
pub struct ExchangeError {
    /// Machine-readable error code.
    pub error: String,
    /// Optional human-readable detail.
    pub description: Option<String>,
}

impl ExchangeError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(description) = &self.description {
            write!(f, ": {}", description)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExchangeError {}

/// External collaborator that exchanges a long-lived identity token for a
/// short-lived access token.
///
/// The authenticator treats implementations as black boxes: when one is
/// configured, negotiation never probes the server, and an exchange failure
/// is fatal with no fallback scheme. A token meant for exchange is not valid
/// in any other form.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Obtain an access token, or report why one could not be issued.
    async fn get_access_token(&self) -> Result<ExchangedToken, ExchangeError>;
}
