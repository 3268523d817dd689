//! Gateway configuration.

use std::env;
use std::fmt;
use std::time::Duration;

use secrecy::SecretString;

use crate::{Error, Result};

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for the gateway.
///
/// The credential is one opaque string resolved by the caller (environment
/// variable, startup argument); which authorization scheme it works under is
/// discovered at first use, not configured.
#[derive(Clone)]
pub struct GatewayConfig {
    /// Base URL of the deployment-orchestration server.
    pub base_url: String,
    /// Opaque credential presented to the server.
    pub credential: SecretString,
    /// Per-request timeout applied to the HTTP client.
    pub timeout: Duration,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("credential", &"[redacted]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GatewayConfig {
    /// Create with a server URL and credential.
    pub fn new(base_url: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credential: SecretString::from(credential.into()),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Create from environment variables.
    ///
    /// Reads `DEPLOY_SERVER_URL`, `DEPLOY_SERVER_TOKEN`, and optionally
    /// `DEPLOY_REQUEST_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("DEPLOY_SERVER_URL")
            .map_err(|_| Error::config("DEPLOY_SERVER_URL is not set"))?;
        let credential = env::var("DEPLOY_SERVER_TOKEN")
            .map_err(|_| Error::config("DEPLOY_SERVER_TOKEN is not set"))?;

        if credential.is_empty() {
            return Err(Error::config("DEPLOY_SERVER_TOKEN is empty"));
        }

        let mut config = Self::new(base_url, credential);

        if let Some(timeout_ms) = env::var("DEPLOY_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout = Duration::from_millis(timeout_ms);
        }

        Ok(config)
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
