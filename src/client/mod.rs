//! API client: the single choke point for every outbound request.

mod error;
pub mod routes;

pub use error::{ApiError, ApiErrorKind};

use std::sync::Arc;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use url::Url;

use crate::auth::{Authenticator, CredentialProbe, TokenExchange};
use crate::config::GatewayConfig;
use crate::{Error, Result};

/// Issues authorized requests against the orchestration server.
///
/// Every domain operation funnels through [`call`](ApiClient::call): the
/// authenticator supplies the active session lazily, the correct
/// authorization header is attached, and every failure mode is classified
/// into one [`ApiError`] kind. No endpoint-specific logic, no retries, no
/// response caching; every call is a fresh round trip guarded only by the
/// authenticator's session cache.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Arc<Authenticator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("auth", &self.auth)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client that negotiates the scheme by probing the server.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// Create a client whose credential is exchanged for a short-lived
    /// access token instead of being presented directly.
    pub fn with_exchange(config: GatewayConfig, exchange: Arc<dyn TokenExchange>) -> Result<Self> {
        Self::build(config, Some(exchange))
    }

    fn build(config: GatewayConfig, exchange: Option<Arc<dyn TokenExchange>>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(Error::Network)?;

        let base_url = Url::parse(&config.base_url)?;
        let probe_url = base_url.join(routes::ROOT)?;
        let probe = CredentialProbe::new(http.clone(), probe_url);

        let mut auth = Authenticator::new(config.credential, probe);
        if let Some(exchange) = exchange {
            auth = auth.with_exchange(exchange);
        }

        Ok(Self {
            http,
            base_url,
            auth: Arc::new(auth),
        })
    }

    /// The authenticator owning this client's session.
    pub fn authenticator(&self) -> &Arc<Authenticator> {
        &self.auth
    }

    /// Issue one request and return the parsed JSON response.
    ///
    /// The body is serialized only for payload-carrying methods
    /// (POST/PUT/PATCH) and omitted entirely otherwise.
    pub async fn call(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<serde_json::Value>,
    ) -> std::result::Result<serde_json::Value, ApiError> {
        let session = self.auth.ensure_session().await?;

        tracing::debug!(%method, endpoint, scheme = session.scheme().name(), "api call");

        let mut request = self
            .http
            .request(method.clone(), self.endpoint_url(endpoint))
            .header(AUTHORIZATION, session.authorization_value())
            .header(ACCEPT, "application/json");

        if let Some(body) = body.filter(|_| carries_payload(&method)) {
            request = request.json(&body);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}{endpoint}")
    }
}

fn carries_payload(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}
