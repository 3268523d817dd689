//! Credential probing against the server.

use reqwest::header::{ACCEPT, AUTHORIZATION};
use secrecy::SecretString;
use url::Url;

use super::AuthScheme;

/// Outcome of one probe attempt. Transient; nothing persists it.
#[derive(Clone, Copy, Debug)]
pub struct AuthDecision {
    pub scheme: AuthScheme,
    pub accepted: bool,
}

/// Tests an opaque credential against the server, one cheap read-only GET
/// per scheme, in the fixed [`AuthScheme::PROBE_ORDER`].
///
/// Probing against a side-effect-free endpoint before trusting a scheme
/// avoids sending wrong-format credentials at state-mutating endpoints.
pub struct CredentialProbe {
    http: reqwest::Client,
    probe_url: Url,
}

impl std::fmt::Debug for CredentialProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialProbe")
            .field("probe_url", &self.probe_url.as_str())
            .finish_non_exhaustive()
    }
}

impl CredentialProbe {
    /// Create a probe against the given endpoint. The endpoint must be
    /// idempotent and side-effect-free; each attempt is one real request.
    pub fn new(http: reqwest::Client, probe_url: Url) -> Self {
        Self { http, probe_url }
    }

    /// Try each scheme in order, short-circuiting on the first the server
    /// accepts. Returns `None` when no scheme is accepted.
    pub async fn probe(&self, credential: &SecretString) -> Option<AuthScheme> {
        for scheme in AuthScheme::PROBE_ORDER {
            let decision = self.attempt(scheme, credential).await;
            tracing::debug!(
                scheme = decision.scheme.name(),
                accepted = decision.accepted,
                "credential probe attempt"
            );
            if decision.accepted {
                return Some(decision.scheme);
            }
        }
        None
    }

    /// One probe attempt: one request, no retries, no backoff. A transport
    /// failure counts as a failure for this scheme only.
    pub async fn attempt(&self, scheme: AuthScheme, credential: &SecretString) -> AuthDecision {
        let response = self
            .http
            .get(self.probe_url.clone())
            .header(AUTHORIZATION, scheme.authorization_value(credential))
            .header(ACCEPT, "application/json")
            .send()
            .await;

        let accepted = match response {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        };

        AuthDecision { scheme, accepted }
    }
}
