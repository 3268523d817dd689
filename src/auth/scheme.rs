//! Authorization schemes.

use base64::prelude::*;
use secrecy::{ExposeSecret, SecretString};

/// Fixed username the server pairs with an embedded token in HTTP Basic form.
pub const BASIC_SENTINEL_USERNAME: &str = "deploy-token";

/// A specific way of presenting a credential over HTTP.
///
/// Exactly one scheme is active at a time once negotiation succeeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthScheme {
    /// Credential sent verbatim as a bearer authorization value.
    BearerToken,
    /// Credential embedded as the password of [`BASIC_SENTINEL_USERNAME`].
    BasicEmbeddedToken,
    /// Short-lived bearer token obtained through token exchange.
    ExchangedBearerToken,
}

impl AuthScheme {
    /// Probe order is a contract: bearer before basic, always. Exchanged
    /// tokens are never probed.
    pub const PROBE_ORDER: [AuthScheme; 2] =
        [AuthScheme::BearerToken, AuthScheme::BasicEmbeddedToken];

    /// Render the `Authorization` header value for a token under this scheme.
    pub fn authorization_value(&self, token: &SecretString) -> String {
        match self {
            AuthScheme::BearerToken | AuthScheme::ExchangedBearerToken => {
                format!("Bearer {}", token.expose_secret())
            }
            AuthScheme::BasicEmbeddedToken => {
                let pair = format!("{}:{}", BASIC_SENTINEL_USERNAME, token.expose_secret());
                format!("Basic {}", BASE64_STANDARD.encode(pair))
            }
        }
    }

    /// Scheme name for logging. Header values are never logged.
    pub fn name(&self) -> &'static str {
        match self {
            AuthScheme::BearerToken => "bearer",
            AuthScheme::BasicEmbeddedToken => "basic_embedded",
            AuthScheme::ExchangedBearerToken => "exchanged_bearer",
        }
    }
}
