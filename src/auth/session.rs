//! Negotiated session state.

use std::fmt;

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use super::AuthScheme;

/// The authenticator's cached, currently-active scheme plus the effective
/// token to present and an optional expiry.
///
/// The token differs from the configured credential only when
/// [`AuthScheme::ExchangedBearerToken`] is active. A session without an
/// expiry is never proactively re-validated.
#[derive(Clone)]
pub struct Session {
    scheme: AuthScheme,
    token: SecretString,
    expires_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("scheme", &self.scheme.name())
            .field("token", &"[redacted]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl Session {
    pub fn new(scheme: AuthScheme, token: SecretString, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            scheme,
            token,
            expires_at,
        }
    }

    /// The active scheme.
    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }

    /// Expiry instant, absent for schemes that never expire.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Whether the session has passed its expiry.
    ///
    /// Renegotiation happens exactly when the current time passes the expiry,
    /// never earlier.
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|exp| Utc::now() >= exp).unwrap_or(false)
    }

    /// Render the `Authorization` header value for this session.
    pub fn authorization_value(&self) -> String {
        self.scheme.authorization_value(&self.token)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn token() -> SecretString {
        SecretString::from("tok-abc")
    }

    #[test]
    fn test_no_expiry_never_expires() {
        let session = Session::new(AuthScheme::BearerToken, token(), None);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let session = Session::new(
            AuthScheme::ExchangedBearerToken,
            token(),
            Some(Utc::now() - Duration::seconds(1)),
        );
        assert!(session.is_expired());
    }

    #[test]
    fn test_future_expiry_is_live() {
        let session = Session::new(
            AuthScheme::ExchangedBearerToken,
            token(),
            Some(Utc::now() + Duration::hours(1)),
        );
        assert!(!session.is_expired());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::new(AuthScheme::BearerToken, token(), None);
        let rendered = format!("{:?}", session);
        assert!(!rendered.contains("tok-abc"));
    }
}
