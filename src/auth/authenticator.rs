//! Session ownership and negotiation.

use std::fmt;
use std::sync::{Arc, Mutex};

use secrecy::SecretString;
use tokio::sync::watch;

use super::{AuthScheme, CredentialProbe, Session, TokenExchange};

/// Negotiation failure.
///
/// Fatal for the calling request and never retried automatically: repeating
/// an already-failed credential check wastes a remote call and cannot succeed
/// without new input.
#[derive(Clone, Debug, thiserror::Error)]
pub enum AuthError {
    /// Neither probed scheme was accepted by the server.
    #[error("no authentication scheme accepted the credential")]
    NoSchemeAccepted,

    /// The token-exchange collaborator reported a failure.
    #[error("token exchange failed: {0}")]
    Exchange(#[from] super::ExchangeError),

    /// The in-flight negotiation this caller was waiting on went away
    /// without producing a result.
    #[error("credential negotiation was interrupted")]
    Interrupted,
}

type NegotiationOutcome = Result<Session, AuthError>;

/// Explicit authentication state. Distinguishes "never authenticated" from
/// "authenticated with a non-expiring scheme".
enum AuthState {
    Unauthenticated,
    Negotiating(watch::Receiver<Option<NegotiationOutcome>>),
    Authenticated(Session),
}

enum Role {
    Leader(watch::Sender<Option<NegotiationOutcome>>),
    Follower(watch::Receiver<Option<NegotiationOutcome>>),
}

/// Owns the session and runs credential negotiation.
///
/// Negotiation happens lazily on first use, re-runs when a session-style
/// token passes its expiry, and is idempotent in between: repeated
/// [`ensure_session`](Authenticator::ensure_session) calls before expiry
/// perform no network traffic.
///
/// At most one negotiation is in flight at a time. Concurrent callers that
/// observe an absent or expired session coalesce onto the single attempt and
/// all receive its outcome, success or failure alike.
pub struct Authenticator {
    credential: SecretString,
    probe: CredentialProbe,
    exchange: Option<Arc<dyn TokenExchange>>,
    state: Mutex<AuthState>,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("credential", &"[redacted]")
            .field("probe", &self.probe)
            .field("exchange_configured", &self.exchange.is_some())
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Create an authenticator that discovers the scheme by probing.
    pub fn new(credential: SecretString, probe: CredentialProbe) -> Self {
        Self {
            credential,
            probe,
            exchange: None,
            state: Mutex::new(AuthState::Unauthenticated),
        }
    }

    /// Configure a token-exchange collaborator.
    ///
    /// With an exchanger present the probe is never run: a token meant for
    /// exchange is not valid in any other form, so exchange failure installs
    /// no fallback scheme.
    pub fn with_exchange(mut self, exchange: Arc<dyn TokenExchange>) -> Self {
        self.exchange = Some(exchange);
        self
    }

    /// The currently active scheme, if negotiation has succeeded.
    pub fn current_scheme(&self) -> Option<AuthScheme> {
        match &*self.state.lock().expect("auth state lock poisoned") {
            AuthState::Authenticated(session) => Some(session.scheme()),
            _ => None,
        }
    }

    /// Drop the cached session so the next call renegotiates.
    ///
    /// An in-flight negotiation is left untouched.
    pub fn invalidate(&self) {
        let mut state = self.state.lock().expect("auth state lock poisoned");
        if matches!(&*state, AuthState::Authenticated(_)) {
            *state = AuthState::Unauthenticated;
        }
    }

    /// Return the live session, negotiating first if none is cached or the
    /// cached one has expired.
    pub async fn ensure_session(&self) -> Result<Session, AuthError> {
        let role = {
            let mut state = self.state.lock().expect("auth state lock poisoned");
            match &*state {
                AuthState::Authenticated(session) if !session.is_expired() => {
                    return Ok(session.clone());
                }
                AuthState::Negotiating(rx) => Role::Follower(rx.clone()),
                _ => {
                    let (tx, rx) = watch::channel(None);
                    *state = AuthState::Negotiating(rx);
                    Role::Leader(tx)
                }
            }
        };

        match role {
            Role::Leader(tx) => {
                let outcome = self.negotiate().await;
                {
                    let mut state = self.state.lock().expect("auth state lock poisoned");
                    *state = match &outcome {
                        Ok(session) => AuthState::Authenticated(session.clone()),
                        Err(_) => AuthState::Unauthenticated,
                    };
                }
                // Followers may all have gone away; that is fine.
                let _ = tx.send(Some(outcome.clone()));
                outcome
            }
            Role::Follower(mut rx) => loop {
                if let Some(outcome) = rx.borrow_and_update().clone() {
                    return outcome;
                }
                if rx.changed().await.is_err() {
                    self.clear_stale_negotiation(&rx);
                    return Err(AuthError::Interrupted);
                }
            },
        }
    }

    /// The leader vanished without publishing an outcome (dropped mid-await).
    /// Reset the state so a later caller can negotiate afresh, but only if it
    /// still refers to that same dead negotiation.
    fn clear_stale_negotiation(&self, rx: &watch::Receiver<Option<NegotiationOutcome>>) {
        let mut state = self.state.lock().expect("auth state lock poisoned");
        if let AuthState::Negotiating(current) = &*state
            && current.same_channel(rx)
        {
            *state = AuthState::Unauthenticated;
        }
    }

    async fn negotiate(&self) -> NegotiationOutcome {
        if let Some(exchange) = &self.exchange {
            tracing::debug!("negotiating via token exchange");
            let token = exchange.get_access_token().await.map_err(|e| {
                tracing::warn!(error = %e.error, "token exchange failed");
                AuthError::from(e)
            })?;
            let session = Session::new(
                AuthScheme::ExchangedBearerToken,
                token.access_token,
                token.expires_at,
            );
            tracing::debug!(scheme = session.scheme().name(), "negotiation succeeded");
            return Ok(session);
        }

        match self.probe.probe(&self.credential).await {
            Some(scheme) => {
                tracing::debug!(scheme = scheme.name(), "negotiation succeeded");
                Ok(Session::new(scheme, self.credential.clone(), None))
            }
            None => {
                tracing::warn!("negotiation failed: no scheme accepted");
                Err(AuthError::NoSchemeAccepted)
            }
        }
    }
}
