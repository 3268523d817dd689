//! Credential negotiation for the deployment-orchestration server.
//!
//! The server accepts an opaque credential in one of three forms:
//! - **BearerToken**: the credential verbatim in a bearer authorization header
//! - **BasicEmbeddedToken**: HTTP Basic with the credential embedded as the
//!   password of a fixed well-known username
//! - **ExchangedBearerToken**: a short-lived access token obtained from an
//!   external token-exchange collaborator
//!
//! Which form a given credential works under is discovered once, by probing a
//! cheap read-only endpoint, and cached for the lifetime of the process. The
//! [`Authenticator`] owns that cached session and guarantees at most one
//! in-flight negotiation at a time.

mod authenticator;
mod exchange;
mod probe;
mod scheme;
mod session;

pub use authenticator::{AuthError, Authenticator};
pub use exchange::{ExchangeError, ExchangedToken, TokenExchange};
pub use probe::{AuthDecision, CredentialProbe};
pub use scheme::{AuthScheme, BASIC_SENTINEL_USERNAME};
pub use session::Session;
