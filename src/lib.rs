//! # deploy-gateway
//!
//! Tool-invocation gateway for driving a remote deployment-orchestration
//! server through a small set of named operations.
//!
//! Every operation is one HTTP call. The interesting part of this crate is
//! the credential negotiation core: given one opaque credential, it discovers
//! which authorization scheme the server accepts (bearer header, or HTTP
//! Basic with the token embedded as the password of a fixed username),
//! caches that decision for the process lifetime, and re-negotiates when a
//! session-style credential expires.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use deploy_gateway::{ApiClient, GatewayConfig};
//! use reqwest::Method;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), deploy_gateway::Error> {
//!     let config = GatewayConfig::from_env()?;
//!     let client = ApiClient::new(config)?;
//!
//!     let targets = client.call("/api/targets", Method::GET, None).await?;
//!     println!("{}", serde_json::to_string_pretty(&targets)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Tool layer
//!
//! The [`tools`] module exposes one handler per operation (deploy, snapshot,
//! inventory, schedule, compare, trigger) behind a uniform [`tools::Tool`]
//! trait, ready to be registered with an agent runtime:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use deploy_gateway::{ApiClient, GatewayConfig};
//! use deploy_gateway::tools::ToolRegistry;
//!
//! # async fn run() -> Result<(), deploy_gateway::Error> {
//! let client = Arc::new(ApiClient::new(GatewayConfig::from_env()?)?);
//! let registry = ToolRegistry::with_builtin(client);
//!
//! for definition in registry.definitions() {
//!     println!("{}: {}", definition.name, definition.description);
//! }
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod auth;
pub mod client;
pub mod config;
pub mod tools;

// Re-exports for convenience
pub use auth::{
    AuthDecision, AuthError, AuthScheme, Authenticator, CredentialProbe, ExchangeError,
    ExchangedToken, Session, TokenExchange,
};
pub use client::{ApiClient, ApiError, ApiErrorKind, routes};
pub use config::GatewayConfig;
pub use tools::{Tool, ToolDefinition, ToolRegistry, ToolResult};

/// Error type for gateway operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Credential negotiation failed.
    #[error("authentication failed: {0}")]
    Auth(#[from] auth::AuthError),

    /// An API call failed after negotiation.
    #[error(transparent)]
    Api(#[from] client::ApiError),

    /// Invalid or missing configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Server base URL could not be parsed or joined.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP client construction failed.
    #[error("network setup failed: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
