//! Gateway Core Tests
//!
//! Tests for the credential negotiation core and the API client choke point:
//! probe ordering, session caching, single-flight negotiation, token
//! exchange, and call() failure classification.
//!
//! Run: cargo test --test gateway_core_tests

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use deploy_gateway::{
    ApiClient, AuthError, AuthScheme, ExchangeError, ExchangedToken, GatewayConfig, TokenExchange,
};
use secrecy::SecretString;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CREDENTIAL: &str = "tok-opaque-credential";

fn bearer_value() -> String {
    AuthScheme::BearerToken.authorization_value(&SecretString::from(CREDENTIAL))
}

fn basic_value() -> String {
    AuthScheme::BasicEmbeddedToken.authorization_value(&SecretString::from(CREDENTIAL))
}

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(GatewayConfig::new(server.uri(), CREDENTIAL)).unwrap()
}

/// 401 for any request that no more specific mock claims.
async fn mount_reject_all(server: &MockServer) {
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .with_priority(10)
        .mount(server)
        .await;
}

struct StubExchange {
    calls: AtomicUsize,
    outcome: Result<(), ExchangeError>,
}

impl StubExchange {
    fn succeeding() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome: Ok(()),
        })
    }

    fn failing(error: ExchangeError) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            outcome: Err(error),
        })
    }
}

#[async_trait]
impl TokenExchange for StubExchange {
    async fn get_access_token(&self) -> Result<ExchangedToken, ExchangeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Ok(()) => Ok(ExchangedToken {
                access_token: SecretString::from("at-short-lived"),
                expires_at: Some(Utc::now() + chrono::Duration::hours(1)),
            }),
            Err(e) => Err(e.clone()),
        }
    }
}

// =============================================================================
// Negotiation
// =============================================================================

mod negotiation_tests {
    use super::*;

    #[tokio::test]
    async fn test_bearer_accepted_short_circuits() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(header("authorization", bearer_value()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;
        mount_reject_all(&server).await;

        let client = client_for(&server);
        let session = client.authenticator().ensure_session().await.unwrap();

        assert_eq!(session.scheme(), AuthScheme::BearerToken);
        assert!(session.expires_at().is_none());

        // One probe attempt, never a Basic one.
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
    }

    #[tokio::test]
    async fn test_bearer_rejected_falls_back_to_basic() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(header("authorization", basic_value()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;
        mount_reject_all(&server).await;

        let client = client_for(&server);
        let session = client.authenticator().ensure_session().await.unwrap();

        assert_eq!(session.scheme(), AuthScheme::BasicEmbeddedToken);

        // Bearer first, Basic second; the order is a contract.
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        let first = requests[0].headers.get("authorization").unwrap().to_str().unwrap();
        let second = requests[1].headers.get("authorization").unwrap().to_str().unwrap();
        assert!(first.starts_with("Bearer "));
        assert!(second.starts_with("Basic "));
    }

    #[tokio::test]
    async fn test_both_schemes_rejected_fails_after_two_attempts() {
        let server = MockServer::start().await;
        mount_reject_all(&server).await;

        let client = client_for(&server);
        let err = client.authenticator().ensure_session().await.unwrap_err();

        assert!(matches!(err, AuthError::NoSchemeAccepted));
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
        assert!(client.authenticator().current_scheme().is_none());
    }

    #[tokio::test]
    async fn test_negotiation_is_idempotent_before_expiry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(header("authorization", bearer_value()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;
        mount_reject_all(&server).await;

        let client = client_for(&server);
        client.authenticator().ensure_session().await.unwrap();
        client.authenticator().ensure_session().await.unwrap();

        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_coalesce_onto_one_probe() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(header("authorization", bearer_value()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({}))
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;
        mount_reject_all(&server).await;

        let client = Arc::new(client_for(&server));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let client = client.clone();
            handles.push(tokio::spawn(async move {
                client.authenticator().ensure_session().await
            }));
        }

        for handle in handles {
            let session = handle.await.unwrap().unwrap();
            assert_eq!(session.scheme(), AuthScheme::BearerToken);
        }
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_observe_the_same_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_delay(Duration::from_millis(200)))
            .mount(&server)
            .await;

        let client = Arc::new(client_for(&server));
        let mut handles = Vec::new();
        for _ in 0..4 {
            let client = client.clone();
            handles.push(tokio::spawn(async move {
                client.authenticator().ensure_session().await
            }));
        }

        for handle in handles {
            let err = handle.await.unwrap().unwrap_err();
            assert!(matches!(err, AuthError::NoSchemeAccepted));
        }
        // One negotiation: Bearer then Basic, nothing more.
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }
}

// =============================================================================
// Token exchange
// =============================================================================

mod exchange_tests {
    use super::*;

    #[tokio::test]
    async fn test_exchange_suppresses_the_probe() {
        let server = MockServer::start().await;
        mount_reject_all(&server).await;

        let exchange = StubExchange::succeeding();
        let client = ApiClient::with_exchange(
            GatewayConfig::new(server.uri(), CREDENTIAL),
            exchange.clone(),
        )
        .unwrap();

        let session = client.authenticator().ensure_session().await.unwrap();
        assert_eq!(session.scheme(), AuthScheme::ExchangedBearerToken);
        assert!(session.expires_at().is_some());
        assert_eq!(exchange.calls.load(Ordering::SeqCst), 1);

        // The server never saw a probe.
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exchange_failure_is_fatal_with_no_fallback() {
        let server = MockServer::start().await;
        mount_reject_all(&server).await;

        let exchange = StubExchange::failing(
            ExchangeError::new("invalid_grant").with_description("identity token rejected"),
        );
        let client = ApiClient::with_exchange(
            GatewayConfig::new(server.uri(), CREDENTIAL),
            exchange.clone(),
        )
        .unwrap();

        let err = client.authenticator().ensure_session().await.unwrap_err();
        match err {
            AuthError::Exchange(e) => {
                assert_eq!(e.error, "invalid_grant");
                assert_eq!(e.description.as_deref(), Some("identity token rejected"));
            }
            other => panic!("expected exchange failure, got {other:?}"),
        }
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

// =============================================================================
// call() classification
// =============================================================================

mod client_tests {
    use super::*;
    use deploy_gateway::ApiErrorKind;
    use reqwest::Method;
    use wiremock::matchers::body_json;

    /// Probe accepts Bearer; everything else on `/api` is rejected.
    async fn mount_bearer_probe(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(header("authorization", bearer_value()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_call_uses_the_negotiated_basic_header() {
        let server = MockServer::start().await;
        // Bearer is rejected everywhere; Basic wins the probe.
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(header("authorization", basic_value()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/x"))
            .and(header("authorization", basic_value()))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})),
            )
            .mount(&server)
            .await;
        mount_reject_all(&server).await;

        let client = client_for(&server);
        let response = client.call("/x", Method::GET, None).await.unwrap();
        assert_eq!(response["ok"], serde_json::json!(true));
    }

    #[tokio::test]
    async fn test_call_classifies_http_failure() {
        let server = MockServer::start().await;
        mount_bearer_probe(&server).await;
        Mock::given(method("GET"))
            .and(path("/x"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.call("/x", Method::GET, None).await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Http);
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_call_classifies_decode_failure() {
        let server = MockServer::start().await;
        mount_bearer_probe(&server).await;
        Mock::given(method("GET"))
            .and(path("/x"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client.call("/x", Method::GET, None).await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_call_classifies_network_failure() {
        let server = MockServer::start().await;
        mount_bearer_probe(&server).await;

        let client = client_for(&server);
        client.authenticator().ensure_session().await.unwrap();

        // Shut the server down; the cached session stays valid, so the next
        // call reaches the transport and fails there.
        drop(server);

        let err = client.call("/x", Method::GET, None).await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Network);
    }

    #[tokio::test]
    async fn test_call_propagates_auth_failure_without_touching_the_endpoint() {
        let server = MockServer::start().await;
        mount_reject_all(&server).await;

        let client = client_for(&server);
        let err = client.call("/x", Method::GET, None).await.unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Auth);

        // Two probe attempts and nothing else; /x was never requested.
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.url.path() == "/api"));
    }

    #[tokio::test]
    async fn test_post_carries_json_body() {
        let server = MockServer::start().await;
        mount_bearer_probe(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/deployments"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({"project": "billing"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "dep-1"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .call(
                "/api/deployments",
                Method::POST,
                Some(serde_json::json!({"project": "billing"})),
            )
            .await
            .unwrap();
        assert_eq!(response["id"], serde_json::json!("dep-1"));
    }

    #[tokio::test]
    async fn test_body_is_omitted_for_non_payload_methods() {
        let server = MockServer::start().await;
        mount_bearer_probe(&server).await;
        Mock::given(method("GET"))
            .and(path("/x"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        client
            .call("/x", Method::GET, Some(serde_json::json!({"ignored": true})))
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        let get_request = requests.iter().find(|r| r.url.path() == "/x").unwrap();
        assert!(get_request.body.is_empty());
    }
}
