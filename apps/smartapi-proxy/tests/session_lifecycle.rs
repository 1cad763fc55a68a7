//! Session Lifecycle Integration Tests
//!
//! Drives the public HTTP surface end to end with a stubbed provider:
//! login, replacement, logout, and the gated profile endpoint.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use smartapi_proxy::{
    AppState, AuthGate, Credentials, InstrumentResolver, LtpData, ProviderError, ProviderPort,
    ProviderSession, QuoteAggregator, Session, SessionHandle, SessionManager, SessionStore,
    router,
};

// =============================================================================
// Stub Provider
// =============================================================================

#[derive(Default)]
struct StubProvider {
    reject_login: Option<String>,
    fail_terminate: bool,
    terminations: AtomicUsize,
    logins: AtomicUsize,
}

#[async_trait]
impl ProviderPort for StubProvider {
    async fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> Result<ProviderSession, ProviderError> {
        if let Some(message) = &self.reject_login {
            return Err(ProviderError::Rejected(message.clone()));
        }
        let nth = self.logins.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ProviderSession {
            handle: SessionHandle::new(credentials.api_key.clone()),
            jwt_token: format!("J{nth}-{}", credentials.client_id),
            refresh_token: "R".to_string(),
            feed_token: "F".to_string(),
        })
    }

    async fn terminate(&self, _session: &Session) -> Result<(), ProviderError> {
        self.terminations.fetch_add(1, Ordering::SeqCst);
        if self.fail_terminate {
            return Err(ProviderError::Transport("timeout".to_string()));
        }
        Ok(())
    }

    async fn last_traded_price(
        &self,
        _session: &Session,
        _exchange: &str,
        _symbol: &str,
        _token: &str,
    ) -> Result<LtpData, ProviderError> {
        Err(ProviderError::Rejected("not under test".to_string()))
    }

    async fn profile(&self, session: &Session) -> Result<Value, ProviderError> {
        Ok(json!({
            "status": true,
            "data": {"clientcode": session.client_id.as_str(), "name": "Test Trader"}
        }))
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn build_app(provider: Arc<StubProvider>) -> (Router, Arc<SessionStore>) {
    let provider: Arc<dyn ProviderPort> = provider;
    let store = Arc::new(SessionStore::new());
    let state = Arc::new(AppState::new(
        "test-0.0.1".to_string(),
        Arc::clone(&store),
        SessionManager::new(Arc::clone(&store), Arc::clone(&provider)),
        AuthGate::new(Arc::clone(&store)),
        QuoteAggregator::new(InstrumentResolver::new(), Arc::clone(&provider)),
        provider,
    ));
    (router(state), store)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get(app: &Router, uri: &str, bearer: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn login_body(client: &str) -> Value {
    json!({"apiKey": "k", "clientId": client, "password": "p", "pin": "1234"})
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn login_returns_tokens_and_stores_session() {
    let (app, store) = build_app(Arc::new(StubProvider::default()));

    let (status, body) = post_json(&app, "/login", login_body("C1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["jwtToken"], "J1-C1");
    assert_eq!(body["refreshToken"], "R");
    assert_eq!(body["feedToken"], "F");
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn login_with_missing_fields_is_400() {
    let (app, store) = build_app(Arc::new(StubProvider::default()));

    let (status, body) = post_json(&app, "/login", json!({"apiKey": "k"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Missing required fields");
    assert!(store.is_empty());
}

#[tokio::test]
async fn rejected_login_is_401_with_provider_message() {
    let provider = Arc::new(StubProvider {
        reject_login: Some("Invalid totp".to_string()),
        ..StubProvider::default()
    });
    let (app, store) = build_app(provider);

    let (status, body) = post_json(&app, "/login", login_body("C1")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid totp");
    assert!(store.is_empty());
}

#[tokio::test]
async fn second_login_replaces_session_for_same_client() {
    let (app, store) = build_app(Arc::new(StubProvider::default()));

    post_json(&app, "/login", login_body("C1")).await;
    let (status, body) = post_json(&app, "/login", login_body("C1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jwtToken"], "J2-C1");
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn logins_for_distinct_clients_coexist() {
    let (app, store) = build_app(Arc::new(StubProvider::default()));

    post_json(&app, "/login", login_body("CLIENT1")).await;
    post_json(&app, "/login", login_body("CLIENT2")).await;

    assert_eq!(store.len(), 2);
}

// =============================================================================
// Logout
// =============================================================================

#[tokio::test]
async fn logout_removes_session_and_terminates_upstream() {
    let provider = Arc::new(StubProvider::default());
    let (app, store) = build_app(Arc::clone(&provider));

    post_json(&app, "/login", login_body("C1")).await;
    let (status, body) = post_json(&app, "/logout", json!({"clientId": "C1"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(store.is_empty());
    assert_eq!(provider.terminations.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn logout_without_session_is_404() {
    let (app, _store) = build_app(Arc::new(StubProvider::default()));

    let (status, body) = post_json(&app, "/logout", json!({"clientId": "C1"})).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "No active session found");
}

#[tokio::test]
async fn logout_cleans_local_state_when_upstream_termination_fails() {
    let provider = Arc::new(StubProvider {
        fail_terminate: true,
        ..StubProvider::default()
    });
    let (app, store) = build_app(Arc::clone(&provider));

    post_json(&app, "/login", login_body("C1")).await;
    let (status, body) = post_json(&app, "/logout", json!({"clientId": "C1"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(store.is_empty());
}

// =============================================================================
// Profile
// =============================================================================

#[tokio::test]
async fn profile_returns_opaque_provider_payload() {
    let (app, _store) = build_app(Arc::new(StubProvider::default()));

    post_json(&app, "/login", login_body("C1")).await;
    let (status, body) = get(&app, "/profile?clientId=C1", Some("J1-C1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["profile"]["data"]["name"], "Test Trader");
}

#[tokio::test]
async fn profile_without_bearer_is_401() {
    let (app, _store) = build_app(Arc::new(StubProvider::default()));

    post_json(&app, "/login", login_body("C1")).await;
    let (status, body) = get(&app, "/profile?clientId=C1", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing or invalid authorization");
}

#[tokio::test]
async fn profile_for_unknown_client_is_401() {
    let (app, _store) = build_app(Arc::new(StubProvider::default()));

    let (status, body) = get(&app, "/profile?clientId=GHOST", Some("token")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Not authenticated");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn health_reports_service_status() {
    let (app, _store) = build_app(Arc::new(StubProvider::default()));

    let (status, body) = get(&app, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "SmartAPI Session Proxy");
    assert_eq!(body["sessions"], 0);
}

#[tokio::test]
async fn healthz_liveness_probe_answers_ok() {
    let (app, _store) = build_app(Arc::new(StubProvider::default()));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn health_counts_live_sessions() {
    let (app, _store) = build_app(Arc::new(StubProvider::default()));

    post_json(&app, "/login", login_body("C1")).await;
    let (_, body) = get(&app, "/health", None).await;

    assert_eq!(body["sessions"], 1);
}
