//! Public HTTP Surface
//!
//! axum server exposing the proxy's endpoints.
//!
//! # Endpoints
//!
//! - `GET /health` - Service status payload, no auth
//! - `GET /healthz` - Liveness probe (simple OK)
//! - `POST /login` - Establish and cache a provider session
//! - `POST /logout` - Tear down a cached session
//! - `GET /quotes` - Multi-symbol quote snapshot (bearer + clientId)
//! - `GET /profile` - Opaque provider profile (bearer + clientId)

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router, extract::Query, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{ProviderError, ProviderPort};
use crate::application::services::{
    AuthGate, AuthGateError, LoginError, LogoutError, QuoteAggregator, SessionManager,
};
use crate::domain::quote::{FetchOutcome, QuoteSnapshot};
use crate::domain::session::{ClientId, Credentials, SessionStore};

// =============================================================================
// Application State
// =============================================================================

/// Shared state behind every handler.
pub struct AppState {
    version: String,
    started_at: Instant,
    store: Arc<SessionStore>,
    session_manager: SessionManager,
    auth_gate: AuthGate,
    quote_aggregator: QuoteAggregator,
    provider: Arc<dyn ProviderPort>,
}

impl AppState {
    /// Assemble the application state.
    #[must_use]
    pub fn new(
        version: String,
        store: Arc<SessionStore>,
        session_manager: SessionManager,
        auth_gate: AuthGate,
        quote_aggregator: QuoteAggregator,
        provider: Arc<dyn ProviderPort>,
    ) -> Self {
        Self {
            version,
            started_at: Instant::now(),
            store,
            session_manager,
            auth_gate,
            quote_aggregator,
            provider,
        }
    }
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /login`. All fields optional at the parse layer so that
/// missing fields surface as a 400 with a message, not a parse rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoginRequest {
    /// Provider API key.
    pub api_key: Option<String>,
    /// Client identity.
    pub client_id: Option<String>,
    /// Account password.
    pub password: Option<String>,
    /// Trading PIN (MPIN).
    pub pin: Option<String>,
    /// Optional six-digit TOTP.
    pub totp_token: Option<String>,
}

/// Successful login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Always true here.
    pub success: bool,
    /// Provider JWT access token.
    pub jwt_token: String,
    /// Provider refresh token.
    pub refresh_token: String,
    /// Provider market feed token.
    pub feed_token: String,
    /// Human-readable confirmation.
    pub message: String,
}

/// Body of `POST /logout`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogoutRequest {
    /// Client identity whose session to tear down.
    pub client_id: Option<String>,
}

/// Query parameters of `GET /quotes`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuotesQuery {
    /// Client identity claiming a session.
    pub client_id: Option<String>,
    /// Comma-separated symbol list.
    pub symbols: Option<String>,
}

/// Response of `GET /quotes`.
#[derive(Debug, Serialize)]
pub struct QuotesResponse {
    /// Always true: fetch failures are per-symbol, not request-level.
    pub success: bool,
    /// Snapshots for the symbols that succeeded, in input order.
    pub quotes: Vec<QuoteSnapshot>,
    /// Number of snapshots returned.
    pub count: usize,
}

/// Query parameters of `GET /profile`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileQuery {
    /// Client identity claiming a session.
    pub client_id: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" when the service is up.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Proxy version.
    pub version: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Current time.
    pub timestamp: DateTime<Utc>,
    /// Number of live sessions.
    pub sessions: usize,
}

// =============================================================================
// Errors
// =============================================================================

/// Request-level errors, mapped to status codes and the response body
/// shapes the original surface used: session endpoints answer with
/// `{success:false, message}`, gated read endpoints with `{error}`.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiError {
    /// Missing or malformed request fields (400).
    #[error("{0}")]
    Validation(String),

    /// The provider rejected the supplied credentials (401).
    #[error("{0}")]
    Rejected(String),

    /// The authorization gate refused the request (401).
    #[error("{0}")]
    Unauthorized(String),

    /// No live session for the referenced client (404).
    #[error("{0}")]
    NotFound(String),

    /// Adapter failure on a session endpoint (500).
    #[error("{0}")]
    Upstream(String),

    /// Adapter or unexpected failure on a gated read endpoint (500).
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Validation(message) => (
                StatusCode::BAD_REQUEST,
                json!({"success": false, "message": message}),
            ),
            Self::Rejected(message) => (
                StatusCode::UNAUTHORIZED,
                json!({"success": false, "message": message}),
            ),
            Self::Unauthorized(message) => (StatusCode::UNAUTHORIZED, json!({"error": message})),
            Self::NotFound(message) => (
                StatusCode::NOT_FOUND,
                json!({"success": false, "message": message}),
            ),
            Self::Upstream(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"success": false, "message": message}),
            ),
            Self::Internal(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, json!({"error": message}))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<LoginError> for ApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::MissingFields => Self::Validation(error.to_string()),
            LoginError::Rejected(message) => Self::Rejected(message),
            LoginError::Upstream(message) => Self::Upstream(format!("Login error: {message}")),
        }
    }
}

impl From<LogoutError> for ApiError {
    fn from(error: LogoutError) -> Self {
        match error {
            LogoutError::NoSession => Self::NotFound(error.to_string()),
        }
    }
}

impl From<AuthGateError> for ApiError {
    fn from(error: AuthGateError) -> Self {
        Self::Unauthorized(error.to_string())
    }
}

impl From<ProviderError> for ApiError {
    fn from(error: ProviderError) -> Self {
        Self::Internal(error.to_string())
    }
}

// =============================================================================
// Router
// =============================================================================

/// Build the public router over the given state.
///
/// Public so integration tests can drive the surface without a socket.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/healthz", get(liveness_handler))
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/quotes", get(quotes_handler))
        .route("/profile", get(profile_handler))
        .with_state(state)
}

// =============================================================================
// HTTP Handlers
// =============================================================================

async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        service: "SmartAPI Session Proxy",
        version: state.version.clone(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        timestamp: Utc::now(),
        sessions: state.store.len(),
    })
}

async fn liveness_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let credentials = Credentials {
        api_key: request.api_key.unwrap_or_default(),
        client_id: ClientId::new(request.client_id.unwrap_or_default()),
        password: request.password.unwrap_or_default(),
        pin: request.pin.unwrap_or_default(),
        totp: request.totp_token.filter(|t| !t.is_empty()),
    };

    let session = state.session_manager.login(credentials).await?;

    Ok(Json(LoginResponse {
        success: true,
        jwt_token: session.jwt_token.clone(),
        refresh_token: session.refresh_token.clone(),
        feed_token: session.feed_token.clone(),
        message: "Login successful".to_string(),
    }))
}

async fn logout_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LogoutRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let client_id = request
        .client_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Validation("Missing required fields".to_string()))?;

    state.session_manager.logout(&ClientId::new(client_id)).await?;

    Ok(Json(
        json!({"success": true, "message": "Logged out successfully"}),
    ))
}

async fn quotes_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<QuotesQuery>,
    headers: HeaderMap,
) -> Result<Json<QuotesResponse>, ApiError> {
    let session = state
        .auth_gate
        .authorize(bearer_header(&headers), query.client_id.as_deref())?;

    let symbols: Vec<String> = query
        .symbols
        .unwrap_or_default()
        .split(',')
        .map(str::to_string)
        .collect();

    let outcomes = state.quote_aggregator.get_quotes(&session, &symbols).await;
    let quotes: Vec<QuoteSnapshot> = outcomes
        .into_iter()
        .filter_map(FetchOutcome::into_snapshot)
        .collect();
    let count = quotes.len();

    Ok(Json(QuotesResponse {
        success: true,
        quotes,
        count,
    }))
}

async fn profile_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProfileQuery>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state
        .auth_gate
        .authorize(bearer_header(&headers), query.client_id.as_deref())?;

    let profile = state.provider.profile(&session).await?;

    Ok(Json(json!({"success": true, "profile": profile})))
}

fn bearer_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

// =============================================================================
// Server
// =============================================================================

/// Public HTTP server.
pub struct ApiServer {
    port: u16,
    state: Arc<AppState>,
    cancel: CancellationToken,
}

impl ApiServer {
    /// Create a new server.
    #[must_use]
    pub const fn new(port: u16, state: Arc<AppState>, cancel: CancellationToken) -> Self {
        Self {
            port,
            state,
            cancel,
        }
    }

    /// Run the server until cancelled.
    ///
    /// # Errors
    ///
    /// Returns `ApiServerError` if binding fails or the HTTP server
    /// encounters a fatal error while running.
    pub async fn run(self) -> Result<(), ApiServerError> {
        let app = router(self.state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| ApiServerError::BindFailed(self.port, e.to_string()))?;

        tracing::info!(port = self.port, "HTTP server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(self.cancel.cancelled_owned())
            .await
            .map_err(|e| ApiServerError::ServerFailed(e.to_string()))?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// HTTP server errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiServerError {
    /// Failed to bind to port.
    #[error("failed to bind to port {0}: {1}")]
    BindFailed(u16, String),

    /// Server error.
    #[error("server error: {0}")]
    ServerFailed(String),
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_maps_to_400_with_flagged_body() {
        let response = ApiError::Validation("Missing required fields".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn gate_errors_map_to_401() {
        let rejected = ApiError::Rejected("Login failed".to_string()).into_response();
        assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);

        let unauthorized = ApiError::Unauthorized("Not authenticated".to_string()).into_response();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = ApiError::NotFound("No active session found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn adapter_failures_map_to_500() {
        let upstream = ApiError::Upstream("Login error: timeout".to_string()).into_response();
        assert_eq!(upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let internal = ApiError::Internal("boom".to_string()).into_response();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn login_request_parses_camel_case_fields() {
        let request: LoginRequest = serde_json::from_str(
            r#"{"apiKey":"k","clientId":"C1","password":"p","pin":"1234","totpToken":"000000"}"#,
        )
        .unwrap();
        assert_eq!(request.api_key.as_deref(), Some("k"));
        assert_eq!(request.client_id.as_deref(), Some("C1"));
        assert_eq!(request.totp_token.as_deref(), Some("000000"));
    }

    #[test]
    fn login_request_tolerates_missing_fields() {
        let request: LoginRequest = serde_json::from_str(r#"{"apiKey":"k"}"#).unwrap();
        assert!(request.client_id.is_none());
        assert!(request.pin.is_none());
    }
}
