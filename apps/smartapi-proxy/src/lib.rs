#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access
    )
)]

//! SmartAPI Session Proxy
//!
//! An HTTP proxy service that brokers authenticated access to the Angel One
//! SmartAPI on behalf of multiple end-clients. The proxy caches one provider
//! session per client identity and re-exposes quote retrieval, profile
//! retrieval, and session teardown over the cached session, so callers never
//! hold provider credentials beyond the initial login call.
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Core types with no I/O
//!   - `session`: client identities, sessions, and the session store
//!   - `quote`: quote snapshots and per-symbol fetch outcomes
//!   - `instrument`: symbol to instrument-token resolution
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: interface to the upstream provider
//!   - `services`: session lifecycle, authorization gate, quote aggregation
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `smartapi`: reqwest adapter for the SmartAPI REST protocol
//!   - `http`: axum server for the public surface
//!   - `config`: environment-driven configuration
//!   - `telemetry`: tracing initialization
//!
//! # Data Flow
//!
//! ```text
//! Client ──► HTTP surface ──► Auth Gate ──► Session Manager ──► SmartAPI
//!                                      └──► Quote Aggregator ──► adapter
//!                                               │
//!                                        Instrument Resolver
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Core session and quote types with no I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::instrument::{InstrumentResolver, UNKNOWN_TOKEN};
pub use domain::quote::{FetchOutcome, QuoteSnapshot};
pub use domain::session::{ClientId, Credentials, Session, SessionHandle, SessionStore};

// Application ports and services
pub use application::ports::{LtpData, ProviderError, ProviderPort, ProviderSession};
pub use application::services::{
    AuthGate, AuthGateError, LoginError, LogoutError, QuoteAggregator, SessionManager,
};

// Infrastructure config
pub use infrastructure::config::{ConfigError, ProxyConfig, ServerSettings, SmartApiSettings};

// Provider adapter
pub use infrastructure::smartapi::SmartApiClient;

// HTTP surface (router is public for integration tests)
pub use infrastructure::http::{ApiError, ApiServer, ApiServerError, AppState, router};

// Telemetry
pub use infrastructure::telemetry::init as init_telemetry;
