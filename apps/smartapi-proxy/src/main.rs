//! SmartAPI Session Proxy Binary
//!
//! Starts the session proxy HTTP server.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin smartapi-proxy
//! ```
//!
//! # Environment Variables
//!
//! All optional:
//! - `PORT`: HTTP server port (default: 10000)
//! - `SMARTAPI_BASE_URL`: Provider REST endpoint (default: <https://apiconnect.angelone.in>)
//! - `SMARTAPI_TIMEOUT_SECS`: Bound on every upstream call (default: 10)
//! - `RUST_LOG`: Log level (default: info)
//!
//! Provider credentials are not configured at startup; they arrive with
//! each login request.

use std::sync::Arc;

use smartapi_proxy::infrastructure::telemetry;
use smartapi_proxy::{
    ApiServer, AppState, AuthGate, InstrumentResolver, ProxyConfig, QuoteAggregator,
    SessionManager, SessionStore, SmartApiClient,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();

    telemetry::init();

    tracing::info!("Starting SmartAPI Session Proxy");

    let config = ProxyConfig::from_env()?;
    log_config(&config);

    let shutdown_token = CancellationToken::new();

    // The session store is the only shared mutable state; it starts empty
    // and lives for the process lifetime.
    let store = Arc::new(SessionStore::new());
    let provider: Arc<dyn smartapi_proxy::ProviderPort> =
        Arc::new(SmartApiClient::new(&config.smartapi)?);

    let session_manager = SessionManager::new(Arc::clone(&store), Arc::clone(&provider));
    let auth_gate = AuthGate::new(Arc::clone(&store));
    let quote_aggregator =
        QuoteAggregator::new(InstrumentResolver::new(), Arc::clone(&provider));

    let state = Arc::new(AppState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        Arc::clone(&store),
        session_manager,
        auth_gate,
        quote_aggregator,
        provider,
    ));

    let server = ApiServer::new(config.server.http_port, state, shutdown_token.clone());

    tokio::spawn(async move {
        if let Err(e) = server.run().await {
            tracing::error!(error = %e, "HTTP server error");
        }
    });

    tracing::info!("Session proxy ready");

    await_shutdown(shutdown_token).await;

    tracing::info!("Session proxy stopped");
    Ok(())
}

/// Log the parsed configuration.
fn log_config(config: &ProxyConfig) {
    tracing::info!(
        http_port = config.server.http_port,
        base_url = %config.smartapi.base_url,
        timeout_secs = config.smartapi.timeout.as_secs(),
        "Configuration loaded"
    );
}

/// Load .env file from current directory or any ancestor directory.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
#[allow(clippy::expect_used)]
async fn await_shutdown(shutdown_token: CancellationToken) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("signal handler installation is critical for graceful shutdown");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("SIGTERM handler installation is critical for graceful shutdown")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }

    shutdown_token.cancel();
}
