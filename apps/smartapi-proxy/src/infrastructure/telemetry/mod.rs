//! Tracing Initialization
//!
//! Configures the global tracing subscriber. Honors `RUST_LOG`; defaults
//! to `info` for this crate when unset.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Default filter directive when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVES: &str = "smartapi_proxy=info,axum=info";

/// Initialize the global tracing subscriber.
///
/// Safe to call once per process; a second call is a no-op.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
