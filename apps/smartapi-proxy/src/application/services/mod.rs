//! Application Services
//!
//! Services that orchestrate domain logic and coordinate between ports.
//!
//! - [`SessionManager`]: session lifecycle (login, logout)
//! - [`AuthGate`]: authorization of session-bound requests
//! - [`QuoteAggregator`]: multi-symbol quote fetch with per-symbol
//!   failure isolation

mod auth_gate;
mod quote_aggregator;
mod session_manager;

pub use auth_gate::{AuthGate, AuthGateError};
pub use quote_aggregator::QuoteAggregator;
pub use session_manager::{LoginError, LogoutError, SessionManager};
