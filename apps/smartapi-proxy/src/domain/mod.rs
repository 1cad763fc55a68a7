//! Domain Layer - Core session and quote types.
//!
//! This layer contains the core domain types for session brokering and
//! quote aggregation with no external dependencies. All types here are
//! pure Rust with serialization support.

/// Instrument symbol to token resolution.
pub mod instrument;

/// Quote snapshot and per-symbol fetch outcome types.
pub mod quote;

/// Session types and the session store.
pub mod session;
