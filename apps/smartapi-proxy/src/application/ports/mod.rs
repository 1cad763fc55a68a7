//! Port Interfaces
//!
//! Defines the interfaces (ports) for external systems following the
//! Hexagonal Architecture pattern. These are the contracts that
//! infrastructure adapters must implement.
//!
//! ## Driven Ports (Outbound)
//!
//! - [`ProviderPort`]: the upstream trading-data provider, treated as an
//!   opaque capability (authenticate, terminate, fetch LTP, profile). The
//!   wire protocol behind it is an adapter concern.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::session::{Credentials, Session, SessionHandle};

// =============================================================================
// Port Data Types
// =============================================================================

/// Tokens and handle issued by the provider on successful authentication.
#[derive(Debug, Clone)]
pub struct ProviderSession {
    /// Opaque handle the adapter needs to address this session upstream.
    pub handle: SessionHandle,
    /// JWT access token.
    pub jwt_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Market feed token.
    pub feed_token: String,
}

/// Last-traded-price data for one instrument, as reported by the provider.
///
/// Every numeric field defaults to zero when absent from the provider
/// response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LtpData {
    /// Last traded price.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub ltp: Decimal,
    /// Absolute change since previous close.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub change: Decimal,
    /// Percentage change since previous close.
    #[serde(rename = "pChange", default, with = "rust_decimal::serde::float")]
    pub p_change: Decimal,
    /// Day open price.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub open: Decimal,
    /// Day high price.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub high: Decimal,
    /// Day low price.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub low: Decimal,
    /// Previous close price.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub close: Decimal,
}

// =============================================================================
// Errors
// =============================================================================

/// Errors surfaced by a provider adapter.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The provider processed the request and rejected it (status flag
    /// false, invalid credentials, unknown instrument, ...).
    #[error("{0}")]
    Rejected(String),

    /// The request never completed (connect failure, timeout, non-2xx).
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider replied with a payload the adapter could not decode.
    #[error("malformed provider response: {0}")]
    Decode(String),
}

// =============================================================================
// Provider Port
// =============================================================================

/// Outbound port to the upstream trading-data provider.
///
/// All calls are point-in-time request/response; the caller blocks for the
/// duration of the upstream call. Adapters must bound each call with a
/// timeout.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderPort: Send + Sync {
    /// Authenticate a client and establish an upstream session.
    ///
    /// # Errors
    ///
    /// `Rejected` when the provider declines the credentials, `Transport`
    /// or `Decode` when the call itself fails.
    async fn authenticate(&self, credentials: &Credentials)
    -> Result<ProviderSession, ProviderError>;

    /// Terminate a session upstream. Best-effort: callers treat failure as
    /// non-fatal.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the provider rejects the request
    /// or the call fails.
    async fn terminate(&self, session: &Session) -> Result<(), ProviderError>;

    /// Fetch a last-traded-price snapshot for one instrument.
    ///
    /// # Errors
    ///
    /// `Rejected` when the provider reports a negative status for the
    /// instrument, `Transport`/`Decode` when the call fails.
    async fn last_traded_price(
        &self,
        session: &Session,
        exchange: &str,
        symbol: &str,
        token: &str,
    ) -> Result<LtpData, ProviderError>;

    /// Fetch the opaque provider profile payload for a session.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] when the provider rejects the request
    /// or the call fails.
    async fn profile(&self, session: &Session) -> Result<serde_json::Value, ProviderError>;
}
