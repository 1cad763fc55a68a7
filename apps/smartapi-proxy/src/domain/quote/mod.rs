//! Quote Snapshot Types
//!
//! Point-in-time quote values for one instrument, produced fresh per
//! request and never cached. Prices use `Decimal` for financial precision.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

// =============================================================================
// Snapshot
// =============================================================================

/// A point-in-time quote value set for one instrument.
///
/// # Wire Format (JSON)
/// ```json
/// {"symbol":"RELIANCE","ltp":2885.5,"change":12.3,"pChange":0.43,
///  "open":2870.0,"high":2890.0,"low":2860.0,"close":2873.2,
///  "timestamp":"2026-08-29T10:15:00Z"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteSnapshot {
    /// Human-readable ticker symbol, as supplied by the caller.
    pub symbol: String,
    /// Last traded price.
    #[serde(with = "rust_decimal::serde::float")]
    pub ltp: Decimal,
    /// Absolute change since previous close.
    #[serde(with = "rust_decimal::serde::float")]
    pub change: Decimal,
    /// Percentage change since previous close.
    #[serde(rename = "pChange", with = "rust_decimal::serde::float")]
    pub p_change: Decimal,
    /// Day open price.
    #[serde(with = "rust_decimal::serde::float")]
    pub open: Decimal,
    /// Day high price.
    #[serde(with = "rust_decimal::serde::float")]
    pub high: Decimal,
    /// Day low price.
    #[serde(with = "rust_decimal::serde::float")]
    pub low: Decimal,
    /// Previous close price.
    #[serde(with = "rust_decimal::serde::float")]
    pub close: Decimal,
    /// When this snapshot was observed.
    pub timestamp: DateTime<Utc>,
}

// =============================================================================
// Fetch Outcome
// =============================================================================

/// Per-symbol result of a quote fetch within one aggregation request.
///
/// Failures are data, not errors: a skipped symbol is omitted from the
/// response while the rest of the batch proceeds.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The symbol was fetched successfully.
    Fetched(QuoteSnapshot),
    /// The symbol was skipped because its fetch failed.
    Skipped {
        /// The symbol that failed.
        symbol: String,
        /// Why the fetch failed (adapter message).
        reason: String,
    },
}

impl FetchOutcome {
    /// Extract the snapshot if this outcome is a success.
    #[must_use]
    pub fn into_snapshot(self) -> Option<QuoteSnapshot> {
        match self {
            Self::Fetched(snapshot) => Some(snapshot),
            Self::Skipped { .. } => None,
        }
    }

    /// Check whether this outcome is a success.
    #[must_use]
    pub const fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }
}
