//! Multi-Symbol Quote Aggregation
//!
//! Fetches point-in-time quotes for an ordered list of symbols over one
//! session. Failures are isolated per symbol: a failing fetch omits that
//! symbol from the result and never fails the batch. Result order follows
//! input order for the symbols that succeeded.

use std::sync::Arc;

use chrono::Utc;

use crate::application::ports::{LtpData, ProviderPort};
use crate::domain::instrument::InstrumentResolver;
use crate::domain::quote::{FetchOutcome, QuoteSnapshot};
use crate::domain::session::Session;

/// The only exchange this proxy serves.
const EXCHANGE: &str = "NSE";

/// Aggregates per-symbol quote fetches into one ordered result set.
pub struct QuoteAggregator {
    resolver: InstrumentResolver,
    provider: Arc<dyn ProviderPort>,
}

impl QuoteAggregator {
    /// Create an aggregator over a resolver and provider port.
    #[must_use]
    pub fn new(resolver: InstrumentResolver, provider: Arc<dyn ProviderPort>) -> Self {
        Self { resolver, provider }
    }

    /// Fetch quotes for the given symbols, in order.
    ///
    /// Blank symbols (after trimming) are skipped silently without an
    /// outcome entry. Unknown symbols resolve to the sentinel token and
    /// are still attempted upstream; the provider's rejection then shows
    /// up as a skip. An input yielding zero successes is still a success
    /// with an empty result.
    pub async fn get_quotes(&self, session: &Session, symbols: &[String]) -> Vec<FetchOutcome> {
        let mut outcomes = Vec::with_capacity(symbols.len());

        for raw in symbols {
            let symbol = raw.trim();
            if symbol.is_empty() {
                continue;
            }

            let token = self.resolver.resolve(symbol);
            match self
                .provider
                .last_traded_price(session, EXCHANGE, symbol, token)
                .await
            {
                Ok(data) => outcomes.push(FetchOutcome::Fetched(build_snapshot(symbol, &data))),
                Err(error) => {
                    tracing::debug!(symbol, error = %error, "Quote fetch failed; skipping symbol");
                    outcomes.push(FetchOutcome::Skipped {
                        symbol: symbol.to_string(),
                        reason: error.to_string(),
                    });
                }
            }
        }

        outcomes
    }
}

fn build_snapshot(symbol: &str, data: &LtpData) -> QuoteSnapshot {
    QuoteSnapshot {
        symbol: symbol.to_string(),
        ltp: data.ltp,
        change: data.change,
        p_change: data.p_change,
        open: data.open,
        high: data.high,
        low: data.low,
        close: data.close,
        timestamp: Utc::now(),
    }
}

// =============================================================================
// Tests
// =============================================================================
