//! Instrument Resolution
//!
//! Maps human-readable NSE ticker symbols to the provider's internal
//! instrument tokens. Pure lookup over a read-only table: no I/O and no
//! failure mode. Unknown symbols resolve to the sentinel token `"0"` and
//! are still attempted against the provider, which surfaces the failure
//! on the fetch itself rather than pre-filtering here.

use std::collections::HashMap;

/// Sentinel instrument token returned for symbols absent from the table.
pub const UNKNOWN_TOKEN: &str = "0";

/// NSE symbol to provider instrument token mapping.
///
/// The full instrument list is published by the provider; this table covers
/// the NIFTY constituents plus a handful of liquid mid-caps.
const NSE_TOKENS: &[(&str, &str)] = &[
    ("RELIANCE", "2885"),
    ("TCS", "11536"),
    ("HDFCBANK", "1333"),
    ("INFY", "1594"),
    ("ICICIBANK", "4963"),
    ("HINDUNILVR", "1394"),
    ("SBIN", "3045"),
    ("BHARTIARTL", "10604"),
    ("BAJFINANCE", "317"),
    ("KOTAKBANK", "1922"),
    ("LT", "11483"),
    ("AXISBANK", "5900"),
    ("ITC", "1660"),
    ("ASIANPAINT", "236"),
    ("MARUTI", "10999"),
    ("TITAN", "3506"),
    ("SUNPHARMA", "3351"),
    ("ULTRACEMCO", "11532"),
    ("NESTLEIND", "17963"),
    ("TATAMOTORS", "3456"),
    ("TATASTEEL", "3499"),
    ("POWERGRID", "14977"),
    ("NTPC", "11630"),
    ("ONGC", "2475"),
    ("HCLTECH", "7229"),
    ("WIPRO", "3787"),
    ("TECHM", "13538"),
    ("INDUSINDBK", "5258"),
    ("BAJAJFINSV", "16675"),
    ("GRASIM", "1232"),
    ("DRREDDY", "881"),
    ("DIVISLAB", "10940"),
    ("CIPLA", "694"),
    ("EICHERMOT", "910"),
    ("HEROMOTOCO", "1348"),
    ("ADANIPORTS", "15083"),
    ("COALINDIA", "20374"),
    ("JSWSTEEL", "11723"),
    ("TATACONSUM", "3432"),
    ("BRITANNIA", "547"),
    ("APOLLOHOSP", "157"),
    ("HINDALCO", "1363"),
    ("SHREECEM", "3103"),
    ("VEDL", "3063"),
    ("ADANIENT", "25"),
    ("MANAPPURAM", "19061"),
    ("SAIL", "2963"),
    ("NMDC", "15332"),
    ("BANKBARODA", "4668"),
    ("PNB", "10666"),
    ("CANBK", "10794"),
];

/// Resolver from ticker symbol to provider instrument token.
///
/// Symbols are case-sensitive as provided by the caller.
#[derive(Debug)]
pub struct InstrumentResolver {
    tokens: HashMap<&'static str, &'static str>,
}

impl InstrumentResolver {
    /// Build a resolver over the built-in NSE table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokens: NSE_TOKENS.iter().copied().collect(),
        }
    }

    /// Resolve a symbol to its instrument token.
    ///
    /// Never fails: unknown symbols map to [`UNKNOWN_TOKEN`].
    #[must_use]
    pub fn resolve(&self, symbol: &str) -> &'static str {
        self.tokens.get(symbol).copied().unwrap_or(UNKNOWN_TOKEN)
    }
}

impl Default for InstrumentResolver {
    fn default() -> Self {
        Self::new()
    }
}
