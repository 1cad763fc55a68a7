//! SmartAPI Wire Message Types
//!
//! Request and response shapes for the Angel One SmartAPI REST endpoints
//! this adapter uses. Every response arrives wrapped in a common envelope
//! carrying a boolean status flag, a message, and an optional data payload.
//!
//! # Wire Format (JSON)
//! ```json
//! {"status": true, "message": "SUCCESS", "errorcode": "", "data": {...}}
//! {"status": false, "message": "Invalid Token", "errorcode": "AG8001"}
//! ```

use serde::{Deserialize, Serialize};

// =============================================================================
// Envelope
// =============================================================================

/// Common response envelope around every SmartAPI payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    /// Whether the provider processed the request successfully.
    #[serde(default)]
    pub status: bool,

    /// Human-readable provider message.
    #[serde(default)]
    pub message: Option<String>,

    /// Provider error code, empty on success.
    #[serde(default)]
    pub errorcode: Option<String>,

    /// Payload, present when `status` is true.
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// The provider message, or a fallback when it sent none.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| fallback.to_string())
    }
}

// =============================================================================
// Requests
// =============================================================================

/// Body of `loginByPassword`.
///
/// SmartAPI expects the trading MPIN in the `password` field; the legacy
/// account password is no longer accepted for this endpoint.
#[derive(Debug, Serialize)]
pub struct LoginRequestBody<'a> {
    /// Provider client code.
    pub clientcode: &'a str,
    /// Trading MPIN.
    pub password: &'a str,
    /// Six-digit TOTP, empty when the account has none enrolled.
    pub totp: &'a str,
}

/// Body of `logout`.
#[derive(Debug, Serialize)]
pub struct LogoutRequestBody<'a> {
    /// Provider client code.
    pub clientcode: &'a str,
}

/// Body of `getLtpData`.
#[derive(Debug, Serialize)]
pub struct LtpRequestBody<'a> {
    /// Exchange segment, e.g. "NSE".
    pub exchange: &'a str,
    /// Trading symbol.
    pub tradingsymbol: &'a str,
    /// Provider instrument token.
    pub symboltoken: &'a str,
}

// =============================================================================
// Responses
// =============================================================================

/// Token payload of a successful `loginByPassword`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenData {
    /// JWT access token.
    #[serde(rename = "jwtToken")]
    pub jwt_token: String,
    /// Refresh token.
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
    /// Market feed token.
    #[serde(rename = "feedToken")]
    pub feed_token: String,
}
