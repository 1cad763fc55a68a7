//! SmartAPI Provider Adapter
//!
//! Implements the [`crate::application::ports::ProviderPort`] against the
//! Angel One SmartAPI REST endpoints:
//!
//! - **loginByPassword**: session establishment
//! - **logout**: best-effort upstream teardown
//! - **getLtpData**: point-in-time quote snapshot
//! - **getProfile**: opaque profile payload

pub mod client;
pub mod messages;

pub use client::SmartApiClient;
pub use messages::{ApiEnvelope, TokenData};
