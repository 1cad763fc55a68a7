//! Infrastructure Layer - Adapters and external integrations.
//!
//! This layer contains the concrete implementations of the port interfaces
//! defined in the application layer.

/// Configuration loading.
pub mod config;

/// Public HTTP surface.
pub mod http;

/// SmartAPI REST provider adapter.
pub mod smartapi;

/// Tracing initialization.
pub mod telemetry;
