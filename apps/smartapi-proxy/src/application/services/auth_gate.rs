//! Request Authorization Gate
//!
//! Decides whether an inbound session-bound request may use a stored
//! session. The check is presence-only: a bearer Authorization header must
//! exist and the claimed client must hold a live session. The bearer value
//! is NOT compared against the session's tokens; that is the observed
//! upstream contract, isolated behind this gate so a stronger policy can
//! be substituted without touching callers.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::session::{ClientId, Session, SessionStore};

/// Prefix required on the Authorization header.
const BEARER_PREFIX: &str = "Bearer ";

/// Authorization failures.
#[derive(Debug, Clone, Error)]
pub enum AuthGateError {
    /// The Authorization header was absent or not a bearer credential.
    #[error("Missing or invalid authorization")]
    MissingBearer,

    /// No client identity was supplied, or it has no live session.
    #[error("Not authenticated")]
    NotAuthenticated,
}

/// Gate authorizing session-bound requests against the session store.
pub struct AuthGate {
    store: Arc<SessionStore>,
}

impl AuthGate {
    /// Create a gate over a session store.
    #[must_use]
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Authorize a request and resolve its session.
    ///
    /// # Errors
    ///
    /// `MissingBearer` when the Authorization header is absent, empty, or
    /// not `Bearer`-prefixed; `NotAuthenticated` when no client identity
    /// was supplied or no live session exists for it.
    pub fn authorize(
        &self,
        authorization: Option<&str>,
        client_id: Option<&str>,
    ) -> Result<Arc<Session>, AuthGateError> {
        let header = authorization.ok_or(AuthGateError::MissingBearer)?;
        if !header.starts_with(BEARER_PREFIX) || header.len() == BEARER_PREFIX.len() {
            return Err(AuthGateError::MissingBearer);
        }

        let client_id = client_id
            .filter(|id| !id.is_empty())
            .ok_or(AuthGateError::NotAuthenticated)?;

        self.store
            .get(&ClientId::from(client_id))
            .ok_or(AuthGateError::NotAuthenticated)
    }
}
