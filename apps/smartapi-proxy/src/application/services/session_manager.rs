//! Session Lifecycle Management
//!
//! Orchestrates login and logout against the provider port and the
//! session store.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::application::ports::{ProviderError, ProviderPort};
use crate::domain::session::{ClientId, Credentials, Session, SessionStore};

// =============================================================================
// Errors
// =============================================================================

/// Errors from a login attempt.
#[derive(Debug, Clone, Error)]
pub enum LoginError {
    /// One or more required credential fields were missing or empty.
    #[error("Missing required fields")]
    MissingFields,

    /// The provider rejected the credentials.
    #[error("{0}")]
    Rejected(String),

    /// The authentication call itself failed.
    #[error("{0}")]
    Upstream(String),
}

/// Errors from a logout attempt.
#[derive(Debug, Clone, Error)]
pub enum LogoutError {
    /// No live session exists for the client.
    #[error("No active session found")]
    NoSession,
}

// =============================================================================
// Session Manager
// =============================================================================

/// Orchestrates session creation and teardown.
///
/// The store never outlives a torn state: a session is stored only after
/// the provider has fully authenticated, and logout removes local state
/// regardless of the upstream termination outcome.
pub struct SessionManager {
    store: Arc<SessionStore>,
    provider: Arc<dyn ProviderPort>,
}

impl SessionManager {
    /// Create a manager over a store and provider port.
    #[must_use]
    pub fn new(store: Arc<SessionStore>, provider: Arc<dyn ProviderPort>) -> Self {
        Self { store, provider }
    }

    /// Authenticate a client and cache the resulting session.
    ///
    /// A successful login for a client that already holds a session
    /// replaces the prior entry atomically.
    ///
    /// # Errors
    ///
    /// `MissingFields` when a required credential field is absent or
    /// empty, `Rejected` when the provider declines the credentials,
    /// `Upstream` when the authentication call fails outright.
    pub async fn login(&self, credentials: Credentials) -> Result<Arc<Session>, LoginError> {
        if !credentials.is_complete() {
            return Err(LoginError::MissingFields);
        }

        let provider_session = self.provider.authenticate(&credentials).await.map_err(
            |error| match error {
                ProviderError::Rejected(message) => LoginError::Rejected(message),
                other => LoginError::Upstream(other.to_string()),
            },
        )?;

        let session = Arc::new(Session {
            client_id: credentials.client_id.clone(),
            handle: provider_session.handle,
            jwt_token: provider_session.jwt_token,
            refresh_token: provider_session.refresh_token,
            feed_token: provider_session.feed_token,
            created_at: Utc::now(),
        });

        let superseded = self.store.put(Arc::clone(&session));
        if superseded.is_some() {
            tracing::info!(client_id = %credentials.client_id, "Prior session superseded");
        }
        tracing::info!(client_id = %credentials.client_id, "Session stored");

        Ok(session)
    }

    /// Tear down a client's session.
    ///
    /// Upstream termination is best-effort: a provider failure is logged
    /// and local state is removed regardless, so local state never leaks.
    ///
    /// # Errors
    ///
    /// `NoSession` when the client holds no live session.
    pub async fn logout(&self, client_id: &ClientId) -> Result<(), LogoutError> {
        let session = self.store.get(client_id).ok_or(LogoutError::NoSession)?;

        if let Err(error) = self.provider.terminate(&session).await {
            tracing::warn!(
                client_id = %client_id,
                error = %error,
                "Upstream session termination failed; removing local session anyway"
            );
        }

        self.store.remove(client_id);
        tracing::info!(client_id = %client_id, "Session removed");
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockProviderPort, ProviderSession};
    use crate::domain::session::SessionHandle;

    fn make_credentials(client: &str) -> Credentials {
        Credentials {
            api_key: "k".to_string(),
            client_id: ClientId::from(client),
            password: "p".to_string(),
            pin: "1234".to_string(),
            totp: None,
        }
    }

    fn make_provider_session(jwt: &str) -> ProviderSession {
        ProviderSession {
            handle: SessionHandle::new("k"),
            jwt_token: jwt.to_string(),
            refresh_token: format!("{jwt}-refresh"),
            feed_token: format!("{jwt}-feed"),
        }
    }

    #[tokio::test]
    async fn login_stores_exactly_one_session() {
        let mut provider = MockProviderPort::new();
        provider
            .expect_authenticate()
            .returning(|_| Ok(make_provider_session("J")));

        let store = Arc::new(SessionStore::new());
        let manager = SessionManager::new(Arc::clone(&store), Arc::new(provider));

        let session = manager.login(make_credentials("C1")).await.unwrap();
        assert_eq!(session.jwt_token, "J");
        assert_eq!(session.refresh_token, "J-refresh");
        assert_eq!(session.feed_token, "J-feed");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn second_login_replaces_prior_session() {
        let mut provider = MockProviderPort::new();
        let mut calls = 0;
        provider.expect_authenticate().returning(move |_| {
            calls += 1;
            Ok(make_provider_session(if calls == 1 { "J1" } else { "J2" }))
        });

        let store = Arc::new(SessionStore::new());
        let manager = SessionManager::new(Arc::clone(&store), Arc::new(provider));

        manager.login(make_credentials("C1")).await.unwrap();
        manager.login(make_credentials("C1")).await.unwrap();

        assert_eq!(store.len(), 1);
        let session = store.get(&ClientId::from("C1")).unwrap();
        assert_eq!(session.jwt_token, "J2");
    }

    #[tokio::test]
    async fn login_with_empty_pin_is_rejected_locally() {
        let mut provider = MockProviderPort::new();
        provider.expect_authenticate().never();

        let store = Arc::new(SessionStore::new());
        let manager = SessionManager::new(Arc::clone(&store), Arc::new(provider));

        let mut credentials = make_credentials("C1");
        credentials.pin = String::new();

        let error = manager.login(credentials).await.unwrap_err();
        assert!(matches!(error, LoginError::MissingFields));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn rejected_credentials_store_nothing() {
        let mut provider = MockProviderPort::new();
        provider
            .expect_authenticate()
            .returning(|_| Err(ProviderError::Rejected("Invalid totp".to_string())));

        let store = Arc::new(SessionStore::new());
        let manager = SessionManager::new(Arc::clone(&store), Arc::new(provider));

        let error = manager.login(make_credentials("C1")).await.unwrap_err();
        assert!(matches!(error, LoginError::Rejected(message) if message == "Invalid totp"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn transport_failure_surfaces_as_upstream() {
        let mut provider = MockProviderPort::new();
        provider
            .expect_authenticate()
            .returning(|_| Err(ProviderError::Transport("connection refused".to_string())));

        let store = Arc::new(SessionStore::new());
        let manager = SessionManager::new(store, Arc::new(provider));

        let error = manager.login(make_credentials("C1")).await.unwrap_err();
        assert!(matches!(error, LoginError::Upstream(_)));
    }

    #[tokio::test]
    async fn logout_without_session_is_not_found() {
        let provider = MockProviderPort::new();
        let store = Arc::new(SessionStore::new());
        let manager = SessionManager::new(store, Arc::new(provider));

        let error = manager.logout(&ClientId::from("C1")).await.unwrap_err();
        assert!(matches!(error, LogoutError::NoSession));
    }

    #[tokio::test]
    async fn logout_removes_session_even_when_upstream_termination_fails() {
        let mut provider = MockProviderPort::new();
        provider
            .expect_authenticate()
            .returning(|_| Ok(make_provider_session("J")));
        provider
            .expect_terminate()
            .returning(|_| Err(ProviderError::Transport("timeout".to_string())));

        let store = Arc::new(SessionStore::new());
        let manager = SessionManager::new(Arc::clone(&store), Arc::new(provider));

        manager.login(make_credentials("C1")).await.unwrap();
        manager.logout(&ClientId::from("C1")).await.unwrap();

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn concurrent_logins_for_distinct_clients_do_not_interfere() {
        let mut provider = MockProviderPort::new();
        provider.expect_authenticate().returning(|credentials| {
            Ok(make_provider_session(&format!(
                "J-{}",
                credentials.client_id
            )))
        });

        let store = Arc::new(SessionStore::new());
        let manager = Arc::new(SessionManager::new(Arc::clone(&store), Arc::new(provider)));

        let first = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.login(make_credentials("CLIENT1")).await })
        };
        let second = {
            let manager = Arc::clone(&manager);
            tokio::spawn(async move { manager.login(make_credentials("CLIENT2")).await })
        };

        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.get(&ClientId::from("CLIENT1")).unwrap().jwt_token,
            "J-CLIENT1"
        );
        assert_eq!(
            store.get(&ClientId::from("CLIENT2")).unwrap().jwt_token,
            "J-CLIENT2"
        );
    }
}
