//! Session Types and Store
//!
//! Domain types for cached provider sessions and the store that owns them.
//! The store is the only shared mutable state in the service.
//!
//! # Design
//!
//! One live session per client identity. A new login replaces the prior
//! entry atomically: sessions are immutable once created and handed out as
//! `Arc<Session>`, so readers observe either the fully-old or fully-new
//! value, never a torn one. The map is sharded so unrelated clients do not
//! contend on a single lock.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;

// =============================================================================
// Types
// =============================================================================

/// Opaque identifier for an end-client of this proxy.
///
/// Used as the session store key. The source system treats it as equal to
/// the provider's own client code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    /// Create a new client identity.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ClientId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Provider login credentials.
///
/// Transient: held only for the duration of a single login call and never
/// stored. The TOTP is optional; the provider rejects logins that require
/// one when it is absent.
#[derive(Clone)]
pub struct Credentials {
    /// Provider API key.
    pub api_key: String,
    /// Client identity (provider client code).
    pub client_id: ClientId,
    /// Account password.
    pub password: String,
    /// Trading PIN (MPIN).
    pub pin: String,
    /// One-time password, if the account has TOTP enabled.
    pub totp: Option<String>,
}

impl Credentials {
    /// Check that every required field is present and non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty()
            && !self.client_id.as_str().is_empty()
            && !self.password.is_empty()
            && !self.pin.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"[REDACTED]")
            .field("client_id", &self.client_id)
            .field("password", &"[REDACTED]")
            .field("pin", &"[REDACTED]")
            .field("totp", &self.totp.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Opaque handle addressing a session at the upstream provider.
///
/// Issued by the provider adapter on authentication and passed back to it
/// on every session-bound call. No other component inspects its contents.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionHandle(String);

impl SessionHandle {
    /// Create a handle from an adapter-issued value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the raw handle value (adapter use only).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionHandle([REDACTED])")
    }
}

/// Cached authenticated context for one client.
///
/// Immutable after construction; replacement happens by storing a whole
/// new value, never by mutating in place.
#[derive(Debug, Clone)]
pub struct Session {
    /// Owning client identity.
    pub client_id: ClientId,
    /// Opaque provider session handle.
    pub handle: SessionHandle,
    /// Provider-issued JWT access token.
    pub jwt_token: String,
    /// Provider-issued refresh token.
    pub refresh_token: String,
    /// Provider-issued market feed token.
    pub feed_token: String,
    /// When this session was established.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Session Store
// =============================================================================

/// Number of shards in the session store.
const SHARD_COUNT: usize = 16;

/// Internally-synchronized store of live sessions, keyed by client identity.
///
/// `put`, `get`, and `remove` are linearizable per key. The shard locks are
/// held only for the map operation itself, never across a provider call.
#[derive(Debug)]
pub struct SessionStore {
    shards: [RwLock<HashMap<ClientId, Arc<Session>>>; SHARD_COUNT],
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shards: std::array::from_fn(|_| RwLock::new(HashMap::new())),
        }
    }

    /// Store a session, unconditionally replacing any prior entry for the
    /// same client. Returns the superseded session, if any.
    ///
    /// Terminating the superseded session upstream is the caller's job;
    /// this store only owns local state.
    pub fn put(&self, session: Arc<Session>) -> Option<Arc<Session>> {
        let shard = self.shard(&session.client_id);
        shard.write().insert(session.client_id.clone(), session)
    }

    /// Look up the live session for a client.
    #[must_use]
    pub fn get(&self, client_id: &ClientId) -> Option<Arc<Session>> {
        self.shard(client_id).read().get(client_id).cloned()
    }

    /// Remove and return the session for a client.
    pub fn remove(&self, client_id: &ClientId) -> Option<Arc<Session>> {
        self.shard(client_id).write().remove(client_id)
    }

    /// Number of live sessions across all shards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shards.iter().map(|s| s.read().len()).sum()
    }

    /// Check whether the store holds no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|s| s.read().is_empty())
    }

    fn shard(&self, client_id: &ClientId) -> &RwLock<HashMap<ClientId, Arc<Session>>> {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        client_id.hash(&mut hasher);
        let index = (hasher.finish() as usize) % SHARD_COUNT;
        &self.shards[index]
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
