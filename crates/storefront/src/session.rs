//! Cached session and bearer-token validity checks.
//!
//! The signin endpoint produces a session (identity, roles, bearer token)
//! that the pages cache in the durable store. The guard here decides, purely
//! client-side, whether those cached credentials are still worth sending:
//! the authoritative check remains the server's own authorization.

use std::fmt;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use workflow_commerce_core::{Role, UserId};

use crate::storage::{self, StateStore, keys};

/// Cached identity and authorization state.
///
/// Owned by the durable store, read-only to this crate (only the auth
/// client writes it). Unknown response fields (e.g. the token type) are
/// ignored on deserialization.
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub roles: Vec<Role>,
    /// Opaque bearer token with an embedded expiry claim.
    pub token: String,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("roles", &self.roles)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Expiry claim embedded in the bearer token payload.
#[derive(Debug, Deserialize)]
struct Claims {
    /// Expiry as seconds since the Unix epoch.
    exp: i64,
}

/// Extract the expiry claim from a JWT-shaped bearer token.
///
/// Returns `None` for anything that does not decode cleanly; callers treat
/// that as an invalid token, never as a crash.
fn token_expiry(token: &str) -> Option<i64> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    Some(claims.exp)
}

/// Whether a bearer token is missing, undecodable, or past its expiry.
#[must_use]
pub fn is_token_expired(token: &str) -> bool {
    token_expiry(token).is_none_or(|exp| exp <= Utc::now().timestamp())
}

/// Advisory validity checks over the cached session.
#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn StateStore>,
}

impl SessionGuard {
    /// Create a guard over the shared state store.
    #[must_use]
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// The cached session, or `None` if absent or malformed.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        storage::read_json(self.store.as_ref(), keys::USER)
            .ok()
            .flatten()
    }

    /// Whether cached credentials are still worth sending.
    ///
    /// False when there is no session, the session has no token, or the
    /// token's expiry claim is missing, undecodable, or at/before now.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.current()
            .is_some_and(|s| !s.token.is_empty() && !is_token_expired(&s.token))
    }

    /// Role set of the cached session; empty when no session.
    #[must_use]
    pub fn roles(&self) -> Vec<Role> {
        self.current().map(|s| s.roles).unwrap_or_default()
    }

    /// Advisory gate for admin-only views.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles().contains(&Role::Admin)
    }

    /// Bearer token to attach to authenticated calls.
    ///
    /// Only returned while [`is_valid`](Self::is_valid) holds, so expired
    /// credentials are never sent.
    #[must_use]
    pub fn bearer_token(&self) -> Option<String> {
        let session = self.current()?;
        if session.token.is_empty() || is_token_expired(&session.token) {
            return None;
        }
        Some(session.token)
    }
}

/// Build a JWT-shaped token with the given expiry, for tests.
#[cfg(test)]
pub(crate) fn test_token(exp: i64) -> String {
    let payload = URL_SAFE_NO_PAD.encode(format!("{{\"sub\":\"alice\",\"exp\":{exp}}}"));
    format!("eyJhbGciOiJIUzI1NiJ9.{payload}.c2ln")
}

/// Cache a session with the given roles and token, for tests.
#[cfg(test)]
pub(crate) fn cache_test_session(store: &dyn StateStore, roles: Vec<Role>, token: &str) {
    let session = Session {
        id: UserId::new(1),
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        roles,
        token: token.to_string(),
    };
    storage::write_json(store, keys::USER, &session).expect("session write");
}
