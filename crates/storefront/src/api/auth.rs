//! Authentication endpoints: signin, signup, and local sign-out.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;
use url::Url;

use super::{ApiError, MessageBody, error_from_response};
use crate::session::Session;
use crate::storage::{self, StateStore, StoreError, keys};

#[derive(Serialize)]
struct SigninRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    role: &'a [String],
}

/// Client for the authentication endpoints.
///
/// The only writer of the cached session: a successful signin stores the
/// returned [`Session`], and sign-out clears it along with any deferred
/// checkout (a stale deferral must not outlive the account that made it).
#[derive(Clone)]
pub struct AuthApi {
    inner: Arc<AuthApiInner>,
}

struct AuthApiInner {
    client: reqwest::Client,
    base_url: Url,
    store: Arc<dyn StateStore>,
}

impl AuthApi {
    /// Create a new auth API client.
    #[must_use]
    pub fn new(base_url: Url, store: Arc<dyn StateStore>) -> Self {
        Self {
            inner: Arc::new(AuthApiInner {
                client: reqwest::Client::new(),
                base_url,
                store,
            }),
        }
    }

    /// Sign in and cache the resulting session.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiError::Unauthorized`] on bad credentials, or with
    /// the server's message otherwise. The session is only cached when the
    /// response actually carries a token.
    #[instrument(skip(self, password))]
    pub async fn signin(&self, username: &str, password: &SecretString) -> Result<Session, ApiError> {
        let url = self.inner.base_url.join("/api/auth/signin")?;
        let body = SigninRequest {
            username,
            password: password.expose_secret(),
        };

        let response = self.inner.client.post(url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let session: Session = response.json().await?;
        if !session.token.is_empty() {
            storage::write_json(self.inner.store.as_ref(), keys::USER, &session)?;
        }

        Ok(session)
    }

    /// Register a new account.
    ///
    /// Returns the server's confirmation message. Does not sign in; the
    /// caller directs the user to the login form afterwards.
    ///
    /// # Errors
    ///
    /// Fails with the server's message (e.g. username already taken).
    #[instrument(skip(self, password, email))]
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &SecretString,
        roles: &[String],
    ) -> Result<String, ApiError> {
        let url = self.inner.base_url.join("/api/auth/signup")?;
        let body = SignupRequest {
            username,
            email,
            password: password.expose_secret(),
            role: roles,
        };

        let response = self.inner.client.post(url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body: MessageBody = response.json().await?;
        Ok(body.message)
    }

    /// Clear all cached authentication state.
    ///
    /// Removes the session and any pending checkout; purely local, the
    /// bearer token is stateless server-side.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be updated.
    pub fn logout(&self) -> Result<(), StoreError> {
        self.inner.store.remove(keys::USER)?;
        self.inner.store.remove(keys::PENDING_CHECKOUT)?;
        Ok(())
    }
}
