//! HTTP clients for the commerce REST API.
//!
//! Thin JSON wrappers over `reqwest`: the core never interprets responses
//! beyond deserializing them, and every authenticated call attaches the
//! bearer token from the session guard before it is attempted.
//!
//! # Example
//!
//! ```rust,ignore
//! use workflow_commerce_storefront::api::{AuthApi, OrderApi};
//!
//! let auth = AuthApi::new(config.api_base_url.clone(), store.clone());
//! auth.signin("alice", &password).await?;
//!
//! let orders = OrderApi::new(config.api_base_url.clone(), guard);
//! let history = orders.my_orders().await?;
//! ```

mod auth;
mod orders;

pub use auth::AuthApi;
pub use orders::{OrderApi, OrderItemRequest, OrderRequest, OrderSummary};

use serde::Deserialize;
use thiserror::Error;

use crate::storage::StoreError;

/// Errors that can occur when calling the commerce API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// No valid credentials, or the server rejected them.
    #[error("Not signed in")]
    Unauthorized,

    /// Server answered with a non-success status.
    #[error("Server error ({status}): {}", .message.as_deref().unwrap_or("no details provided"))]
    Server {
        status: u16,
        /// Server-provided message, surfaced verbatim when present.
        message: Option<String>,
    },

    /// Durable state could not be updated with the response.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Message envelope the API uses for error and confirmation bodies.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageBody {
    pub message: String,
}

/// Map a non-success response to an [`ApiError`], extracting the server's
/// message body when it has one.
pub(crate) async fn error_from_response(response: reqwest::Response) -> ApiError {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized;
    }

    let message = response
        .json::<MessageBody>()
        .await
        .ok()
        .map(|body| body.message);

    ApiError::Server {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Server {
            status: 400,
            message: Some("Product 7 is not available".to_string()),
        };
        assert_eq!(err.to_string(), "Server error (400): Product 7 is not available");

        let err = ApiError::Server {
            status: 500,
            message: None,
        };
        assert_eq!(err.to_string(), "Server error (500): no details provided");

        assert_eq!(ApiError::Unauthorized.to_string(), "Not signed in");
    }
}
