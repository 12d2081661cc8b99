//! Order endpoints: submission, history, and user-side cancellation.

use std::sync::Arc;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use workflow_commerce_core::{OrderId, OrderStatus, ProductId};

use super::{ApiError, MessageBody, error_from_response};
use crate::checkout::SubmitOrders;
use crate::session::SessionGuard;

/// One product + quantity pair of an order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Body of `POST /api/orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub items: Vec<OrderItemRequest>,
    pub shipping_address: String,
}

/// Order record as returned by the API.
///
/// Timestamps are naive because the backend emits local date-times without
/// an offset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: OrderId,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub order_status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Client for the order endpoints.
///
/// Cheap to clone; the underlying HTTP client and session guard are shared.
#[derive(Clone)]
pub struct OrderApi {
    inner: Arc<OrderApiInner>,
}

struct OrderApiInner {
    client: reqwest::Client,
    base_url: Url,
    guard: SessionGuard,
}

impl OrderApi {
    /// Create a new order API client.
    #[must_use]
    pub fn new(base_url: Url, guard: SessionGuard) -> Self {
        Self {
            inner: Arc::new(OrderApiInner {
                client: reqwest::Client::new(),
                base_url,
                guard,
            }),
        }
    }

    fn bearer(&self) -> Result<String, ApiError> {
        self.inner.guard.bearer_token().ok_or(ApiError::Unauthorized)
    }

    /// Submit an order for the current session.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiError::Unauthorized`] when no valid credentials are
    /// cached (the token is checked before any network call), or with the
    /// server's message on rejection.
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    pub async fn create_order(&self, request: &OrderRequest) -> Result<OrderSummary, ApiError> {
        let token = self.bearer()?;
        let url = self.inner.base_url.join("/api/orders")?;

        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response.json().await?)
    }

    /// Fetch the current session's order history.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiError::Unauthorized`] when no valid credentials are
    /// cached, or with the server's error otherwise.
    #[instrument(skip(self))]
    pub async fn my_orders(&self) -> Result<Vec<OrderSummary>, ApiError> {
        let token = self.bearer()?;
        let url = self.inner.base_url.join("/api/orders/my")?;

        let response = self.inner.client.get(url).bearer_auth(token).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        Ok(response.json().await?)
    }

    /// Cancel one of the caller's own pending orders.
    ///
    /// Returns the server's confirmation message.
    ///
    /// # Errors
    ///
    /// Fails with [`ApiError::Unauthorized`] when no valid credentials are
    /// cached, or with the server's message when the order can no longer be
    /// cancelled.
    #[instrument(skip(self))]
    pub async fn cancel_order(&self, order_id: OrderId) -> Result<String, ApiError> {
        let token = self.bearer()?;
        let url = self
            .inner
            .base_url
            .join(&format!("/api/orders/{order_id}/cancel/user"))?;

        let response = self.inner.client.put(url).bearer_auth(token).send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let body: MessageBody = response.json().await?;
        Ok(body.message)
    }
}

impl SubmitOrders for OrderApi {
    async fn submit(&self, request: &OrderRequest) -> Result<OrderSummary, ApiError> {
        self.create_order(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_order_request_wire_shape() {
        let request = OrderRequest {
            items: vec![OrderItemRequest {
                product_id: ProductId::new(7),
                quantity: 2,
            }],
            shipping_address: "42 Elm".to_string(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "items": [{"productId": 7, "quantity": 2}],
                "shippingAddress": "42 Elm"
            })
        );
    }

    #[test]
    fn test_order_summary_deserializes_backend_shape() {
        let raw = json!({
            "orderId": 12,
            "totalAmount": 19.98,
            "shippingAddress": "123 Main St",
            "orderStatus": "Pending",
            "createdAt": "2026-03-01T10:30:00",
            "updatedAt": "2026-03-01T10:30:00",
            "status": true,
            "userId": 3,
            "username": "alice"
        });

        let summary: OrderSummary = serde_json::from_value(raw).unwrap();
        assert_eq!(summary.order_id, OrderId::new(12));
        assert_eq!(summary.total_amount, Decimal::new(1998, 2));
        assert_eq!(summary.order_status, OrderStatus::Pending);
        assert_eq!(summary.username.as_deref(), Some("alice"));
        assert!(summary.created_at.is_some());
    }

    #[test]
    fn test_order_summary_tolerates_missing_timestamps() {
        let raw = json!({
            "orderId": 1,
            "totalAmount": 5,
            "shippingAddress": "42 Elm",
            "orderStatus": "Cancelled"
        });

        let summary: OrderSummary = serde_json::from_value(raw).unwrap();
        assert_eq!(summary.created_at, None);
        assert_eq!(summary.username, None);
    }
}
