//! Checkout coordination.
//!
//! Drives checkout intent from validation through submission, including the
//! one place round-trip correctness matters: deferring a checkout across a
//! login redirect and restoring it exactly once afterwards. The coordinator
//! never navigates; it signals the caller, which owns redirects and the
//! address field.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{ApiError, OrderItemRequest, OrderRequest, OrderSummary};
use crate::cart::{CartLine, CartStore};
use crate::session::SessionGuard;
use crate::storage::{self, StateStore, StoreError, keys};

/// How long a deferred checkout stays restorable.
///
/// The record has no natural expiry of its own; without this cutoff an old
/// deferral could resurface after an unrelated login weeks later.
pub const PENDING_CHECKOUT_MAX_AGE_HOURS: i64 = 24;

/// Fallback shown when the server gives no failure message.
const GENERIC_SUBMIT_FAILURE: &str = "Failed to place order";

/// Checkout intent captured while the user authenticates.
///
/// Consumed read-once-then-delete: the first restore after login wins, and
/// re-renders that trigger another restore find nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingCheckout {
    pub shipping_address: String,
    pub cart: Vec<CartLine>,
    pub deferred_at: DateTime<Utc>,
}

/// What the caller should do after a checkout step.
#[derive(Debug, PartialEq)]
pub enum CheckoutSignal {
    /// Order accepted; the cart is already cleared. Navigate to order
    /// history and reset the address field.
    Completed(OrderSummary),
    /// Not authenticated; intent has been stashed. Redirect to login.
    RedirectToLogin,
}

/// Errors surfaced to the checkout form. None are fatal: validation errors
/// recover locally, remote errors leave the cart intact for retry.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty")]
    EmptyCart,

    #[error("Please enter a shipping address")]
    MissingAddress,

    #[error("An order submission is already in progress")]
    InFlight,

    /// Submission rejected; carries the server message when one was given.
    #[error("{message}")]
    Remote { message: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<ApiError> for CheckoutError {
    fn from(err: ApiError) -> Self {
        let message = match err {
            ApiError::Server {
                message: Some(message),
                ..
            } => message,
            _ => GENERIC_SUBMIT_FAILURE.to_string(),
        };
        Self::Remote { message }
    }
}

/// Order-submission collaborator.
///
/// Implemented by [`OrderApi`](crate::api::OrderApi) and by test doubles.
pub trait SubmitOrders {
    /// Submit an order for the current session.
    fn submit(
        &self,
        request: &OrderRequest,
    ) -> impl Future<Output = Result<OrderSummary, ApiError>> + Send;
}

/// State machine over checkout intent.
pub struct CheckoutCoordinator<G: SubmitOrders> {
    gateway: G,
    guard: SessionGuard,
    store: Arc<dyn StateStore>,
    in_flight: bool,
}

impl<G: SubmitOrders> CheckoutCoordinator<G> {
    /// Create a coordinator over the shared store.
    #[must_use]
    pub fn new(gateway: G, guard: SessionGuard, store: Arc<dyn StateStore>) -> Self {
        Self {
            gateway,
            guard,
            store,
            in_flight: false,
        }
    }

    /// Attempt to place an order for the current cart.
    ///
    /// Validation failures and the unauthenticated path never reach the
    /// order collaborator. While unauthenticated, the cart snapshot and
    /// address are stashed as a [`PendingCheckout`] and the caller is told
    /// to redirect; submission is never retried automatically.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::EmptyCart`] / [`CheckoutError::MissingAddress`]:
    ///   recovered locally, no side effects.
    /// - [`CheckoutError::InFlight`]: a previous submit has not settled.
    /// - [`CheckoutError::Remote`]: the collaborator rejected the order;
    ///   cart and address are left intact for retry.
    pub async fn submit(
        &mut self,
        cart: &mut CartStore,
        shipping_address: &str,
    ) -> Result<CheckoutSignal, CheckoutError> {
        if self.in_flight {
            return Err(CheckoutError::InFlight);
        }
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if shipping_address.trim().is_empty() {
            return Err(CheckoutError::MissingAddress);
        }

        if !self.guard.is_valid() {
            let pending = PendingCheckout {
                shipping_address: shipping_address.to_string(),
                cart: cart.snapshot(),
                deferred_at: Utc::now(),
            };
            storage::write_json(self.store.as_ref(), keys::PENDING_CHECKOUT, &pending)?;
            tracing::debug!("Deferred checkout pending authentication");
            return Ok(CheckoutSignal::RedirectToLogin);
        }

        let request = OrderRequest {
            items: cart
                .lines()
                .iter()
                .map(|line| OrderItemRequest {
                    product_id: line.product_id,
                    quantity: line.quantity,
                })
                .collect(),
            shipping_address: shipping_address.to_string(),
        };

        self.in_flight = true;
        let result = self.gateway.submit(&request).await;
        self.in_flight = false;

        match result {
            Ok(summary) => {
                cart.clear()?;
                Ok(CheckoutSignal::Completed(summary))
            }
            Err(err) => {
                tracing::warn!("Order submission failed: {err}");
                Err(err.into())
            }
        }
    }

    /// Restore a deferred checkout after authentication completes.
    ///
    /// Reads the pending record once, repopulates the cart with the
    /// deferred snapshot, deletes the record, and returns the shipping
    /// address for the caller to put back in the form. A second call (e.g.
    /// from a re-render) finds no record and returns `None`. Records older
    /// than [`PENDING_CHECKOUT_MAX_AGE_HOURS`] are discarded unrestored.
    /// Does not auto-submit; resubmission is a fresh user action.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or updated.
    pub fn resume(&mut self, cart: &mut CartStore) -> Result<Option<String>, StoreError> {
        if !self.guard.is_valid() {
            return Ok(None);
        }

        let pending =
            match storage::read_json::<PendingCheckout>(self.store.as_ref(), keys::PENDING_CHECKOUT)
            {
                Ok(Some(pending)) => pending,
                Ok(None) => return Ok(None),
                Err(e) => {
                    tracing::warn!("Discarding unreadable pending checkout: {e}");
                    self.store.remove(keys::PENDING_CHECKOUT)?;
                    return Ok(None);
                }
            };

        // Read-once-then-delete keeps repeated restores idempotent.
        self.store.remove(keys::PENDING_CHECKOUT)?;

        let age = Utc::now() - pending.deferred_at;
        if age > Duration::hours(PENDING_CHECKOUT_MAX_AGE_HOURS) {
            tracing::debug!("Discarding stale pending checkout ({age})");
            return Ok(None);
        }

        cart.restore(pending.cart)?;
        Ok(Some(pending.shipping_address))
    }
}
