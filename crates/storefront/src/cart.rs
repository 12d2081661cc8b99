//! Persisted shopping cart.
//!
//! The cart is an ordered sequence of lines (insertion order = add order)
//! with at most one line per product. Every mutation synchronously
//! re-serializes the full cart into the durable store, so a page reload
//! reconstructs identical state. No network calls originate here.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use workflow_commerce_core::{Price, ProductId};

use crate::storage::{self, StateStore, StoreError, keys};

/// One product + quantity entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub sku: String,
    pub unit_price: Price,
    /// Never below 1; removal deletes the line instead of allowing 0.
    pub quantity: u32,
}

impl CartLine {
    /// Extended amount for this line (unit price x quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.times(self.quantity)
    }
}

/// Product data needed to add a cart line.
///
/// The catalog pages supply this from the product listing they already
/// fetched; the cart never re-fetches product data itself.
#[derive(Debug, Clone)]
pub struct ProductRef {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub price: Price,
}

/// In-memory cart backed by a durable snapshot.
///
/// The cart store is the sole writer of the [`keys::CART`] slot; all other
/// components only read snapshots.
pub struct CartStore {
    store: Arc<dyn StateStore>,
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Open the cart, reloading any persisted snapshot.
    ///
    /// A missing or unreadable snapshot yields an empty cart; corruption is
    /// logged and discarded rather than surfaced.
    #[must_use]
    pub fn open(store: Arc<dyn StateStore>) -> Self {
        let lines = match storage::read_json::<Vec<CartLine>>(store.as_ref(), keys::CART) {
            Ok(Some(lines)) => lines,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Discarding unreadable cart snapshot: {e}");
                Vec::new()
            }
        };

        Self { store, lines }
    }

    /// Add `quantity` units of a product.
    ///
    /// If the product is already in the cart its quantity is incremented;
    /// otherwise a new line is appended. A zero quantity is clamped to 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    pub fn add(&mut self, product: &ProductRef, quantity: u32) -> Result<(), StoreError> {
        let quantity = quantity.max(1);

        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity += quantity,
            None => self.lines.push(CartLine {
                product_id: product.id,
                product_name: product.name.clone(),
                sku: product.sku.clone(),
                unit_price: product.price,
                quantity,
            }),
        }

        self.persist()
    }

    /// Set a line's quantity directly.
    ///
    /// Quantities below 1 are rejected at this boundary: the prior value is
    /// retained and nothing is persisted. Unknown products are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: u32) -> Result<(), StoreError> {
        if quantity < 1 {
            return Ok(());
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product_id) {
            line.quantity = quantity;
            self.persist()?;
        }

        Ok(())
    }

    /// Remove a product's line; no-op if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    pub fn remove(&mut self, product_id: ProductId) -> Result<(), StoreError> {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() != before {
            self.persist()?;
        }

        Ok(())
    }

    /// Empty the cart and purge the persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be purged.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.lines.clear();
        self.store.remove(keys::CART)
    }

    /// Replace the cart contents wholesale (deferred-checkout restore).
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be persisted.
    pub fn restore(&mut self, lines: Vec<CartLine>) -> Result<(), StoreError> {
        self.lines = lines;
        self.persist()
    }

    /// Current total: sum of unit price x quantity over all lines.
    ///
    /// Always recomputed, never stored, so it cannot drift from the lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Cart lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Clone of the current lines, for deferred-checkout snapshots.
    #[must_use]
    pub fn snapshot(&self) -> Vec<CartLine> {
        self.lines.clone()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    fn persist(&self) -> Result<(), StoreError> {
        storage::write_json(self.store.as_ref(), keys::CART, &self.lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use workflow_commerce_core::Price;

    fn widget() -> ProductRef {
        ProductRef {
            id: ProductId::new(1),
            name: "Widget".to_string(),
            sku: "A1".to_string(),
            price: Price::usd(Decimal::new(999, 2)),
        }
    }

    fn gadget() -> ProductRef {
        ProductRef {
            id: ProductId::new(2),
            name: "Gadget".to_string(),
            sku: "B2".to_string(),
            price: Price::usd(Decimal::new(500, 2)),
        }
    }

    fn open_cart() -> (Arc<MemoryStore>, CartStore) {
        let store = Arc::new(MemoryStore::new());
        let cart = CartStore::open(store.clone());
        (store, cart)
    }

    #[test]
    fn test_add_merges_by_product() {
        let (_, mut cart) = open_cart();
        cart.add(&widget(), 2).unwrap();
        cart.add(&widget(), 3).unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_add_clamps_zero_quantity() {
        let (_, mut cart) = open_cart();
        cart.add(&widget(), 0).unwrap();

        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let (_, mut cart) = open_cart();
        cart.add(&widget(), 1).unwrap();
        cart.add(&gadget(), 1).unwrap();
        cart.add(&widget(), 1).unwrap();

        let skus: Vec<_> = cart.lines().iter().map(|l| l.sku.as_str()).collect();
        assert_eq!(skus, vec!["A1", "B2"]);
    }

    #[test]
    fn test_total_recomputed_from_lines() {
        let (_, mut cart) = open_cart();
        assert_eq!(cart.total(), Decimal::ZERO);

        cart.add(&widget(), 2).unwrap();
        cart.add(&gadget(), 1).unwrap();
        // 2 x 9.99 + 1 x 5.00
        assert_eq!(cart.total(), Decimal::new(2498, 2));

        cart.update_quantity(ProductId::new(1), 1).unwrap();
        assert_eq!(cart.total(), Decimal::new(1499, 2));

        cart.remove(ProductId::new(2)).unwrap();
        assert_eq!(cart.total(), Decimal::new(999, 2));
    }

    #[test]
    fn test_update_quantity_rejects_zero() {
        let (_, mut cart) = open_cart();
        cart.add(&widget(), 3).unwrap();

        cart.update_quantity(ProductId::new(1), 0).unwrap();
        assert_eq!(cart.lines()[0].quantity, 3);
    }

    #[test]
    fn test_update_unknown_product_is_noop() {
        let (_, mut cart) = open_cart();
        cart.update_quantity(ProductId::new(99), 5).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (_, mut cart) = open_cart();
        cart.add(&widget(), 1).unwrap();
        cart.remove(ProductId::new(99)).unwrap();

        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_reload_reconstructs_identical_state() {
        let store = Arc::new(MemoryStore::new());

        let mut cart = CartStore::open(store.clone());
        cart.add(&widget(), 2).unwrap();
        cart.add(&gadget(), 1).unwrap();
        let before = cart.snapshot();

        // Simulated page reload
        let cart = CartStore::open(store);
        assert_eq!(cart.snapshot(), before);
        assert_eq!(cart.total(), Decimal::new(2498, 2));
    }

    #[test]
    fn test_clear_purges_persisted_snapshot() {
        let (store, mut cart) = open_cart();
        cart.add(&widget(), 1).unwrap();
        assert!(store.get(keys::CART).unwrap().is_some());

        cart.clear().unwrap();
        assert!(cart.is_empty());
        assert!(store.get(keys::CART).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_snapshot_yields_empty_cart() {
        let store = Arc::new(MemoryStore::new());
        store.put(keys::CART, "{broken").unwrap();

        let cart = CartStore::open(store);
        assert!(cart.is_empty());
    }
}
