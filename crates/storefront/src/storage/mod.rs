//! Durable client-side state storage.
//!
//! The cart, the cached session, and any deferred checkout intent live in a
//! process-wide key-value slot that must survive page reloads. Components
//! never touch that slot directly; they go through the [`StateStore`]
//! contract so tests can substitute an in-memory store.
//!
//! [`MemoryStore`] is the ephemeral implementation, [`FileStore`] the
//! durable one (a single JSON object file).

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Well-known storage slots.
///
/// Key names match what the storefront pages historically stored, so a
/// deployed state file keeps working across upgrades.
pub mod keys {
    /// Key for the persisted cart snapshot.
    pub const CART: &str = "cart";

    /// Key for a deferred checkout awaiting authentication.
    pub const PENDING_CHECKOUT: &str = "pendingCheckout";

    /// Key for the cached session (identity + bearer token).
    pub const USER: &str = "user";
}

/// Errors that can occur when reading or writing durable state.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be (de)serialized.
    #[error("Storage serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// A concurrent writer panicked while holding the store lock.
    #[error("Storage lock poisoned")]
    Poisoned,
}

/// Key-value contract for durable client-side state.
///
/// Values are opaque strings; typed access goes through [`read_json`] and
/// [`write_json`]. Implementations must be safe to share across the
/// single-threaded UI event loop and async task completions.
pub trait StateStore: Send + Sync {
    /// Read the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete the value under `key`; no-op if absent.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Read and deserialize the JSON value stored under `key`.
///
/// # Errors
///
/// Returns an error if the store fails or the stored value is not valid
/// JSON for `T`.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn StateStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize `value` to JSON and store it under `key`.
///
/// # Errors
///
/// Returns an error if serialization or the store fails.
pub fn write_json<T: Serialize>(
    store: &dyn StateStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    store.put(key, &serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_roundtrip() {
        let store = MemoryStore::new();
        write_json(&store, "k", &vec![1, 2, 3]).unwrap();

        let back: Option<Vec<i32>> = read_json(&store, "k").unwrap();
        assert_eq!(back, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_read_missing_key() {
        let store = MemoryStore::new();
        let back: Option<String> = read_json(&store, "missing").unwrap();
        assert_eq!(back, None);
    }

    #[test]
    fn test_read_malformed_value() {
        let store = MemoryStore::new();
        store.put("k", "not json").unwrap();
        assert!(read_json::<Vec<i32>>(&store, "k").is_err());
    }
}
