//! Workflow Commerce Core - Shared types library.
//!
//! This crate provides common types used across all Workflow Commerce
//! components:
//! - `storefront` - Cart, checkout, and session core consumed by the
//!   customer-facing pages
//! - admin and catalog views (external collaborators of the storefront core)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, roles, and
//!   order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
