//! Workflow Commerce storefront core library.
//!
//! This crate provides the client-side core of the storefront as a library,
//! allowing it to be tested and reused. Page-level views call into it:
//! the persisted shopping cart, the checkout coordinator with deferred
//! (post-login) resumption, and the session guard that validates cached
//! bearer credentials before authenticated calls are attempted.
//!
//! State that must survive page reloads goes through the [`storage`]
//! contract; network access goes through the [`api`] clients.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod fetch;
pub mod session;
pub mod storage;
