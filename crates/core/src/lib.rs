//! Boba Lab Core - Shared types library.
//!
//! This crate provides common types used across all Boba Lab components:
//! - `storefront` - Order session, menu and page widgets
//! - `offline` - Offline cache manager (service worker logic)
//! - `cli` - Command-line tools for cache names, precaching and quotes
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no async runtime, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, line keys, prices and payment methods

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
