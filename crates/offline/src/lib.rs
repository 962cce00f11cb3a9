//! Boba Lab offline cache manager.
//!
//! The background-worker half of the Boba Lab site: install a named cache of
//! static assets, purge stale caches on activation, and answer intercepted
//! requests from the network or the cache.
//!
//! # Architecture
//!
//! - [`CacheStorage`] - named caches of captured responses (in-memory impl via `moka`)
//! - [`Fetcher`] - the network (`reqwest` impl for real origins)
//! - [`OfflineWorker`] - one worker version: install, activate, fetch handling
//! - [`Registration`] - active and waiting versions, client count, `SKIP_WAITING`
//!
//! # Serving policies
//!
//! | request | policy |
//! |---------|--------|
//! | navigation | network first, then cached copy, then cached root document |
//! | other same-origin GET | stale-while-revalidate |
//! | cross-origin, non-GET, the worker script | not intercepted |
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use boba_lab_offline::{HttpFetcher, MemoryCacheStorage, OfflineWorker, Registration, WorkerConfig};
//!
//! let storage = Arc::new(MemoryCacheStorage::new());
//! let config = WorkerConfig::for_script("boba-lab", scope, script_url, Some(&script_bytes));
//! let worker = OfflineWorker::new(config, Arc::new(HttpFetcher::new()), Arc::clone(&storage));
//!
//! let mut registration = Registration::new();
//! registration.register(worker).await?;
//! let outcome = registration.handle_fetch(Request::navigate(url)).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cache_name;
pub mod error;
pub mod fetcher;
pub mod manifest;
pub mod message;
pub mod registration;
pub mod request;
pub mod storage;
pub mod worker;

pub use cache_name::CacheName;
pub use error::{FetchError, ManifestError, OfflineError, StorageError};
pub use fetcher::{Fetcher, HttpFetcher};
pub use manifest::AssetManifest;
pub use message::WorkerMessage;
pub use registration::{Activation, RegisterOutcome, Registration};
pub use request::{CacheMode, Request, RequestMode, Response, ResponseKind};
pub use storage::{CacheStorage, MemoryCacheStorage};
pub use worker::{FetchOutcome, OfflineWorker, ResponseSource, WorkerConfig, WorkerPhase};

/// Result type alias for [`OfflineError`].
pub type Result<T> = std::result::Result<T, OfflineError>;
