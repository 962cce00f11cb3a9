//! Error types for the offline cache manager.

use thiserror::Error;

use crate::worker::WorkerPhase;

/// A network fetch failed before producing a response.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP client error (connection refused, DNS, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No network available.
    #[error("network unavailable: {0}")]
    Offline(String),
}

/// The asset manifest could not be loaded or resolved.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// JSON parsing failed.
    #[error("manifest parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A path does not resolve to a URL.
    #[error("invalid manifest path {path}: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// A path resolves outside the worker's origin.
    #[error("manifest path {0} is not same-origin")]
    CrossOrigin(String),
}

/// Cache storage operation failed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The named cache was never opened.
    #[error("cache {0} does not exist")]
    MissingCache(String),
}

/// Errors surfaced by the worker and the registration.
#[derive(Debug, Error)]
pub enum OfflineError {
    /// Manifest problem during install.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// Cache storage problem.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Network failure for a request that had no cached answer.
    #[error("fetch of {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: FetchError,
    },

    /// A precache asset answered with a non-OK status.
    #[error("fetch of {url} returned status {status}")]
    BadStatus { url: String, status: u16 },

    /// Navigation failed with nothing cached, not even the root document.
    #[error("no cached response for {0}")]
    NoFallback(String),

    /// Lifecycle operation called in the wrong phase.
    #[error("worker is {actual:?}, expected {expected:?}")]
    InvalidPhase {
        expected: WorkerPhase,
        actual: WorkerPhase,
    },
}
