//! Integration tests for Boba Lab.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p boba-lab-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `order_session` - cart, promo and checkout flows against the built-in menu
//! - `offline_lifecycle` - worker install, update, activation and offline serving
//!
//! The offline tests run against [`MockNetwork`], an in-memory origin that
//! serves scripted responses and can be switched offline.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use boba_lab_offline::{
    AssetManifest, FetchError, Fetcher, MemoryCacheStorage, OfflineWorker, Request, Response,
    WorkerConfig,
};
use url::Url;

/// Scope of the mock site.
pub const ORIGIN: &str = "http://boba.test/";

/// In-memory origin with scripted responses.
///
/// Unscripted URLs answer `404`. While offline every fetch fails.
#[derive(Debug, Default)]
pub struct MockNetwork {
    responses: Mutex<HashMap<String, Response>>,
    offline: AtomicBool,
    requests: AtomicUsize,
}

impl MockNetwork {
    /// A network serving every path of `manifest` with its path as the body.
    #[must_use]
    pub fn serving(manifest: &AssetManifest) -> Self {
        let network = Self::default();
        for path in manifest.paths() {
            let url = url(path);
            let body = format!("cached {}", url.path());
            network.serve(url.as_str(), Response::ok(body));
        }
        network
    }

    /// Script the response for `url`.
    pub fn serve(&self, url: &str, response: Response) {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string(), response);
    }

    /// Switch the network on or off.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of fetches attempted so far.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl Fetcher for MockNetwork {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(FetchError::Offline(request.url.to_string()));
        }

        let mut key = request.url.clone();
        key.set_fragment(None);
        Ok(self
            .responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key.as_str())
            .cloned()
            .unwrap_or_else(|| Response::with_status(404, "not found")))
    }
}

/// Resolve `path` against [`ORIGIN`].
///
/// # Panics
///
/// Panics if `path` does not form a valid URL; test paths are literals.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn url(path: &str) -> Url {
    Url::parse(ORIGIN).unwrap().join(path).unwrap()
}

/// A worker for `script` over the Boba Lab manifest.
#[must_use]
pub fn boba_worker(
    script: &[u8],
    network: &Arc<MockNetwork>,
    storage: &Arc<MemoryCacheStorage>,
) -> OfflineWorker<MockNetwork, MemoryCacheStorage> {
    let config = WorkerConfig::boba_lab(url("./"), url("service-worker.js"), Some(script));
    OfflineWorker::new(config, Arc::clone(network), Arc::clone(storage))
}
