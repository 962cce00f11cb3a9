//! One version of the offline worker: install, activate and fetch handling.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::Result;
use crate::cache_name::{CacheName, DEFAULT_PREFIX};
use crate::error::OfflineError;
use crate::fetcher::Fetcher;
use crate::manifest::{AssetManifest, ROOT_DOCUMENT, resolve_path};
use crate::request::{CacheMode, Request, Response};
use crate::storage::CacheStorage;

/// Lifecycle phase of a worker version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    /// Script evaluated, nothing cached yet.
    Parsed,
    Installing,
    /// Precache complete; waiting to take control.
    Installed,
    Activating,
    /// Controls clients and answers their requests.
    Activated,
    /// Failed to install or superseded by a newer version.
    Redundant,
}

/// Static configuration of one worker version.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Scope URL; also defines the intercepted origin.
    pub scope: Url,
    /// URL of the worker script itself, never intercepted.
    pub script_url: Url,
    /// Current cache name; every other cache is purged on activation.
    pub cache_name: CacheName,
    pub manifest: AssetManifest,
    /// Path of the navigation fallback, relative to `scope`.
    pub root_document: String,
}

impl WorkerConfig {
    /// Configuration for a script, naming the cache after its contents.
    ///
    /// When `script` is `None` the cache name is derived from the scope.
    #[must_use]
    pub fn for_script(prefix: &str, scope: Url, script_url: Url, script: Option<&[u8]>) -> Self {
        let cache_name = CacheName::derive(prefix, script, &scope);
        Self {
            scope,
            script_url,
            cache_name,
            manifest: AssetManifest::boba_lab(),
            root_document: ROOT_DOCUMENT.to_string(),
        }
    }

    /// Configuration with the default prefix and the built-in manifest.
    #[must_use]
    pub fn boba_lab(scope: Url, script_url: Url, script: Option<&[u8]>) -> Self {
        Self::for_script(DEFAULT_PREFIX, scope, script_url, script)
    }

    /// Replace the asset manifest.
    #[must_use]
    pub fn with_manifest(mut self, manifest: AssetManifest) -> Self {
        self.manifest = manifest;
        self
    }

    /// Replace the cache name.
    #[must_use]
    pub fn with_cache_name(mut self, cache_name: CacheName) -> Self {
        self.cache_name = cache_name;
        self
    }
}

/// Where a response handed back to the page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Network,
    Cache,
    /// The cached root document, served for an uncached offline navigation.
    Fallback,
}

/// Result of handing a request to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Not intercepted; the page goes to the network directly.
    Passthrough,
    Respond {
        response: Response,
        source: ResponseSource,
    },
}

impl FetchOutcome {
    const fn respond(response: Response, source: ResponseSource) -> Self {
        Self::Respond { response, source }
    }

    /// The response, if the worker answered.
    #[must_use]
    pub const fn response(&self) -> Option<&Response> {
        match self {
            Self::Passthrough => None,
            Self::Respond { response, .. } => Some(response),
        }
    }

    /// The response source, if the worker answered.
    #[must_use]
    pub const fn source(&self) -> Option<ResponseSource> {
        match self {
            Self::Passthrough => None,
            Self::Respond { source, .. } => Some(*source),
        }
    }
}

/// One worker version bound to a network and a cache storage.
pub struct OfflineWorker<F, S> {
    config: WorkerConfig,
    fetcher: Arc<F>,
    storage: Arc<S>,
    phase: WorkerPhase,
    /// Background revalidations still running.
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl<F: Fetcher, S: CacheStorage> OfflineWorker<F, S> {
    /// Create a worker in the `Parsed` phase.
    #[must_use]
    pub fn new(config: WorkerConfig, fetcher: Arc<F>, storage: Arc<S>) -> Self {
        Self {
            config,
            fetcher,
            storage,
            phase: WorkerPhase::Parsed,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> WorkerPhase {
        self.phase
    }

    /// Name of this version's cache.
    #[must_use]
    pub const fn cache_name(&self) -> &CacheName {
        &self.config.cache_name
    }

    #[must_use]
    pub const fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Returns true if the worker handles `request` at all: same-origin GET
    /// requests other than the worker script.
    #[must_use]
    pub fn intercepts(&self, request: &Request) -> bool {
        request.method == reqwest::Method::GET
            && request.url.origin() == self.config.scope.origin()
            && request.url.path() != self.config.script_url.path()
    }

    fn expect_phase(&self, expected: WorkerPhase) -> Result<()> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(OfflineError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Fetch every manifest asset and store them in the current cache.
    ///
    /// All assets are fetched before anything is written, so a failure leaves
    /// cache storage untouched and the worker `Redundant`.
    ///
    /// # Errors
    ///
    /// - [`OfflineError::InvalidPhase`] unless the worker is `Parsed`
    /// - [`OfflineError::Manifest`] if a path does not resolve
    /// - [`OfflineError::Network`] / [`OfflineError::BadStatus`] for any asset
    #[instrument(skip(self), fields(cache = %self.config.cache_name))]
    pub async fn install(&mut self) -> Result<usize> {
        self.expect_phase(WorkerPhase::Parsed)?;
        self.phase = WorkerPhase::Installing;

        match self.precache().await {
            Ok(count) => {
                self.phase = WorkerPhase::Installed;
                info!(assets = count, "Worker installed");
                Ok(count)
            }
            Err(e) => {
                self.phase = WorkerPhase::Redundant;
                warn!(error = %e, "Worker install failed");
                Err(e)
            }
        }
    }

    async fn precache(&self) -> Result<usize> {
        let urls = self.config.manifest.resolve(&self.config.scope)?;

        let mut fetched = Vec::with_capacity(urls.len());
        for url in urls {
            let request = Request::get(url).with_cache(CacheMode::Reload);
            let response =
                self.fetcher
                    .fetch(&request)
                    .await
                    .map_err(|source| OfflineError::Network {
                        url: request.url.to_string(),
                        source,
                    })?;
            if !response.is_ok() {
                return Err(OfflineError::BadStatus {
                    url: request.url.to_string(),
                    status: response.status,
                });
            }
            fetched.push((request.url, response));
        }

        let name = &self.config.cache_name;
        self.storage.open(name).await?;
        let count = fetched.len();
        for (url, response) in fetched {
            self.storage.put(name, &url, response).await?;
        }
        Ok(count)
    }

    /// Delete every cache other than the current one and take control.
    ///
    /// Returns the names of the deleted caches.
    ///
    /// # Errors
    ///
    /// [`OfflineError::InvalidPhase`] unless the worker is `Installed`, or a
    /// storage error while purging.
    #[instrument(skip(self), fields(cache = %self.config.cache_name))]
    pub async fn activate(&mut self) -> Result<Vec<CacheName>> {
        self.expect_phase(WorkerPhase::Installed)?;
        self.phase = WorkerPhase::Activating;

        match self.purge_stale_caches().await {
            Ok(deleted) => {
                self.phase = WorkerPhase::Activated;
                info!(deleted = deleted.len(), "Worker activated");
                Ok(deleted)
            }
            Err(e) => {
                self.phase = WorkerPhase::Redundant;
                warn!(error = %e, "Worker activation failed");
                Err(e)
            }
        }
    }

    async fn purge_stale_caches(&self) -> Result<Vec<CacheName>> {
        let mut deleted = Vec::new();
        for name in self.storage.keys().await? {
            if name != self.config.cache_name && self.storage.delete(&name).await? {
                debug!(cache = %name, "Deleted stale cache");
                deleted.push(name);
            }
        }
        Ok(deleted)
    }

    /// Mark a superseded version.
    pub(crate) const fn retire(&mut self) {
        self.phase = WorkerPhase::Redundant;
    }

    /// Answer an intercepted request.
    ///
    /// Workers that are not `Activated` pass everything through.
    ///
    /// # Errors
    ///
    /// - [`OfflineError::NoFallback`] for a failed navigation with no cached
    ///   copy and no cached root document
    /// - [`OfflineError::Network`] for a failed subresource with no cached copy
    #[instrument(skip(self, request), fields(url = %request.url, mode = ?request.mode))]
    pub async fn handle_fetch(&self, request: Request) -> Result<FetchOutcome> {
        if self.phase != WorkerPhase::Activated || !self.intercepts(&request) {
            return Ok(FetchOutcome::Passthrough);
        }

        if request.is_navigation() {
            self.network_first(request).await
        } else {
            self.stale_while_revalidate(request).await
        }
    }

    async fn network_first(&self, request: Request) -> Result<FetchOutcome> {
        match self.fetcher.fetch(&request).await {
            Ok(response) => {
                if let Err(e) = self.store(&request.url, response.clone()).await {
                    debug!(error = %e, "Could not store navigation response");
                }
                Ok(FetchOutcome::respond(response, ResponseSource::Network))
            }
            Err(e) => {
                debug!(error = %e, "Navigation offline, trying cache");
                if let Some(cached) = self.storage.match_any(&request.url).await? {
                    return Ok(FetchOutcome::respond(cached, ResponseSource::Cache));
                }

                let root = resolve_path(&self.config.scope, &self.config.root_document)?;
                match self.storage.match_any(&root).await? {
                    Some(document) => Ok(FetchOutcome::respond(document, ResponseSource::Fallback)),
                    None => Err(OfflineError::NoFallback(request.url.to_string())),
                }
            }
        }
    }

    async fn stale_while_revalidate(&self, request: Request) -> Result<FetchOutcome> {
        let name = &self.config.cache_name;

        if let Some(cached) = self.storage.match_in(name, &request.url).await? {
            debug!("Cache hit, revalidating in background");
            self.spawn_revalidation(request);
            return Ok(FetchOutcome::respond(cached, ResponseSource::Cache));
        }

        let response = self
            .fetcher
            .fetch(&request)
            .await
            .map_err(|source| OfflineError::Network {
                url: request.url.to_string(),
                source,
            })?;

        if response.is_cacheable()
            && let Err(e) = self.store(&request.url, response.clone()).await
        {
            debug!(error = %e, "Could not store network response");
        }
        Ok(FetchOutcome::respond(response, ResponseSource::Network))
    }

    fn spawn_revalidation(&self, request: Request) {
        let fetcher = Arc::clone(&self.fetcher);
        let storage = Arc::clone(&self.storage);
        let name = self.config.cache_name.clone();

        let handle = tokio::spawn(async move {
            match fetcher.fetch(&request).await {
                // A deleted cache stays deleted; the put fails with MissingCache
                Ok(response) if response.is_cacheable() => {
                    if let Err(e) = storage.put(&name, &request.url, response).await {
                        debug!(url = %request.url, error = %e, "Revalidation store skipped");
                    }
                }
                Ok(response) => {
                    debug!(url = %request.url, status = response.status, "Revalidation response not cacheable");
                }
                Err(e) => {
                    debug!(url = %request.url, error = %e, "Revalidation fetch failed");
                }
            }
        });

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.retain(|h| !h.is_finished());
        pending.push(handle);
    }

    async fn store(&self, url: &Url, response: Response) -> Result<()> {
        let name = &self.config.cache_name;
        self.storage.open(name).await?;
        self.storage.put(name, url, response).await?;
        Ok(())
    }

    /// Wait for every background revalidation started so far.
    pub async fn wait_until_idle(&self) {
        loop {
            let handles = std::mem::take(
                &mut *self.pending.lock().unwrap_or_else(PoisonError::into_inner),
            );
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    debug!(error = %e, "Revalidation task aborted");
                }
            }
        }
    }
}
