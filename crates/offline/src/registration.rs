//! Worker registration: the active and waiting versions for one scope.

use tracing::{debug, info, instrument};

use crate::Result;
use crate::cache_name::CacheName;
use crate::fetcher::Fetcher;
use crate::message::WorkerMessage;
use crate::request::Request;
use crate::storage::CacheStorage;
use crate::worker::{FetchOutcome, OfflineWorker};

/// A worker taking control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// Cache name of the newly active worker.
    pub cache_name: CacheName,
    /// Stale caches purged during activation.
    pub deleted: Vec<CacheName>,
    /// Open clients claimed by the new worker.
    pub claimed_clients: usize,
}

/// Result of registering a worker version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// Nothing was active; the worker installed and activated at once.
    Activated(Activation),
    /// Installed; waiting for clients to close or for `SKIP_WAITING`.
    Waiting,
    /// Same cache name as the current version; not installed.
    Unchanged,
}

/// Holds the active and waiting workers and the number of open clients.
pub struct Registration<F, S> {
    active: Option<OfflineWorker<F, S>>,
    waiting: Option<OfflineWorker<F, S>>,
    clients: usize,
}

impl<F, S> Default for Registration<F, S> {
    fn default() -> Self {
        Self {
            active: None,
            waiting: None,
            clients: 0,
        }
    }
}

impl<F: Fetcher, S: CacheStorage> Registration<F, S> {
    /// An empty registration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `worker` and activate it if nothing is active yet.
    ///
    /// A newer waiting worker replaces an older one.
    ///
    /// # Errors
    ///
    /// Install or activation errors; the previous workers are left unchanged.
    #[instrument(skip(self, worker), fields(cache = %worker.cache_name()))]
    pub async fn register(&mut self, mut worker: OfflineWorker<F, S>) -> Result<RegisterOutcome> {
        let newest = self.waiting.as_ref().or(self.active.as_ref());
        if newest.is_some_and(|current| current.cache_name() == worker.cache_name()) {
            debug!("Worker unchanged, skipping install");
            return Ok(RegisterOutcome::Unchanged);
        }

        worker.install().await?;

        if self.active.is_none() {
            let activation = self.promote(worker).await?;
            return Ok(RegisterOutcome::Activated(activation));
        }

        if let Some(mut superseded) = self.waiting.replace(worker) {
            superseded.retire();
        }
        info!(clients = self.clients, "Worker waiting");
        Ok(RegisterOutcome::Waiting)
    }

    async fn promote(&mut self, mut worker: OfflineWorker<F, S>) -> Result<Activation> {
        // Old revalidations must land before the purge, not after it
        if let Some(previous) = &self.active {
            previous.wait_until_idle().await;
        }
        let deleted = worker.activate().await?;
        let activation = Activation {
            cache_name: worker.cache_name().clone(),
            deleted,
            claimed_clients: self.clients,
        };
        if let Some(mut previous) = self.active.replace(worker) {
            previous.retire();
        }
        info!(
            cache = %activation.cache_name,
            claimed = activation.claimed_clients,
            "Worker took control"
        );
        Ok(activation)
    }

    async fn activate_waiting(&mut self) -> Result<Option<Activation>> {
        match self.waiting.take() {
            Some(worker) => self.promote(worker).await.map(Some),
            None => Ok(None),
        }
    }

    /// A page under this scope opened. Returns the open client count.
    pub const fn client_opened(&mut self) -> usize {
        self.clients += 1;
        self.clients
    }

    /// A page closed. Activates the waiting worker once no client is left.
    ///
    /// # Errors
    ///
    /// Activation errors of the waiting worker.
    pub async fn client_closed(&mut self) -> Result<Option<Activation>> {
        self.clients = self.clients.saturating_sub(1);
        if self.clients == 0 {
            self.activate_waiting().await
        } else {
            Ok(None)
        }
    }

    /// Deliver a control message.
    ///
    /// # Errors
    ///
    /// Activation errors of the waiting worker.
    pub async fn post_message(&mut self, message: WorkerMessage) -> Result<Option<Activation>> {
        match message {
            WorkerMessage::SkipWaiting => self.activate_waiting().await,
        }
    }

    /// Deliver a raw JSON message; unrecognised messages are ignored.
    ///
    /// # Errors
    ///
    /// See [`Registration::post_message`].
    pub async fn post_raw(&mut self, data: &str) -> Result<Option<Activation>> {
        match WorkerMessage::parse(data) {
            Some(message) => self.post_message(message).await,
            None => {
                debug!(data, "Ignoring unrecognised message");
                Ok(None)
            }
        }
    }

    /// Route a page request through the active worker.
    ///
    /// # Errors
    ///
    /// See [`OfflineWorker::handle_fetch`].
    pub async fn handle_fetch(&self, request: Request) -> Result<FetchOutcome> {
        match &self.active {
            Some(worker) => worker.handle_fetch(request).await,
            None => Ok(FetchOutcome::Passthrough),
        }
    }

    #[must_use]
    pub const fn active(&self) -> Option<&OfflineWorker<F, S>> {
        self.active.as_ref()
    }

    #[must_use]
    pub const fn waiting(&self) -> Option<&OfflineWorker<F, S>> {
        self.waiting.as_ref()
    }

    #[must_use]
    pub const fn clients(&self) -> usize {
        self.clients
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use url::Url;

    use super::*;
    use crate::error::{FetchError, OfflineError};
    use crate::manifest::AssetManifest;
    use crate::request::Response;
    use crate::storage::MemoryCacheStorage;
    use crate::worker::{WorkerConfig, WorkerPhase};

    /// Serves every URL with its path as the body, or fails when `down`.
    struct EchoFetcher {
        down: bool,
    }

    impl Fetcher for EchoFetcher {
        async fn fetch(&self, request: &Request) -> std::result::Result<Response, FetchError> {
            if self.down {
                Err(FetchError::Offline(request.url.to_string()))
            } else {
                Ok(Response::ok(request.url.path()))
            }
        }
    }

    fn worker(
        script: &[u8],
        down: bool,
        storage: &Arc<MemoryCacheStorage>,
    ) -> OfflineWorker<EchoFetcher, MemoryCacheStorage> {
        let scope = Url::parse("http://boba.test/").unwrap();
        let script_url = scope.join("service-worker.js").unwrap();
        let config = WorkerConfig::boba_lab(scope, script_url, Some(script))
            .with_manifest(AssetManifest::new(["./index.html"]));
        OfflineWorker::new(config, Arc::new(EchoFetcher { down }), Arc::clone(storage))
    }

    #[tokio::test]
    async fn test_first_worker_activates_immediately() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let mut registration = Registration::new();
        registration.client_opened();

        let outcome = registration.register(worker(b"v1", false, &storage)).await.unwrap();
        let RegisterOutcome::Activated(activation) = outcome else {
            panic!("expected activation, got {outcome:?}");
        };
        assert_eq!(activation.claimed_clients, 1);
        assert!(activation.deleted.is_empty());
        assert_eq!(registration.active().unwrap().phase(), WorkerPhase::Activated);
    }

    #[tokio::test]
    async fn test_update_waits_for_clients_to_close() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let mut registration = Registration::new();
        registration.register(worker(b"v1", false, &storage)).await.unwrap();
        let old = registration.active().unwrap().cache_name().clone();
        registration.client_opened();
        registration.client_opened();

        let outcome = registration.register(worker(b"v2", false, &storage)).await.unwrap();
        assert_eq!(outcome, RegisterOutcome::Waiting);
        assert_eq!(registration.active().unwrap().cache_name(), &old);

        assert_eq!(registration.client_closed().await.unwrap(), None);
        let activation = registration.client_closed().await.unwrap().unwrap();
        assert_eq!(activation.deleted, vec![old]);
        assert_eq!(activation.claimed_clients, 0);
        assert!(registration.waiting().is_none());
    }

    #[tokio::test]
    async fn test_skip_waiting_message() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let mut registration = Registration::new();
        registration.register(worker(b"v1", false, &storage)).await.unwrap();
        registration.client_opened();
        registration.register(worker(b"v2", false, &storage)).await.unwrap();

        assert_eq!(registration.post_raw(r#"{"type":"PING"}"#).await.unwrap(), None);
        assert!(registration.waiting().is_some());

        let activation = registration
            .post_raw(r#"{"type":"SKIP_WAITING"}"#)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(activation.claimed_clients, 1);
        assert_eq!(storage.keys().await.unwrap(), vec![activation.cache_name]);
    }

    #[tokio::test]
    async fn test_skip_waiting_without_waiting_worker() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let mut registration = Registration::new();
        registration.register(worker(b"v1", false, &storage)).await.unwrap();
        assert_eq!(
            registration.post_message(WorkerMessage::SkipWaiting).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_same_script_is_unchanged() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let mut registration = Registration::new();
        registration.register(worker(b"v1", false, &storage)).await.unwrap();
        assert_eq!(
            registration.register(worker(b"v1", false, &storage)).await.unwrap(),
            RegisterOutcome::Unchanged
        );
    }

    #[tokio::test]
    async fn test_failed_install_keeps_previous_worker() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let mut registration = Registration::new();
        registration.register(worker(b"v1", false, &storage)).await.unwrap();
        let old = registration.active().unwrap().cache_name().clone();

        let err = registration
            .register(worker(b"v2", true, &storage))
            .await
            .unwrap_err();
        assert!(matches!(err, OfflineError::Network { .. }));
        assert_eq!(registration.active().unwrap().cache_name(), &old);
        assert!(registration.waiting().is_none());
        assert_eq!(storage.keys().await.unwrap(), vec![old]);
    }

    #[tokio::test]
    async fn test_no_active_worker_passes_through() {
        let registration: Registration<EchoFetcher, MemoryCacheStorage> = Registration::new();
        let request = Request::get(Url::parse("http://boba.test/style.css").unwrap());
        assert_eq!(
            registration.handle_fetch(request).await.unwrap(),
            FetchOutcome::Passthrough
        );
    }
}
