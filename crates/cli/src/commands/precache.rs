//! Precache dry-run against a live origin.
//!
//! # Usage
//!
//! ```bash
//! # Install the built-in manifest from a local dev server
//! boba-cli precache --origin http://127.0.0.1:8080/
//!
//! # Install a custom manifest
//! boba-cli precache --manifest assets.json
//! ```
//!
//! Runs a full worker install with the HTTP fetcher into in-memory storage
//! and reports how many assets were cached. Any failed asset fails the run.

use std::path::Path;
use std::sync::Arc;

use boba_lab_offline::{AssetManifest, HttpFetcher, MemoryCacheStorage, OfflineWorker, WorkerConfig};
use tracing::info;

/// Load the manifest at `path`, or the built-in one.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a JSON string array.
pub fn load_manifest(path: Option<&Path>) -> Result<AssetManifest, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("Failed to read manifest {}: {e}", path.display()))?;
            Ok(AssetManifest::from_json(&json)?)
        }
        None => Ok(AssetManifest::boba_lab()),
    }
}

/// Install the configured manifest from the configured scope.
///
/// # Errors
///
/// Returns an error if any asset cannot be fetched or answers non-OK.
#[allow(clippy::print_stdout)]
pub async fn run(config: WorkerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let origin = config.scope.clone();
    let storage = Arc::new(MemoryCacheStorage::new());
    let mut worker = OfflineWorker::new(config, Arc::new(HttpFetcher::new()), Arc::clone(&storage));

    info!(origin = %origin, assets = worker.config().manifest.len(), "Starting precache");
    let count = worker.install().await?;

    for url in storage.entries(worker.cache_name()).await {
        info!("  - {url}");
    }
    println!("{count} assets cached in {}", worker.cache_name());

    Ok(())
}
