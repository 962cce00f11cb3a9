//! Cache name derivation.
//!
//! # Usage
//!
//! ```bash
//! # Hash the worker script named by BOBA_WORKER_SCRIPT
//! boba-cli cache-name
//!
//! # Hash a specific script
//! boba-cli cache-name --script dist/service-worker.js
//! ```
//!
//! A missing script falls back to a name derived from the scope URL.

use std::path::Path;

use boba_lab_offline::CacheName;
use tracing::{info, warn};
use url::Url;

/// Derive the cache name for `script` under `scope`.
///
/// # Errors
///
/// Returns an error if the script exists but cannot be read.
pub fn derive(prefix: &str, script: &Path, scope: &Url) -> Result<CacheName, std::io::Error> {
    let bytes = match std::fs::read(script) {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(script = %script.display(), "Worker script not found, deriving from scope");
            None
        }
        Err(e) => return Err(e),
    };

    let name = CacheName::derive(prefix, bytes.as_deref(), scope);
    info!(cache = %name, "Derived cache name");
    Ok(name)
}

/// Print the derived cache name.
///
/// # Errors
///
/// See [`derive`].
#[allow(clippy::print_stdout)]
pub fn run(prefix: &str, script: &Path, scope: &Url) -> Result<(), Box<dyn std::error::Error>> {
    let name = derive(prefix, script, scope)?;
    println!("{name}");
    Ok(())
}
