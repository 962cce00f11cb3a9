//! CLI configuration from environment variables.
//!
//! # Environment Variables
//!
//! - `BOBA_ORIGIN` - scope URL of the site (default `http://127.0.0.1:8080/`)
//! - `BOBA_WORKER_SCRIPT` - path to the worker script (default `service-worker.js`)
//! - `BOBA_CACHE_PREFIX` - prefix for derived cache names (default `boba-lab`)
//! - `BOBA_MANIFEST` - optional JSON manifest of asset paths
//! - `SENTRY_DSN` - optional Sentry DSN for error tracking

use std::path::PathBuf;

use boba_lab_offline::cache_name::DEFAULT_PREFIX;
use thiserror::Error;
use url::Url;

const DEFAULT_ORIGIN: &str = "http://127.0.0.1:8080/";
const DEFAULT_WORKER_SCRIPT: &str = "service-worker.js";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Settings shared by every command; flags override them.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Scope URL (always ends in `/`).
    pub origin: Url,
    pub worker_script: PathBuf,
    pub cache_prefix: String,
    pub manifest: Option<PathBuf>,
    pub sentry_dsn: Option<String>,
}

impl CliConfig {
    /// Load configuration from environment variables, reading `.env` first.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a value does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let origin = parse_origin(&get_or_default("BOBA_ORIGIN", DEFAULT_ORIGIN))
            .map_err(|e| ConfigError::InvalidEnvVar("BOBA_ORIGIN".to_string(), e))?;

        let cache_prefix = get_or_default("BOBA_CACHE_PREFIX", DEFAULT_PREFIX);
        if cache_prefix.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "BOBA_CACHE_PREFIX".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            origin,
            worker_script: PathBuf::from(get_or_default("BOBA_WORKER_SCRIPT", DEFAULT_WORKER_SCRIPT)),
            cache_prefix,
            manifest: lookup("BOBA_MANIFEST").map(PathBuf::from),
            sentry_dsn: lookup("SENTRY_DSN").filter(|dsn| !dsn.is_empty()),
        })
    }
}

/// Parse an HTTP(S) origin or scope URL, adding the trailing `/` that makes
/// relative asset paths resolve beneath it.
///
/// # Errors
///
/// Returns a description of the problem if the URL is malformed or not HTTP.
pub fn parse_origin(value: &str) -> Result<Url, String> {
    let mut url = Url::parse(value).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme {}", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<CliConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        CliConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.origin.as_str(), "http://127.0.0.1:8080/");
        assert_eq!(config.worker_script, PathBuf::from("service-worker.js"));
        assert_eq!(config.cache_prefix, "boba-lab");
        assert!(config.manifest.is_none());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("BOBA_ORIGIN", "https://boba.test/shop"),
            ("BOBA_CACHE_PREFIX", "lab"),
            ("BOBA_MANIFEST", "assets.json"),
            ("SENTRY_DSN", ""),
        ])
        .unwrap();
        assert_eq!(config.origin.as_str(), "https://boba.test/shop/");
        assert_eq!(config.cache_prefix, "lab");
        assert_eq!(config.manifest, Some(PathBuf::from("assets.json")));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_invalid_origin() {
        let err = load(&[("BOBA_ORIGIN", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "BOBA_ORIGIN"));

        let err = load(&[("BOBA_ORIGIN", "ftp://boba.test/")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, msg) if msg.contains("ftp")));
    }

    #[test]
    fn test_empty_prefix_rejected() {
        let err = load(&[("BOBA_CACHE_PREFIX", " ")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "BOBA_CACHE_PREFIX"));
    }
}
