//! Cache name derivation.
//!
//! The current cache name is either a static version tag or derived from a
//! SHA-256 of the worker script, so that any change to the script retires
//! every previously cached asset on the next install/activate cycle.

use core::fmt;

use sha2::{Digest, Sha256};
use url::Url;

/// Prefix for derived cache names.
pub const DEFAULT_PREFIX: &str = "boba-lab";

/// Static version tag used before content hashing was introduced.
pub const STATIC_CACHE_NAME: &str = "boba-lab-cache-v1";

/// Number of hex digits of the script digest kept in the name.
const HASH_LEN: usize = 16;

/// Name of one cache in cache storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheName(String);

impl CacheName {
    /// Use `tag` verbatim.
    #[must_use]
    pub fn versioned(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// `{prefix}-{first 16 hex digits of sha256(script)}`.
    #[must_use]
    pub fn from_script(prefix: &str, script: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(script);
        let hash = format!("{:x}", hasher.finalize());
        let short_hash: String = hash.chars().take(HASH_LEN).collect();
        Self(format!("{prefix}-{short_hash}"))
    }

    /// `{prefix}-{sanitized scope}` for when the script bytes are unavailable.
    ///
    /// Non-alphanumeric runs become a single `-`; leading and trailing dashes
    /// are trimmed.
    #[must_use]
    pub fn from_scope(prefix: &str, scope: &Url) -> Self {
        let mut sanitized = String::with_capacity(scope.as_str().len());
        for c in scope.as_str().chars() {
            if c.is_ascii_alphanumeric() {
                sanitized.push(c.to_ascii_lowercase());
            } else if !sanitized.ends_with('-') {
                sanitized.push('-');
            }
        }
        Self(format!("{prefix}-{}", sanitized.trim_matches('-')))
    }

    /// Hash the script if available, otherwise fall back to the scope.
    #[must_use]
    pub fn derive(prefix: &str, script: Option<&[u8]>, scope: &Url) -> Self {
        script.map_or_else(
            || Self::from_scope(prefix, scope),
            |bytes| Self::from_script(prefix, bytes),
        )
    }

    /// Get the underlying name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Default for CacheName {
    fn default() -> Self {
        Self::versioned(STATIC_CACHE_NAME)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_script_is_stable() {
        let a = CacheName::from_script(DEFAULT_PREFIX, b"self.addEventListener('fetch', f);");
        let b = CacheName::from_script(DEFAULT_PREFIX, b"self.addEventListener('fetch', f);");
        assert_eq!(a, b);
        assert!(a.as_str().starts_with("boba-lab-"));
        assert_eq!(a.as_str().len(), "boba-lab-".len() + 16);
    }

    #[test]
    fn test_script_change_changes_name() {
        let a = CacheName::from_script(DEFAULT_PREFIX, b"v1");
        let b = CacheName::from_script(DEFAULT_PREFIX, b"v2");
        assert_ne!(a, b);
    }

    #[test]
    fn test_known_digest() {
        // sha256("") = e3b0c44298fc1c149afbf4c8996fb924...
        let name = CacheName::from_script("x", b"");
        assert_eq!(name.as_str(), "x-e3b0c44298fc1c14");
    }

    #[test]
    fn test_from_scope_sanitizes() {
        let scope = Url::parse("https://Boba.Test:8443/shop/").unwrap();
        let name = CacheName::from_scope(DEFAULT_PREFIX, &scope);
        assert_eq!(name.as_str(), "boba-lab-https-boba-test-8443-shop");
    }

    #[test]
    fn test_derive_falls_back_to_scope() {
        let scope = Url::parse("http://boba.test/").unwrap();
        assert_eq!(
            CacheName::derive(DEFAULT_PREFIX, None, &scope),
            CacheName::from_scope(DEFAULT_PREFIX, &scope)
        );
        assert_eq!(
            CacheName::derive(DEFAULT_PREFIX, Some(b"x".as_slice()), &scope),
            CacheName::from_script(DEFAULT_PREFIX, b"x")
        );
    }

    #[test]
    fn test_default_is_static_tag() {
        assert_eq!(CacheName::default().as_str(), STATIC_CACHE_NAME);
    }
}
