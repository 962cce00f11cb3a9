//! Static asset manifest fetched at install time.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ManifestError;

/// Root document served when a navigation has neither network nor cache.
pub const ROOT_DOCUMENT: &str = "./index.html";

/// Ordered list of asset paths relative to the worker scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest {
    paths: Vec<String>,
}

impl AssetManifest {
    /// Create a manifest from relative paths.
    #[must_use]
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// The Boba Lab site's pages, stylesheet, script and images.
    #[must_use]
    pub fn boba_lab() -> Self {
        Self::new([
            "./",
            "./index.html",
            "./about.html",
            "./contact.html",
            "./order.html",
            "./404.html",
            "./style.css",
            "./script.js",
            "./Images/AboutUs.webp",
            "./Images/Banner1.webp",
            "./Images/Banner2.webp",
            "./Images/Banner3.webp",
            "./Images/BrownSugar.webp",
            "./Images/Caramel.webp",
            "./Images/GreenMilk.webp",
            "./Images/Houjicha.webp",
            "./Images/Icon.ico",
            "./Images/Logo.webp",
            "./Images/Lychee.webp",
            "./Images/Mango.webp",
            "./Images/Matcha.webp",
            "./Images/Strawberry.webp",
            "./Images/Taro.webp",
        ])
    }

    /// Parse a JSON array of paths.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Parse`] if the input is not a JSON string array.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Relative paths in order.
    #[must_use]
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Number of assets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns true if the manifest lists no assets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Resolve every path against `scope`.
    ///
    /// # Errors
    ///
    /// Fails on the first path that does not parse or that leaves the scope's
    /// origin.
    pub fn resolve(&self, scope: &Url) -> Result<Vec<Url>, ManifestError> {
        self.paths.iter().map(|p| resolve_path(scope, p)).collect()
    }
}

/// Resolve one path against `scope`, rejecting cross-origin results.
///
/// # Errors
///
/// See [`AssetManifest::resolve`].
pub fn resolve_path(scope: &Url, path: &str) -> Result<Url, ManifestError> {
    let url = scope.join(path).map_err(|source| ManifestError::InvalidPath {
        path: path.to_string(),
        source,
    })?;

    if url.origin() != scope.origin() {
        return Err(ManifestError::CrossOrigin(path.to_string()));
    }
    Ok(url)
}
