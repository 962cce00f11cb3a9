//! Intercepted requests and captured responses.

use reqwest::Method;
use url::Url;

/// What kind of load issued the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    /// Top-level page load (HTML document).
    Navigate,
    /// Same-origin subresource.
    #[default]
    SameOrigin,
    /// CORS subresource.
    Cors,
    /// Opaque subresource.
    NoCors,
}

/// How the request may use HTTP caches between the worker and the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheMode {
    #[default]
    Default,
    /// Bypass HTTP caches and revalidate with the origin.
    Reload,
}

/// A request seen by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: Url,
    pub method: Method,
    pub mode: RequestMode,
    pub cache: CacheMode,
}

impl Request {
    /// A same-origin GET subresource request.
    #[must_use]
    pub const fn get(url: Url) -> Self {
        Self {
            url,
            method: Method::GET,
            mode: RequestMode::SameOrigin,
            cache: CacheMode::Default,
        }
    }

    /// A navigation (page load) request.
    #[must_use]
    pub const fn navigate(url: Url) -> Self {
        Self {
            url,
            method: Method::GET,
            mode: RequestMode::Navigate,
            cache: CacheMode::Default,
        }
    }

    /// Replace the request method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Replace the cache mode.
    #[must_use]
    pub const fn with_cache(mut self, cache: CacheMode) -> Self {
        self.cache = cache;
        self
    }

    /// Returns true for page loads.
    #[must_use]
    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }
}

/// Cache key for a URL: the URL without its fragment.
#[must_use]
pub fn cache_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.into()
}

/// Response type as exposed to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseKind {
    #[default]
    Basic,
    Cors,
    /// Cross-origin no-cors response; status and body are hidden.
    Opaque,
}

/// A captured response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    pub status: u16,
    pub kind: ResponseKind,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// A `200 OK` basic response.
    #[must_use]
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::with_status(200, body)
    }

    /// A basic response with the given status.
    #[must_use]
    pub fn with_status(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            kind: ResponseKind::Basic,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Status in the 200-299 range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Whether a background refresh may overwrite the cache with this response.
    #[must_use]
    pub fn is_cacheable(&self) -> bool {
        self.status == 200 && self.kind != ResponseKind::Opaque
    }

    /// First header value with this name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_drops_fragment() {
        let url = Url::parse("http://boba.test/order.html#cart").unwrap();
        assert_eq!(cache_key(&url), "http://boba.test/order.html");
    }

    #[test]
    fn test_cacheable() {
        assert!(Response::ok("x").is_cacheable());
        assert!(!Response::with_status(404, "x").is_cacheable());
        assert!(!Response::with_status(204, "").is_cacheable());
        let opaque = Response {
            kind: ResponseKind::Opaque,
            ..Response::ok("x")
        };
        assert!(!opaque.is_cacheable());
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut response = Response::ok("x");
        response
            .headers
            .push(("Content-Type".to_string(), "text/css".to_string()));
        assert_eq!(response.header("content-type"), Some("text/css"));
        assert_eq!(response.header("etag"), None);
    }

    #[test]
    fn test_navigation_flag() {
        let url = Url::parse("http://boba.test/").unwrap();
        assert!(Request::navigate(url.clone()).is_navigation());
        assert!(!Request::get(url).is_navigation());
    }
}
