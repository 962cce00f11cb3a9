//! Network access for the worker.

use std::future::Future;

use reqwest::header::{CACHE_CONTROL, PRAGMA};

use crate::error::FetchError;
use crate::request::{CacheMode, Request, Response, ResponseKind};

/// The network as seen from the worker.
pub trait Fetcher: Send + Sync + 'static {
    /// Perform `request` against the network.
    ///
    /// A non-OK status is still a response; only transport failures are errors.
    fn fetch(&self, request: &Request) -> impl Future<Output = Result<Response, FetchError>> + Send;
}

/// Fetcher backed by a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fetcher around an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, FetchError> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());

        if request.cache == CacheMode::Reload {
            builder = builder
                .header(CACHE_CONTROL, "no-cache")
                .header(PRAGMA, "no-cache");
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(url = %request.url, status, bytes = body.len(), "Fetched from network");

        Ok(Response {
            status,
            kind: ResponseKind::Basic,
            headers,
            body,
        })
    }
}
