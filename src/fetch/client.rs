// src/fetch/client.rs

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use thiserror::Error;

use crate::errors::Result;
use crate::types::Resource;

/// Options for a fetch call: method, headers, body.
///
/// Everything is optional, like the web primitive this mirrors; an empty
/// `FetchOptions` is a plain GET.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// HTTP method; `None` means GET.
    pub method: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

/// Response surfaced by the fetch primitive.
///
/// Decorators return this untouched: any status, 2xx or not, is a
/// *successful* fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// True when the status is in [200, 300).
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Network-level fetch failure.
///
/// HTTP error statuses are not failures; they come back as a normal
/// [`FetchResponse`]. This error means the exchange itself could not
/// complete (unreachable host, refused connection, malformed request).
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("fetch binding unavailable: {0}")]
    Binding(String),

    /// Network-level failure from a non-`reqwest` implementation. The
    /// production implementation maps everything through
    /// [`FetchError::Transport`]; custom [`Fetch`] implementations use this
    /// to express failures without a `reqwest::Error` in hand.
    #[error("network failure: {0}")]
    Network(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Result alias for fetch calls; kept separate from the crate-wide alias so
/// the decorator can return the caught error with its identity intact.
pub type FetchResult = std::result::Result<FetchResponse, FetchError>;

/// Trait abstracting the asynchronous network-fetch primitive.
///
/// Implementations resolve with a response for every completed HTTP
/// exchange, whatever the status, and fail only on network-level errors.
pub trait Fetch: Send + Sync {
    fn fetch(
        &self,
        resource: Resource,
        options: FetchOptions,
    ) -> Pin<Box<dyn Future<Output = FetchResult> + Send>>;
}

impl<T: Fetch + ?Sized> Fetch for Arc<T> {
    fn fetch(
        &self,
        resource: Resource,
        options: FetchOptions,
    ) -> Pin<Box<dyn Future<Output = FetchResult> + Send>> {
        (**self).fetch(resource, options)
    }
}

/// Production fetch implementation over `reqwest`.
pub struct HttpFetch {
    client: reqwest::Client,
}

impl HttpFetch {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    /// Build over an existing client, e.g. to share connection pools with
    /// the host application.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetch {
    fn fetch(
        &self,
        resource: Resource,
        options: FetchOptions,
    ) -> Pin<Box<dyn Future<Output = FetchResult> + Send>> {
        let client = self.client.clone();

        Box::pin(async move {
            let method = match &options.method {
                Some(m) => reqwest::Method::from_bytes(m.as_bytes())
                    .map_err(|_| FetchError::InvalidRequest(format!("invalid method '{m}'")))?,
                None => reqwest::Method::GET,
            };

            let mut request = client.request(method, resource.into_string());
            for (name, value) in &options.headers {
                request = request.header(name.as_str(), value.as_str());
            }
            if let Some(body) = options.body {
                request = request.body(body);
            }

            let response = request.send().await?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.to_string(),
                        String::from_utf8_lossy(value.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = response.bytes().await?.to_vec();

            Ok(FetchResponse {
                status,
                headers,
                body,
            })
        })
    }
}
