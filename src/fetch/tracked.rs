// src/fetch/tracked.rs

use std::future::Future;
use std::pin::Pin;

use serde_json::json;
use tracing::error;

use crate::fetch::client::{Fetch, FetchOptions, FetchResult};
use crate::report::{FailurePayload, Reporter};
use crate::types::Resource;

/// Transparent failure-tracking decorator around any [`Fetch`].
///
/// Contract:
/// - arguments are forwarded to the inner fetch positionally unchanged
/// - a resolved response passes through untouched, whatever its status
///   (non-2xx is *not* a failure on this path)
/// - a network-level error is reported, logged with the request URL, and
///   then returned as the very same value the inner fetch produced
///
/// The reporter is an explicit dependency, so independent trackers can each
/// wrap their own fetch without touching the global binding.
pub struct TrackedFetch<F> {
    inner: F,
    reporter: Reporter,
}

impl<F: Fetch> TrackedFetch<F> {
    pub fn new(inner: F, reporter: Reporter) -> Self {
        Self { inner, reporter }
    }
}

impl<F: Fetch> Fetch for TrackedFetch<F> {
    fn fetch(
        &self,
        resource: Resource,
        options: FetchOptions,
    ) -> Pin<Box<dyn Future<Output = FetchResult> + Send>> {
        let inner = self.inner.fetch(resource.clone(), options);
        let reporter = self.reporter.clone();

        Box::pin(async move {
            match inner.await {
                Ok(response) => Ok(response),
                Err(err) => {
                    reporter.enqueue(FailurePayload::error_value(json!({
                        "message": err.to_string(),
                    })));
                    error!(url = %resource, error = %err, "fetch request failed");
                    Err(err)
                }
            }
        })
    }
}
