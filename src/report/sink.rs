// src/report/sink.rs

//! Pluggable report delivery abstraction.
//!
//! The dispatcher talks to a `ReportSink` instead of an HTTP client
//! directly. This makes it easy to swap in a recording sink in tests while
//! keeping the production POST implementation here.
//!
//! - `HttpSink` is the default implementation used by `start`.
//! - Tests can provide their own `ReportSink` that, for example, records
//!   delivered reports or fails on purpose.

use std::future::Future;
use std::pin::Pin;

use anyhow::Context;
use tracing::debug;
use url::Url;

use crate::errors::Result;
use crate::report::payload::Report;

/// Outcome of one delivery attempt. Only the hook ever sees the error.
pub type DeliveryResult = anyhow::Result<()>;

/// Trait abstracting how a single report is delivered.
pub trait ReportSink: Send + Sync {
    /// Deliver one report. Implementations are free to:
    /// - POST it to a collection endpoint (production)
    /// - record it and return immediately (tests)
    fn deliver(&self, report: Report) -> Pin<Box<dyn Future<Output = DeliveryResult> + Send>>;
}

/// Production sink: POST the report as JSON to the collection endpoint.
///
/// The endpoint's response status is not interpreted: delivery is judged
/// by transport success alone, and even that judgement only reaches the
/// failure hook, never the code that produced the report.
pub struct HttpSink {
    client: reqwest::Client,
    collection_url: Url,
}

impl HttpSink {
    pub fn new(collection_url: Url) -> Result<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            collection_url,
        })
    }
}

impl ReportSink for HttpSink {
    fn deliver(&self, report: Report) -> Pin<Box<dyn Future<Output = DeliveryResult> + Send>> {
        let client = self.client.clone();
        let url = self.collection_url.clone();

        Box::pin(async move {
            // `json` serializes the `{"error": …}` body and sets the
            // `Content-Type: application/json` header.
            let response = client
                .post(url.clone())
                .json(&report)
                .send()
                .await
                .with_context(|| format!("posting report to {url}"))?;

            debug!(status = %response.status(), url = %url, "report delivered");
            Ok(())
        })
    }
}
