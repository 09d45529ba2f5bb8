// src/fetch/mod.rs
// =============================================================================
// This module defines the fetch capability the crawl engine consumes.
//
// Submodules:
// - fixture: A lookup-table fetcher with canned pages (great for tests/demo)
// - http: A real fetcher that downloads HTML and extracts <a href> links
//
// The engine only knows about the Fetcher trait below, so anything that can
// turn an id into "a body plus more ids" can be crawled.
// =============================================================================

mod fixture;
mod http;

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use fixture::StaticFetcher;
pub use http::{extract_links, HttpFetcher};

/// Opaque identifier of a crawlable unit (usually a URL).
pub type ResourceId = String;

/// What a successful fetch hands back to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    /// The content of the resource
    pub body: String,
    /// Ids referenced by the resource, in document order
    pub links: Vec<ResourceId>,
}

impl FetchResult {
    pub fn new(body: impl Into<String>, links: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            body: body.into(),
            links: links.into_iter().map(Into::into).collect(),
        }
    }
}

/// Why a single fetch failed.
///
/// Failures are recorded against the id that produced them and never stop
/// the rest of the crawl.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    /// The resource does not exist (unknown id, HTTP 404/410)
    #[error("not found: {0}")]
    NotFound(String),

    /// The server answered with a non-success status
    #[error("HTTP {0}")]
    Status(u16),

    /// The fetch did not finish in time
    #[error("fetch timed out after {0} ms")]
    Timeout(u64),

    /// Connection, DNS, TLS or body-read failure
    #[error("transport error: {0}")]
    Transport(String),

    /// The id could not be interpreted by this fetcher
    #[error("invalid resource id: {0}")]
    InvalidId(String),
}

impl FetchError {
    /// A Timeout for a fetch that gave up after `limit`.
    ///
    /// Durations too long for u64 milliseconds saturate instead of wrapping.
    pub fn timeout(limit: Duration) -> Self {
        FetchError::Timeout(u64::try_from(limit.as_millis()).unwrap_or(u64::MAX))
    }
}

/// Fetches a resource and the ids it links to.
///
/// Implementations must be shareable across tasks; the engine calls
/// `fetch` concurrently from many tasks at once.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, id: &str) -> impl Future<Output = Result<FetchResult, FetchError>> + Send;
}

impl<F: Fetcher> Fetcher for Arc<F> {
    fn fetch(&self, id: &str) -> impl Future<Output = Result<FetchResult, FetchError>> + Send {
        (**self).fetch(id)
    }
}
