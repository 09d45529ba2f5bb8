// src/fetch/fixture.rs
// =============================================================================
// A fetcher backed by a fixed lookup table.
//
// Every id maps to a canned FetchResult; unknown ids fail with NotFound.
// An optional latency makes each fetch take a while, which is handy for
// seeing the crawl fan out (and for concurrency tests).
// =============================================================================

use std::collections::HashMap;
use std::time::Duration;

use super::{FetchError, FetchResult, Fetcher, ResourceId};

#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    pages: HashMap<ResourceId, FetchResult>,
    latency: Duration,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a canned page.
    pub fn page<I, S>(mut self, id: impl Into<String>, body: impl Into<String>, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pages.insert(id.into(), FetchResult::new(body, links));
        self
    }

    /// Makes every fetch sleep for `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// The four-page golang.org site from the Go tour's web crawler exercise.
    ///
    /// `https://golang.org/cmd/` is linked but missing, so crawling it
    /// always produces one NotFound error.
    pub fn golang_tour() -> Self {
        Self::new()
            .page(
                "https://golang.org/",
                "The Go Programming Language",
                ["https://golang.org/pkg/", "https://golang.org/cmd/"],
            )
            .page(
                "https://golang.org/pkg/",
                "Packages",
                [
                    "https://golang.org/",
                    "https://golang.org/cmd/",
                    "https://golang.org/pkg/fmt/",
                    "https://golang.org/pkg/os/",
                ],
            )
            .page(
                "https://golang.org/pkg/fmt/",
                "Package fmt",
                ["https://golang.org/", "https://golang.org/pkg/"],
            )
            .page(
                "https://golang.org/pkg/os/",
                "Package os",
                ["https://golang.org/", "https://golang.org/pkg/"],
            )
    }
}

impl Fetcher for StaticFetcher {
    async fn fetch(&self, id: &str) -> Result<FetchResult, FetchError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.pages
            .get(id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(id.to_string()))
    }
}
