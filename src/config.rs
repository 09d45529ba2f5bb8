// src/config.rs
// =============================================================================
// Knobs for a crawl run.
//
// The CLI fills these from flags / CRAWL_* environment variables; library
// users build one with the with_* methods.
// =============================================================================

use std::time::Duration;
use tokio::sync::Semaphore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// How many levels to crawl (1 = just the starting resource, 0 = nothing)
    pub max_depth: usize,
    /// Maximum number of fetches in flight at once (see `permits`)
    pub concurrency: usize,
    /// Per-fetch deadline; `None` waits forever
    pub fetch_timeout: Option<Duration>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            concurrency: 8,
            fetch_timeout: Some(Duration::from_secs(10)),
        }
    }
}

impl CrawlConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    pub fn without_fetch_timeout(mut self) -> Self {
        self.fetch_timeout = None;
        self
    }

    /// The semaphore size actually used for this config.
    ///
    /// Zero would deadlock and anything above what a tokio Semaphore can hold
    /// would panic, so the value is clamped into `1..=Semaphore::MAX_PERMITS`.
    /// Passing `usize::MAX` therefore means "as many as possible".
    pub fn permits(&self) -> usize {
        self.concurrency.clamp(1, Semaphore::MAX_PERMITS)
    }
}
