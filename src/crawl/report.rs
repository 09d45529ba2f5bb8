// src/crawl/report.rs
// =============================================================================
// The result of a crawl run: what was fetched, and what failed.
//
// BTreeMap keeps ids sorted, so two runs over the same graph produce the same
// report no matter which task happened to finish first.
// =============================================================================

use serde::Serialize;
use std::collections::BTreeMap;

use crate::fetch::{FetchError, FetchResult, ResourceId};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlReport {
    pub fetched: BTreeMap<ResourceId, FetchResult>,
    pub errors: BTreeMap<ResourceId, FetchError>,
    /// The run was cancelled before it could explore everything
    pub cancelled: bool,
}

impl CrawlReport {
    /// Number of ids the fetcher was asked about (successes + failures).
    pub fn len(&self) -> usize {
        self.fetched.len() + self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fetched.is_empty() && self.errors.is_empty()
    }

    /// No fetch failed and the run was not cut short.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && !self.cancelled
    }
}
