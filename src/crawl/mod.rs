// src/crawl/mod.rs
// =============================================================================
// This module holds the crawl engine.
//
// Submodules:
// - visited: Which ids a run has claimed / finished (dedup + cycle breaking)
// - tracker: Counts outstanding tasks so we know when a run is over
// - engine: Spawns tasks, bounds concurrency, handles cancellation
// - report: What a run hands back (fetched pages and per-id errors)
// =============================================================================

mod engine;
mod report;
mod tracker;
mod visited;

pub use engine::{crawl, CrawlTask, Crawler};
pub use report::CrawlReport;
pub use tracker::{CompletionTracker, WorkGuard};
pub use visited::{VisitState, VisitedSet};
