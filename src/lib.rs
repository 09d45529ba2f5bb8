// src/lib.rs
// =============================================================================
// crawl-guardian: a bounded, deduplicating concurrent crawl engine.
//
// Give it something that can fetch a resource and list the resources it links
// to (a Fetcher), a start id and a depth, and it explores the link graph
// concurrently, fetching every reachable id at most once.
//
// Modules:
// - fetch: The Fetcher trait plus a canned and an HTTP implementation
// - crawl: The engine, visited set, completion tracker and report
// - config: CrawlConfig (depth, concurrency bound, fetch timeout)
// =============================================================================

pub mod config;
pub mod crawl;
pub mod fetch;

pub use config::CrawlConfig;
pub use crawl::{crawl, CrawlReport, Crawler};
pub use fetch::{FetchError, FetchResult, Fetcher, HttpFetcher, ResourceId, StaticFetcher};
