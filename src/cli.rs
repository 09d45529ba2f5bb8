// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - demo: crawl the canned golang.org site (no network needed)
// - site: crawl a real website over HTTP
//
// Every numeric flag can also come from a CRAWL_* environment variable.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use crawl_guardian::CrawlConfig;

#[derive(Parser, Debug)]
#[command(
    name = "crawl-guardian",
    version,
    about = "Crawl a link graph concurrently, fetching every page at most once",
    long_about = "crawl-guardian explores a link graph up to a depth limit with a bounded number \
                  of concurrent fetches. Cycles and duplicate links are fetched only once."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl the built-in golang.org fixture
    ///
    /// Example: crawl-guardian demo --max-depth 4 --latency-ms 500
    Demo {
        #[command(flatten)]
        crawl: CrawlArgs,

        /// Artificial delay for every canned fetch, in milliseconds
        #[arg(long, default_value_t = 0)]
        latency_ms: u64,
    },

    /// Crawl a website over HTTP
    ///
    /// Example: crawl-guardian site https://example.com --max-depth 2
    Site {
        /// Website URL to start from (e.g., https://example.com)
        website_url: String,

        #[command(flatten)]
        crawl: CrawlArgs,

        /// Give up on a page after this many seconds
        #[arg(long, env = "CRAWL_TIMEOUT_SECS", default_value_t = 10)]
        timeout_secs: u64,

        /// Follow links to other hosts too (default: stay on the start host)
        #[arg(long)]
        all_hosts: bool,
    },
}

/// Flags shared by every subcommand.
#[derive(Args, Debug)]
pub struct CrawlArgs {
    /// Maximum crawl depth (1 = just the starting page)
    #[arg(long, env = "CRAWL_MAX_DEPTH", default_value_t = 4)]
    pub max_depth: usize,

    /// Maximum number of fetches in flight at once
    #[arg(long, env = "CRAWL_CONCURRENCY", default_value_t = 8)]
    pub concurrency: usize,

    /// Output the report as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl CrawlArgs {
    pub fn config(&self) -> CrawlConfig {
        CrawlConfig::default()
            .with_max_depth(self.max_depth)
            .with_concurrency(self.concurrency)
    }

    pub fn config_with_timeout(&self, timeout: Duration) -> CrawlConfig {
        self.config().with_fetch_timeout(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_demo_defaults() {
        let cli = Cli::try_parse_from(["crawl-guardian", "demo"]).unwrap();
        match cli.command {
            Commands::Demo { crawl, latency_ms } => {
                assert_eq!(crawl.max_depth, 4);
                assert_eq!(crawl.concurrency, 8);
                assert!(!crawl.json);
                assert_eq!(latency_ms, 0);
            }
            other => panic!("expected demo, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_site_flags() {
        let cli = Cli::try_parse_from([
            "crawl-guardian",
            "site",
            "https://example.com",
            "--max-depth",
            "2",
            "--concurrency",
            "3",
            "--timeout-secs",
            "5",
            "--all-hosts",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Site {
                website_url,
                crawl,
                timeout_secs,
                all_hosts,
            } => {
                assert_eq!(website_url, "https://example.com");
                assert_eq!(timeout_secs, 5);
                assert!(all_hosts);
                let config = crawl.config_with_timeout(Duration::from_secs(timeout_secs));
                assert_eq!(config.max_depth, 2);
                assert_eq!(config.concurrency, 3);
                assert_eq!(config.fetch_timeout, Some(Duration::from_secs(5)));
            }
            other => panic!("expected site, got {other:?}"),
        }
    }

    #[test]
    fn test_site_requires_url() {
        assert!(Cli::try_parse_from(["crawl-guardian", "site"]).is_err());
    }
}
