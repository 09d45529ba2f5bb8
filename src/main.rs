// src/main.rs
// =============================================================================
// This is the entry point of the demo runner.
//
// What happens here:
// 1. Set up logging (RUST_LOG, written to stderr)
// 2. Parse command-line arguments using clap
// 3. Build a fetcher (canned fixture or HTTP) and run the crawl engine
// 4. Print the report and exit with a proper code
//    (0 = everything fetched, 1 = some fetches failed or the crawl was
//    interrupted, 2 = error)
//
// Ctrl-C cancels the crawl: running fetches finish, nothing new starts, and
// whatever was gathered so far is still printed.
// =============================================================================

mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use url::Url;

use cli::{Cli, Commands};
use crawl_guardian::{CrawlConfig, CrawlReport, Crawler, Fetcher, HttpFetcher, StaticFetcher};

const FIXTURE_ROOT: &str = "https://golang.org/";

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    init_tracing()?;

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, letting in-flight fetches finish");
            on_ctrl_c.cancel();
        }
    });

    let (report, json) = match cli.command {
        Commands::Demo { crawl, latency_ms } => {
            let fetcher =
                StaticFetcher::golang_tour().with_latency(Duration::from_millis(latency_ms));
            let report = run_crawl(fetcher, crawl.config(), FIXTURE_ROOT, cancel).await;
            (report, crawl.json)
        }
        Commands::Site {
            website_url,
            crawl,
            timeout_secs,
            all_hosts,
        } => {
            let start = Url::parse(&website_url)
                .with_context(|| format!("Invalid URL '{}'", website_url))?;
            let timeout = Duration::from_secs(timeout_secs);

            let mut fetcher =
                HttpFetcher::new(timeout).context("Failed to create HTTP client")?;
            if !all_hosts {
                let host = start
                    .host_str()
                    .ok_or_else(|| anyhow!("URL has no host: {}", website_url))?;
                fetcher = fetcher.same_host(host);
            }

            let config = crawl.config_with_timeout(timeout);
            let report = run_crawl(fetcher, config, start.as_str(), cancel).await;
            (report, crawl.json)
        }
    };

    print_report(&report, json)?;

    Ok(exit_code(&report))
}

// A partial crawl (Ctrl-C) is not a success, even if nothing failed
fn exit_code(report: &CrawlReport) -> i32 {
    if report.is_clean() {
        0 // Exit code 0 = everything fetched
    } else {
        1 // Exit code 1 = failures, or the crawl was cut short
    }
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("crawl_guardian=info"))
        .context("Invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn run_crawl<F: Fetcher>(
    fetcher: F,
    config: CrawlConfig,
    start: &str,
    cancel: CancellationToken,
) -> CrawlReport {
    Crawler::new(fetcher, config).crawl_until(start, cancel).await
}

// Prints the report either as a table or JSON
fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let output =
            serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", output);
    } else {
        print_table(report);
    }
    Ok(())
}

fn print_table(report: &CrawlReport) {
    println!("{:<60} {:<10} {:<30}", "URL", "STATUS", "DETAIL");
    println!("{}", "=".repeat(100));

    for (id, page) in &report.fetched {
        let detail = format!("{:?} ({} links)", truncate(&page.body, 20), page.links.len());
        println!("{:<60} {:<10} {:<30}", truncate(id, 57), "FOUND", detail);
    }
    for (id, error) in &report.errors {
        println!("{:<60} {:<10} {:<30}", truncate(id, 57), "FAILED", error.to_string());
    }

    println!();
    println!("📊 Summary:");
    println!("   ✅ Fetched: {}", report.fetched.len());
    println!("   ❌ Failed: {}", report.errors.len());
    if report.cancelled {
        println!("   ⏹️  Crawl was cancelled before finishing");
    }
}

// Shortens long strings on a char boundary for table display
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate("Packages", 20), "Packages");
    }

    #[test]
    fn test_truncate_long_text() {
        assert_eq!(truncate("The Go Programming Language", 6), "The Go...");
    }

    #[test]
    fn test_exit_code() {
        let mut report = CrawlReport::default();
        assert_eq!(exit_code(&report), 0);

        // Interrupted with no failures is still a partial crawl
        report.cancelled = true;
        assert_eq!(exit_code(&report), 1);

        report.cancelled = false;
        report
            .errors
            .insert("x".into(), crawl_guardian::FetchError::Status(500));
        assert_eq!(exit_code(&report), 1);
    }

    #[tokio::test]
    async fn test_cancelled_run_exits_non_zero() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let report = run_crawl(
            StaticFetcher::golang_tour(),
            CrawlConfig::default(),
            FIXTURE_ROOT,
            cancel,
        )
        .await;

        assert!(report.errors.is_empty());
        assert_eq!(exit_code(&report), 1);
    }

    #[tokio::test]
    async fn test_run_crawl_on_fixture() {
        let config = CrawlConfig::default().with_max_depth(2);
        let report = run_crawl(
            StaticFetcher::golang_tour(),
            config,
            FIXTURE_ROOT,
            CancellationToken::new(),
        )
        .await;

        assert_eq!(report.fetched.len(), 2);
        assert_eq!(report.errors.len(), 1);
    }
}
