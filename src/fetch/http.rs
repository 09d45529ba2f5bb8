// src/fetch/http.rs
// =============================================================================
// This module fetches real web pages and extracts the links on them.
//
// How it works:
// 1. GET the page with a shared reqwest Client (connection pooling)
// 2. Map HTTP failures onto FetchError (404/410 -> NotFound, etc.)
// 3. Parse the HTML with scraper and collect every <a href>
// 4. Resolve relative links against the page URL and drop non-HTTP ones
//
// Optionally only links on one host are kept, so a crawl doesn't wander off
// the target website.
// =============================================================================

use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use super::{FetchError, FetchResult, Fetcher};

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout: Duration,
    same_host: Option<String>,
}

impl HttpFetcher {
    /// Builds a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            timeout,
            same_host: None,
        })
    }

    /// Only report links whose host equals `host`.
    pub fn same_host(mut self, host: impl Into<String>) -> Self {
        self.same_host = Some(host.into());
        self
    }

    // Turns a reqwest error into the matching FetchError
    fn categorize_error(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::timeout(self.timeout)
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, id: &str) -> Result<FetchResult, FetchError> {
        let url = Url::parse(id).map_err(|e| FetchError::InvalidId(format!("{id}: {e}")))?;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.categorize_error(e))?;

        let status = response.status();
        if matches!(status, StatusCode::NOT_FOUND | StatusCode::GONE) {
            return Err(FetchError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        // Redirects may have moved us, so resolve links against the final URL
        let page_url = response.url().clone();
        let body = response.text().await.map_err(|e| self.categorize_error(e))?;
        let links = extract_links(&body, &page_url, self.same_host.as_deref());

        Ok(FetchResult { body, links })
    }
}

/// Extracts absolute http(s) links from HTML, in document order.
///
/// Fragments are stripped, so `page#a` and `page#b` both become `page`.
/// When `same_host` is set, links to any other host are skipped.
pub fn extract_links(html: &str, page_url: &Url, same_host: Option<&str>) -> Vec<String> {
    let mut links = Vec::new();

    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(mut url) = resolve_link(page_url, href) else {
            continue;
        };

        if url.scheme() != "http" && url.scheme() != "https" {
            continue;
        }
        if let Some(host) = same_host {
            if url.host_str() != Some(host) {
                continue;
            }
        }

        url.set_fragment(None);
        links.push(url.to_string());
    }

    links
}

// Resolves a link (possibly relative) to an absolute URL
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Skip anchors and special protocols
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    base.join(href).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/page/").unwrap()
    }

    #[test]
    fn test_resolve_absolute_link() {
        let result = resolve_link(&base(), "https://other.com");
        assert_eq!(result.map(|u| u.to_string()), Some("https://other.com/".to_string()));
    }

    #[test]
    fn test_resolve_relative_link() {
        let result = resolve_link(&base(), "/docs");
        assert_eq!(result.map(|u| u.to_string()), Some("https://example.com/docs".to_string()));
    }

    #[test]
    fn test_skip_anchor_and_mailto() {
        assert_eq!(resolve_link(&base(), "#section"), None);
        assert_eq!(resolve_link(&base(), "mailto:test@example.com"), None);
        assert_eq!(resolve_link(&base(), "javascript:void(0)"), None);
    }

    #[test]
    fn test_extract_links_in_document_order() {
        let html = r#"
            <a href="https://rust-lang.org">Rust</a>
            <a href="/docs">Docs</a>
            <a href="../about">About</a>
        "#;
        let links = extract_links(html, &base(), None);
        assert_eq!(
            links,
            vec![
                "https://rust-lang.org/",
                "https://example.com/docs",
                "https://example.com/about",
            ]
        );
    }

    #[test]
    fn test_extract_links_same_host_only() {
        let html = r#"
            <a href="https://rust-lang.org">Rust</a>
            <a href="/docs">Docs</a>
        "#;
        let links = extract_links(html, &base(), Some("example.com"));
        assert_eq!(links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_extract_links_strips_fragments() {
        let html = r#"<a href="/docs#intro">A</a><a href="/docs#usage">B</a>"#;
        let links = extract_links(html, &base(), None);
        assert_eq!(links, vec!["https://example.com/docs", "https://example.com/docs"]);
    }

    #[test]
    fn test_extract_links_skips_other_schemes() {
        let html = r#"<a href="ftp://example.com/file">F</a><a href="tel:123">T</a>"#;
        assert!(extract_links(html, &base(), None).is_empty());
    }

    #[test]
    fn test_new_fetcher_has_no_host_restriction() {
        let fetcher = HttpFetcher::new(Duration::from_millis(1)).unwrap();
        assert_eq!(fetcher.timeout, Duration::from_millis(1));
        assert!(fetcher.same_host.is_none());
    }
}
