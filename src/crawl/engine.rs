// src/crawl/engine.rs
// =============================================================================
// This module implements the concurrent, depth-bounded crawl.
//
// How it works:
// 1. The start id becomes the first CrawlTask with the full depth budget
// 2. A task claims its id in the VisitedSet; if someone else already did,
//    it stops right there (this is what breaks cycles)
// 3. It waits for a concurrency permit, then fetches (with a timeout)
// 4. The outcome is sent back to the run, the id is marked Done, and every
//    discovered link is spawned as a new task with one less level of depth
// 5. The top-level call waits on the CompletionTracker, then assembles the
//    report from everything the tasks sent back
//
// Cancellation:
// - Once the token is cancelled no new task is spawned
// - Tasks still waiting for a permit give up without fetching
// - Fetches already running are allowed to finish and are reported
// =============================================================================

use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use super::report::CrawlReport;
use super::tracker::{CompletionTracker, WorkGuard};
use super::visited::VisitedSet;
use crate::config::CrawlConfig;
use crate::fetch::{FetchError, FetchResult, Fetcher, ResourceId};

/// One id waiting to be explored, with the depth it may still go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub id: ResourceId,
    pub remaining_depth: usize,
}

// What a task reports back to the run
#[derive(Debug)]
enum Outcome {
    Fetched(ResourceId, FetchResult),
    Failed(ResourceId, FetchError),
}

/// Crawls link graphs with a given fetcher and configuration.
///
/// Every call to [`Crawler::crawl`] gets its own visited set, so runs never
/// leak state into each other.
#[derive(Debug)]
pub struct Crawler<F> {
    fetcher: Arc<F>,
    config: CrawlConfig,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(fetcher: F, config: CrawlConfig) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            config,
        }
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Crawls from `start` until every reachable id within the depth budget
    /// has been fetched (or has failed).
    pub async fn crawl(&self, start: &str) -> CrawlReport {
        self.crawl_until(start, CancellationToken::new()).await
    }

    /// Like [`Crawler::crawl`], but stops spawning work once `cancel` fires.
    ///
    /// Dropping the returned future also stops the run from spawning more
    /// tasks; tasks already running finish in the background.
    pub async fn crawl_until(&self, start: &str, cancel: CancellationToken) -> CrawlReport {
        // Depth 0 means "crawl nothing", not even the start page
        if self.config.max_depth == 0 {
            return CrawlReport::default();
        }

        // A child token: cancelling it (e.g. when this future is dropped)
        // never cancels the caller's token
        let cancel = cancel.child_token();
        let _abandon = cancel.clone().drop_guard();

        // Tasks send their outcomes here; we read them once the run is idle
        let (outcomes, mut received) = mpsc::unbounded_channel();

        // Fresh per-run state, so two runs never share a visited set
        let run = Arc::new(CrawlRun {
            fetcher: Arc::clone(&self.fetcher),
            visited: VisitedSet::new(),
            tracker: CompletionTracker::new(),
            permits: Semaphore::new(self.config.permits()),
            fetch_timeout: self.config.fetch_timeout,
            cancel: cancel.clone(),
            outcomes,
        });

        info!(
            start,
            max_depth = self.config.max_depth,
            concurrency = self.config.permits(),
            "Starting crawl"
        );

        // Kick things off with the start id and the full depth budget
        run.spawn(CrawlTask {
            id: start.to_string(),
            remaining_depth: self.config.max_depth,
        });

        // No sleeping and hoping: wait until every task has actually returned
        run.tracker.wait_idle().await;

        // Every task sent its outcome before releasing its guard
        let mut report = CrawlReport::default();
        while let Ok(outcome) = received.try_recv() {
            match outcome {
                Outcome::Fetched(id, result) => {
                    report.fetched.insert(id, result);
                }
                Outcome::Failed(id, error) => {
                    report.errors.insert(id, error);
                }
            }
        }
        report.cancelled = cancel.is_cancelled();

        info!(
            fetched = report.fetched.len(),
            errors = report.errors.len(),
            visited = run.visited.len(),
            cancelled = report.cancelled,
            "Crawl finished"
        );

        report
    }
}

/// Crawls from `start` with a default configuration apart from the depth
/// and concurrency bound.
pub async fn crawl<F: Fetcher>(
    start: &str,
    max_depth: usize,
    fetcher: F,
    concurrency_limit: usize,
) -> CrawlReport {
    let config = CrawlConfig::default()
        .with_max_depth(max_depth)
        .with_concurrency(concurrency_limit);

    Crawler::new(fetcher, config).crawl(start).await
}

// State shared by every task of one crawl run
struct CrawlRun<F> {
    fetcher: Arc<F>,
    visited: VisitedSet,
    tracker: CompletionTracker,
    permits: Semaphore,
    fetch_timeout: Option<std::time::Duration>,
    cancel: CancellationToken,
    outcomes: mpsc::UnboundedSender<Outcome>,
}

impl<F: Fetcher> CrawlRun<F> {
    // Registers the task with the tracker, then hands it to tokio
    fn spawn(self: &Arc<Self>, task: CrawlTask) {
        if task.remaining_depth == 0 {
            return;
        }
        if self.cancel.is_cancelled() {
            trace!(id = %task.id, "Cancelled, not spawning");
            return;
        }

        // Count the task *before* it exists, so wait_idle can't see zero
        // while a child is still being handed to tokio
        let guard = self.tracker.track();
        tokio::spawn(Arc::clone(self).visit(task, guard));
    }

    // Boxed so the task's future type doesn't contain itself
    fn visit(self: Arc<Self>, task: CrawlTask, guard: WorkGuard) -> BoxFuture<'static, ()> {
        async move {
            // Held until the end of the task; dropping it counts the task as done
            let _guard = guard;

            // Someone else already claimed this id (cycle or duplicate link)
            if !self.visited.try_claim(&task.id) {
                trace!(id = %task.id, "Already visited");
                return;
            }

            // Wait for a free fetch slot, unless the run gets cancelled first.
            // `biased` checks cancellation before the semaphore on every poll
            let permit = tokio::select! {
                biased;
                () = self.cancel.cancelled() => None,
                permit = self.permits.acquire() => permit.ok(),
            };
            let Some(permit) = permit else {
                debug!(id = %task.id, "Cancelled before fetch");
                self.visited.mark_done(&task.id);
                return;
            };

            // Fetch, then free the slot right away so queued tasks can start
            let outcome = self.fetch(&task.id).await;
            drop(permit);
            self.visited.mark_done(&task.id);

            match outcome {
                Ok(result) => {
                    debug!(
                        id = %task.id,
                        depth = task.remaining_depth,
                        links = result.links.len(),
                        "Fetched"
                    );
                    let links = result.links.clone();
                    // The receiver only goes away if the caller abandoned the run
                    let _ = self.outcomes.send(Outcome::Fetched(task.id, result));

                    // Each link gets its own task with one less level to go
                    for link in links {
                        self.spawn(CrawlTask {
                            id: link,
                            remaining_depth: task.remaining_depth - 1,
                        });
                    }
                }
                Err(error) => {
                    // Recorded against this id only; siblings carry on
                    warn!(id = %task.id, %error, "Fetch failed");
                    let _ = self.outcomes.send(Outcome::Failed(task.id, error));
                }
            }
        }
        .boxed()
    }

    async fn fetch(&self, id: &str) -> Result<FetchResult, FetchError> {
        match self.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, self.fetcher.fetch(id))
                .await
                .unwrap_or_else(|_| Err(FetchError::timeout(limit))),
            None => self.fetcher.fetch(id).await,
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why tokio::spawn for every link?
//    - Each link becomes an independent task that tokio can run on any thread
//    - Slow pages don't hold up fast ones
//    - The Semaphore still limits how many fetches actually run at once
//
// 2. What is a Semaphore?
//    - A pool of N "permits"
//    - acquire() waits until a permit is free; dropping the permit returns it
//    - With N = 1, fetches happen strictly one after another
//
// 3. What does tokio::select! do?
//    - Waits on several futures and runs the branch of whichever finishes first
//    - The other futures are dropped (here: the pending acquire() is abandoned)
//
// 4. Why Arc<Self>?
//    - Every task needs the shared run state (visited set, semaphore, ...)
//    - Arc is a thread-safe reference counter; cloning it is cheap
//    - The state is freed when the last task drops its Arc
//
// 5. Why BoxFuture?
//    - visit() spawns more visit() futures
//    - Without a box, the future's type would have to contain itself,
//      which the compiler can't size
// -----------------------------------------------------------------------------
