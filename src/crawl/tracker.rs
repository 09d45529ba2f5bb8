// src/crawl/tracker.rs
// =============================================================================
// Knowing when a crawl is finished.
//
// Every spawned crawl task holds a WorkGuard. The guard is taken *before* the
// task is spawned and released when the task is dropped, so the outstanding
// count can only reach zero once every task, including tasks spawned by
// other tasks, has fully returned.
//
// Rust concepts:
// - Drop: releasing the guard happens even if the task panics
// - Atomics + Notify: a counter plus a way to wake whoever waits on it
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    outstanding: AtomicUsize,
    idle: Notify,
}

#[derive(Debug, Clone, Default)]
pub struct CompletionTracker {
    inner: Arc<Inner>,
}

/// One unit of outstanding work. Dropping it marks the work finished.
#[derive(Debug)]
#[must_use = "dropping the guard immediately marks the work as finished"]
pub struct WorkGuard {
    inner: Arc<Inner>,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one unit of work. Call this before spawning the task.
    pub fn track(&self) -> WorkGuard {
        self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
        WorkGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::Acquire)
    }

    /// Waits until no tracked work remains.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            // Register interest before reading the counter, otherwise a guard
            // dropped between the load and the await would go unnoticed
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        // fetch_sub returns the old value: 1 means we were the last one
        if self.inner.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            // Wake everyone blocked in wait_idle()
            self.inner.idle.notify_waiters();
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a "guard"?
//    - A value whose only job is to do something when it's dropped
//    - Like MutexGuard unlocking a mutex, WorkGuard decrements the counter
//    - #[must_use] warns if you accidentally drop it straight away
//
// 2. Why AtomicUsize instead of a Mutex<usize>?
//    - A counter only needs add/subtract; atomics do that without locking
//    - Ordering::AcqRel makes everything a task did before dropping its
//      guard visible to whoever sees the counter hit zero
//
// 3. What is Notify?
//    - tokio's "wake up whoever is waiting" primitive
//    - notified() creates a future; notify_waiters() completes all of them
//
// 4. Why the loop in wait_idle?
//    - A wake-up only means "the counter hit zero at some point"
//    - New work may have been tracked since, so the counter is read again
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_idle_tracker_returns_immediately() {
        let tracker = CompletionTracker::new();
        tokio::time::timeout(Duration::from_secs(1), tracker.wait_idle())
            .await
            .expect("wait_idle should not block with no work");
    }

    #[tokio::test]
    async fn test_guard_counts() {
        let tracker = CompletionTracker::new();
        let first = tracker.track();
        let second = tracker.track();
        assert_eq!(tracker.outstanding(), 2);
        drop(first);
        assert_eq!(tracker.outstanding(), 1);
        drop(second);
        assert_eq!(tracker.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_waits_for_nested_work() {
        let tracker = CompletionTracker::new();
        let guard = tracker.track();

        let spawner = tracker.clone();
        tokio::spawn(async move {
            let _guard = guard;
            tokio::time::sleep(Duration::from_millis(20)).await;
            // Child work is registered before the parent guard is released
            let child = spawner.track();
            tokio::spawn(async move {
                let _child = child;
                tokio::time::sleep(Duration::from_millis(20)).await;
            });
        });

        tokio::time::timeout(Duration::from_secs(2), tracker.wait_idle())
            .await
            .expect("nested work should finish");
        assert_eq!(tracker.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_panicking_task_still_releases_guard() {
        let tracker = CompletionTracker::new();
        let guard = tracker.track();

        let handle = tokio::spawn(async move {
            let _guard = guard;
            panic!("task failed");
        });
        assert!(handle.await.is_err());

        tokio::time::timeout(Duration::from_secs(1), tracker.wait_idle())
            .await
            .expect("panicked task should not stall completion");
    }
}
