// src/crawl/visited.rs
// =============================================================================
// The visited set: which resources a crawl run has already taken on.
//
// An id is Claimed the moment a task decides to fetch it, before the fetch
// starts, so no other task can fetch it at the same time. Once the fetch is
// over (success or failure) the id becomes Done and is never fetched again.
// Both states count as "visited".
// =============================================================================

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    /// A task owns this id and is fetching it (or about to)
    Claimed,
    /// The fetch finished; the id is settled for the rest of the run
    Done,
}

#[derive(Debug, Default)]
pub struct VisitedSet {
    entries: Mutex<HashMap<String, VisitState>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `id` for the caller.
    ///
    /// Returns `true` only for the first caller; every later (or concurrent)
    /// caller gets `false` and must not fetch.
    pub fn try_claim(&self, id: &str) -> bool {
        let mut entries = self.lock();
        if entries.contains_key(id) {
            return false;
        }
        entries.insert(id.to_string(), VisitState::Claimed);
        true
    }

    /// Settles `id`. Calling it again is a no-op.
    pub fn mark_done(&self, id: &str) {
        let mut entries = self.lock();
        match entries.get_mut(id) {
            Some(state) => *state = VisitState::Done,
            None => {
                entries.insert(id.to_string(), VisitState::Done);
            }
        }
    }

    pub fn state(&self, id: &str) -> Option<VisitState> {
        self.lock().get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Every critical section is a single map operation, so a panic elsewhere
    // can't leave the map half-written; keep using it after poisoning.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, VisitState>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
