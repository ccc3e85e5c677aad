//! The crawl frontier: pending queue, dispatched set and in-flight tracking
//!
//! Every worker shares one `Frontier`. All mutations happen under a single
//! mutex that is held only for the set/queue update itself, never across a
//! network call. A URL is moved into `visited` in the same critical section
//! that pops it from `pending`, so two workers can never be handed the same URL.

use crate::url::LinkRules;
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct FrontierState {
    /// FIFO of URLs waiting for a worker
    pending: VecDeque<String>,

    /// Same contents as `pending`, for O(1) membership checks
    queued: HashSet<String>,

    /// URLs handed to a worker or claimed as a redirect target
    visited: HashSet<String>,

    /// URLs popped from `pending`; the dispatch limit counts these
    dispatched: usize,

    /// Leases not yet dropped
    in_flight: usize,
}

/// Outcome of a non-blocking dispatch attempt
#[derive(Debug)]
pub enum TryNext<'a> {
    /// A URL was dispatched
    Ready(Lease<'a>),

    /// Nothing pending, but other workers may still discover links
    Wait,

    /// Nothing pending and nothing in flight; the crawl is over
    Drained,

    /// The dispatch limit has been reached
    Exhausted,
}

/// A dispatched URL held by one worker
///
/// Dropping the lease marks the URL as finished. The URL stays in `visited`
/// for the rest of the crawl.
#[derive(Debug)]
pub struct Lease<'a> {
    frontier: &'a Frontier,
    url: String,
}

impl Lease<'_> {
    /// The dispatched URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        {
            let mut state = self.frontier.state();
            state.in_flight -= 1;
        }
        self.frontier.changed.notify_waiters();
    }
}

/// Shared crawl frontier
///
/// Invariants:
/// - a URL is in at most one of `pending` and `visited`
/// - a URL that reached `visited` never returns to `pending`
#[derive(Debug)]
pub struct Frontier {
    rules: LinkRules,
    dispatch_limit: Option<usize>,
    inner: Mutex<FrontierState>,
    changed: Notify,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `rules` - Length cap and extension denylist applied by [`Frontier::offer`]
    /// * `dispatch_limit` - Stop dispatching after this many URLs (`None` for no cap)
    pub fn new(rules: LinkRules, dispatch_limit: Option<usize>) -> Self {
        Self {
            rules,
            dispatch_limit,
            inner: Mutex::new(FrontierState::default()),
            changed: Notify::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, FrontierState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Admits a URL to the pending queue
    ///
    /// Already visited, already pending, overlong and non-document URLs are
    /// silently ignored.
    ///
    /// # Returns
    ///
    /// `true` if the URL was newly queued
    pub fn offer(&self, url: &str) -> bool {
        if !self.rules.admits(url) {
            tracing::trace!("Frontier refused {}", url);
            return false;
        }

        let admitted = {
            let mut state = self.state();
            if state.visited.contains(url) || state.queued.contains(url) {
                false
            } else {
                state.queued.insert(url.to_string());
                state.pending.push_back(url.to_string());
                true
            }
        };

        if admitted {
            self.changed.notify_waiters();
        }
        admitted
    }

    /// Attempts to dispatch one URL without waiting
    pub fn try_next(&self) -> TryNext<'_> {
        let mut state = self.state();

        if let Some(limit) = self.dispatch_limit {
            if state.dispatched >= limit {
                return TryNext::Exhausted;
            }
        }

        match state.pending.pop_front() {
            Some(url) => {
                state.queued.remove(&url);
                state.visited.insert(url.clone());
                state.dispatched += 1;
                state.in_flight += 1;
                TryNext::Ready(Lease {
                    frontier: self,
                    url,
                })
            }
            None if state.in_flight == 0 => TryNext::Drained,
            None => TryNext::Wait,
        }
    }

    /// Dispatches the next URL, waiting while other workers are still busy
    ///
    /// # Returns
    ///
    /// * `Some(Lease)` - A URL to process
    /// * `None` - The frontier is drained or the dispatch limit was reached
    pub async fn next(&self) -> Option<Lease<'_>> {
        loop {
            // Register for wakeups before inspecting state so a concurrent
            // offer or lease drop between the check and the await is not lost.
            let notified = self.changed.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            match self.try_next() {
                TryNext::Ready(lease) => return Some(lease),
                TryNext::Drained | TryNext::Exhausted => return None,
                TryNext::Wait => notified.await,
            }
        }
    }

    /// Marks a URL reached through a redirect as visited
    ///
    /// A pending copy is withdrawn so it is never fetched again. Claims do not
    /// count toward the dispatch limit.
    ///
    /// # Returns
    ///
    /// `false` if the URL was already visited, so its page belongs to another worker
    pub fn claim(&self, url: &str) -> bool {
        let mut state = self.state();
        if !state.visited.insert(url.to_string()) {
            return false;
        }
        if state.queued.remove(url) {
            state.pending.retain(|pending| pending != url);
        }
        true
    }

    /// Returns true when nothing is pending and no worker holds a lease
    pub fn is_drained(&self) -> bool {
        let state = self.state();
        state.pending.is_empty() && state.in_flight == 0
    }

    /// Returns true if the URL is pending or was already dispatched
    pub fn contains(&self, url: &str) -> bool {
        let state = self.state();
        state.queued.contains(url) || state.visited.contains(url)
    }

    /// Number of URLs waiting for a worker
    pub fn pending_len(&self) -> usize {
        self.state().pending.len()
    }

    /// Number of URLs dispatched or claimed so far
    pub fn visited_len(&self) -> usize {
        self.state().visited.len()
    }

    /// Number of leases currently held
    pub fn in_flight(&self) -> usize {
        self.state().in_flight
    }
}
