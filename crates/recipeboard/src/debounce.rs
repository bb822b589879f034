//! Debounce state for search input.
//!
//! Each keystroke submits the whole query. A submission replaces whatever was
//! pending and restarts the idle window, so at most one query is ever pending
//! and only the latest one fires. The caller owns the clock: it passes `now`
//! in and waits on [`Debouncer::deadline`] (see `session`).

use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

/// Default idle window before a typed query is applied.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Where the debouncer stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DebounceState {
    /// Nothing scheduled.
    #[default]
    Idle,
    /// `query` fires at `deadline` unless superseded.
    Pending {
        /// The latest submitted query.
        query: String,
        /// When it becomes due.
        deadline: Instant,
    },
}

/// Delay-and-supersede scheduler for a single pending query.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    state: DebounceState,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    /// Create an idle debouncer with the given idle window.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: DebounceState::Idle,
        }
    }

    /// The idle window.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> &DebounceState {
        &self.state
    }

    /// Check whether a query is waiting.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending { .. })
    }

    /// When the pending query becomes due.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            DebounceState::Pending { deadline, .. } => Some(*deadline),
            DebounceState::Idle => None,
        }
    }

    /// Schedule `query`, cancelling any pending one.
    ///
    /// Returns `true` if an earlier query was superseded.
    pub fn submit(&mut self, query: impl Into<String>, now: Instant) -> bool {
        let query = query.into();
        let deadline = now + self.delay;
        let superseded = self.is_pending();
        trace!(%query, superseded, "Scheduling debounced search");
        self.state = DebounceState::Pending { query, deadline };
        superseded
    }

    /// Take the pending query if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match &self.state {
            DebounceState::Pending { deadline, .. } if *deadline <= now => self.flush(),
            _ => None,
        }
    }

    /// Take the pending query immediately, regardless of its deadline.
    pub fn flush(&mut self) -> Option<String> {
        match std::mem::take(&mut self.state) {
            DebounceState::Pending { query, .. } => Some(query),
            DebounceState::Idle => None,
        }
    }

    /// Drop the pending query. Returns `true` if there was one.
    pub fn cancel(&mut self) -> bool {
        self.flush().is_some()
    }
}
