// src/watch/debounce.rs

//! Per-path debouncing of change events.
//!
//! Editors and compilers tend to touch a file several times in a burst.
//! The [`Debouncer`] remembers the time of the latest event per path; a path
//! is handed out once it has been quiet for longer than the settle time.
//!
//! This is plain state with no channels or timers, owned by the single
//! watch-loop task that both records events and drains it on each tick.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug)]
pub struct Debouncer {
    settle: Duration,
    pending: HashMap<String, Instant>,
}

impl Debouncer {
    pub fn new(settle: Duration) -> Self {
        Self {
            settle,
            pending: HashMap::new(),
        }
    }

    /// Record an event for `path` at `at`, restarting its quiet period.
    pub fn record(&mut self, path: impl Into<String>, at: Instant) {
        self.pending.insert(path.into(), at);
    }

    /// Remove and return (sorted) every path whose last event is older
    /// than the settle time.
    pub fn drain_settled(&mut self, now: Instant) -> Vec<String> {
        let settle = self.settle;
        let mut settled: Vec<String> = self
            .pending
            .iter()
            .filter(|(_, last)| now.saturating_duration_since(**last) > settle)
            .map(|(path, _)| path.clone())
            .collect();

        for path in &settled {
            self.pending.remove(path);
        }
        settled.sort();
        settled
    }

    /// Remove and return every pending path regardless of age.
    pub fn drain_all(&mut self) -> Vec<String> {
        let mut all: Vec<String> = self.pending.drain().map(|(path, _)| path).collect();
        all.sort();
        all
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
