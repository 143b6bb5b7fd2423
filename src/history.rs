//! Recently-used emoji history.
//!
//! A bounded most-recent-first list of record identities. Selection uses it
//! to avoid repeating the same image; when every candidate is recent the
//! history is cleared rather than leaving selection with nothing.

use crate::catalog::EmojiRecord;
use std::collections::VecDeque;

/// Default number of identities remembered.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Bounded usage history, most recent first.
#[derive(Debug, Clone)]
pub struct UsageHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl Default for UsageHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl UsageHistory {
    /// Create an empty history. A zero capacity is raised to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record `identity` as the most recent pick.
    ///
    /// An identity already present moves to the front instead of duplicating.
    pub fn record(&mut self, identity: impl Into<String>) {
        let identity = identity.into();
        self.entries.retain(|existing| *existing != identity);
        self.entries.push_front(identity);
        self.entries.truncate(self.capacity);
    }

    /// Whether `identity` is in the history.
    #[must_use]
    pub fn is_recent(&self, identity: &str) -> bool {
        self.entries.iter().any(|e| e == identity)
    }

    /// Drop recently used records from `candidates`.
    ///
    /// If that would leave nothing, the history is cleared and the
    /// candidates come back unfiltered.
    pub fn filter_recent<'a>(&mut self, candidates: Vec<&'a EmojiRecord>) -> Vec<&'a EmojiRecord> {
        if self.entries.is_empty() {
            return candidates;
        }
        let fresh = self.without_recent(&candidates);
        if fresh.is_empty() && !candidates.is_empty() {
            tracing::debug!(
                cleared = self.entries.len(),
                "all candidates recently used, clearing history"
            );
            self.entries.clear();
            return candidates;
        }
        fresh
    }

    /// Drop recently used records without the clear-on-empty rule.
    #[must_use]
    pub fn without_recent<'a>(&self, candidates: &[&'a EmojiRecord]) -> Vec<&'a EmojiRecord> {
        candidates
            .iter()
            .copied()
            .filter(|r| !self.is_recent(&r.identity()))
            .collect()
    }

    /// Forget everything, returning how many identities were dropped.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }

    /// Identities, most recent first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
