//! Cancellable one-shot timers on a virtual clock.
//!
//! The engine runs on a single logical thread; deferred work (sequence
//! disambiguation, status-bar refocus) is modelled as entries in this queue.
//! The host advances time explicitly, which keeps timing deterministic in
//! tests and lets any real event loop drive it with wall-clock deltas.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

/// Handle for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// Queue of pending one-shot timers carrying payloads of type `T`.
#[derive(Debug)]
pub struct Timers<T> {
    now: Duration,
    next_id: u64,
    // Keyed by (deadline, id) so iteration order is firing order.
    queue: BTreeMap<(Duration, TimerId), T>,
    deadlines: HashMap<TimerId, Duration>,
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            queue: BTreeMap::new(),
            deadlines: HashMap::new(),
        }
    }
}

impl<T> Timers<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Schedules `payload` to become due `after` from now.
    pub fn schedule(&mut self, after: Duration, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let deadline = self.now.saturating_add(after);
        self.queue.insert((deadline, id), payload);
        self.deadlines.insert(id, deadline);
        id
    }

    /// Cancels a timer. Returns its payload if it had not fired yet.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let deadline = self.deadlines.remove(&id)?;
        self.queue.remove(&(deadline, id))
    }

    /// Drops every outstanding timer.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.deadlines.clear();
    }

    #[must_use]
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Deadline of the earliest outstanding timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Pops the earliest timer due at or before `limit`, moving the clock to
    /// its deadline.
    ///
    /// Callers loop on this rather than draining a batch, so a timer firing can
    /// schedule or cancel others before the next one is considered.
    pub fn pop_due(&mut self, limit: Duration) -> Option<(TimerId, T)> {
        let (deadline, id) = *self.queue.keys().next()?;
        if deadline > limit {
            return None;
        }
        let payload = self.queue.remove(&(deadline, id))?;
        self.deadlines.remove(&id);
        self.now = self.now.max(deadline);
        Some((id, payload))
    }

    /// Moves the clock forward to `limit` once nothing else is due.
    pub fn settle(&mut self, limit: Duration) {
        self.now = self.now.max(limit);
    }
}
