//! Priority-ordered key subscriber list.
//!
//! The host owns one [`InputPipeline`] and pushes every key event through it.
//! Subscribers see the event from highest priority down; the first one that
//! consumes (or blurs) it stops the walk, so the underlying page only sees keys
//! that every overlay layer let through.

use super::key::KeyEvent;
use std::cell::RefCell;
use std::rc::Rc;

/// How a subscriber disposed of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The subscriber did not process the event at all.
    Ignored,
    /// Processed, but the host's default behavior should still run.
    Passed,
    /// Processed; prevent the default behavior and stop propagation.
    Consumed,
    /// Blur the originating widget and stop propagation.
    Blurred,
}

impl KeyOutcome {
    /// Whether propagation to lower-priority subscribers stops here.
    #[must_use]
    pub const fn stops_propagation(self) -> bool {
        matches!(self, Self::Consumed | Self::Blurred)
    }

    /// Whether the host's default action for the key is suppressed.
    #[must_use]
    pub const fn is_consumed(self) -> bool {
        matches!(self, Self::Consumed)
    }
}

/// Anything that wants a look at key events.
pub trait KeySubscriber {
    fn on_key(&mut self, event: &KeyEvent) -> KeyOutcome;
}

/// Delivery priority. Higher values see events first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Priority(pub i32);

impl Priority {
    /// Sees events before any page handler, like a capture-phase listener.
    pub const CAPTURE: Self = Self(i32::MAX);
    /// Ordinary bubbling-phase page handlers.
    pub const PAGE: Self = Self(0);
}

/// Handle returned by [`InputPipeline::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Entry {
    id: SubscriptionId,
    priority: Priority,
    subscriber: Rc<RefCell<dyn KeySubscriber>>,
}

/// Ordered list of key subscribers.
#[derive(Default)]
pub struct InputPipeline {
    entries: Vec<Entry>,
    next_id: u64,
}

impl InputPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber. Among equal priorities, earlier registrations
    /// see events first.
    pub fn subscribe(
        &mut self,
        priority: Priority,
        subscriber: Rc<RefCell<dyn KeySubscriber>>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let index = self
            .entries
            .iter()
            .position(|e| e.priority < priority)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            index,
            Entry {
                id,
                priority,
                subscriber,
            },
        );
        tracing::debug!(subscription = id.0, priority = priority.0, "subscriber registered");
        id
    }

    /// Removes a subscriber. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() != before;
        tracing::debug!(subscription = id.0, removed, "subscriber removed");
        removed
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Delivers an event, returning the outcome of the subscriber that
    /// stopped propagation, or the strongest non-stopping outcome seen.
    pub fn dispatch(&self, event: &KeyEvent) -> KeyOutcome {
        let mut outcome = KeyOutcome::Ignored;
        for entry in &self.entries {
            let result = entry.subscriber.borrow_mut().on_key(event);
            if result.stops_propagation() {
                return result;
            }
            if result == KeyOutcome::Passed {
                outcome = KeyOutcome::Passed;
            }
        }
        outcome
    }
}
