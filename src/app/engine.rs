//! The modal dispatch engine.
//!
//! [`Engine`] turns raw key events into state transitions or resolved action
//! invocations. Each event runs to completion synchronously through a fixed
//! precedence stack:
//!
//! 1. Text widgets owned by the page keep their keys
//! 2. Inactive sessions see nothing
//! 3. Escape closes exactly one layer (drawer, then filter, then search) and
//!    otherwise does nothing
//! 4. Non-reserved drawers receive every other key verbatim
//! 5. The command palette owns its own input
//! 6. Everything else is normalized and matched against the site's bindings
//!
//! Matching may defer an exact binding that a longer one could still extend.
//! The deferred action fires when a follow-up key breaks the sequence, or when
//! the disambiguation timer expires with nothing typed.
//!
//! # Example
//!
//! ```rust
//! use overlay_keys::app::{action, AppState, BindingTable, Engine, Host, KeyContext, SiteConfig, Action};
//! use overlay_keys::input::KeyEvent;
//! use overlay_keys::Config;
//! use std::time::Duration;
//!
//! #[derive(Default)]
//! struct Page { state: AppState, log: Vec<&'static str> }
//!
//! impl Host for Page {
//!     fn state(&self) -> AppState { self.state.clone() }
//!     fn set_state(&mut self, state: AppState) { self.state = state; }
//!     fn render(&mut self) {}
//! }
//!
//! struct Site;
//!
//! impl SiteConfig<Page> for Site {
//!     fn key_sequences(&self, _: &KeyContext) -> BindingTable<Action<Page>> {
//!         let mut table = BindingTable::new();
//!         table.bind("m", action(|p: &mut Page| p.log.push("mark")));
//!         table.bind("mw", action(|p: &mut Page| p.log.push("mark-word")));
//!         table
//!     }
//! }
//!
//! let page = Page { state: AppState::active(), ..Page::default() };
//! let mut engine = Engine::new(page, Site, &Config::default());
//!
//! engine.handle_key(&KeyEvent::plain("m"));
//! assert!(engine.host().log.is_empty());
//!
//! engine.advance(Duration::from_millis(500));
//! assert_eq!(engine.host().log, vec!["mark"]);
//! ```

use super::actions::{Action, Host};
use super::matcher::resolve;
use super::modes::{PALETTE_DRAWER, RECOMMENDED_DRAWER};
use super::site::{KeyContext, SiteConfig};
use super::timers::{TimerId, Timers};
use crate::input::{
    normalize, InputPipeline, InputTarget, KeyEvent, KeyOutcome, KeySubscriber, Priority,
    SubscriptionId,
};
use crate::Config;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::time::Duration;

/// Work the engine defers onto its timer queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    /// Sequence disambiguation window elapsed.
    Disambiguate,
    /// Return focus to the status bar after an action.
    Refocus,
}

/// Mutable dispatch state owned by one engine.
struct DispatchState<H> {
    /// Tokens typed so far with no terminal resolution.
    sequence: String,
    /// Exact match held back because a longer binding might still complete.
    pending: Option<Action<H>>,
    /// Outstanding disambiguation timer.
    timer: Option<TimerId>,
}

impl<H> Default for DispatchState<H> {
    fn default() -> Self {
        Self {
            sequence: String::new(),
            pending: None,
            timer: None,
        }
    }
}

/// Modal key dispatch engine for one overlay session.
pub struct Engine<H, S> {
    host: H,
    site: S,
    sequence_timeout: Duration,
    refocus_delay: Duration,
    dispatch: DispatchState<H>,
    timers: Timers<Deferred>,
    torn_down: bool,
}

impl<H: Host, S: SiteConfig<H>> Engine<H, S> {
    /// Creates an engine around a host and its site bindings.
    #[must_use]
    pub fn new(host: H, site: S, config: &Config) -> Self {
        Self {
            host,
            site,
            sequence_timeout: config.sequence_timeout,
            refocus_delay: config.refocus_delay,
            dispatch: DispatchState::default(),
            timers: Timers::new(),
            torn_down: false,
        }
    }

    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub const fn site(&self) -> &S {
        &self.site
    }

    /// Tokens accumulated towards a multi-key binding.
    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.dispatch.sequence
    }

    /// Whether an exact match is waiting for the sequence to settle.
    #[must_use]
    pub const fn has_pending(&self) -> bool {
        self.dispatch.pending.is_some()
    }

    /// Whether the disambiguation timer is armed.
    #[must_use]
    pub fn timer_armed(&self) -> bool {
        self.dispatch
            .timer
            .is_some_and(|id| self.timers.is_scheduled(id))
    }

    /// Number of deferred callbacks still outstanding.
    #[must_use]
    pub fn scheduled(&self) -> usize {
        self.timers.len()
    }

    /// Virtual time elapsed since the engine was created.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.timers.now()
    }

    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Processes one key event to completion.
    pub fn handle_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        let _span = tracing::debug_span!("handle_key", key = %event.key, target = ?event.target).entered();

        if self.torn_down {
            tracing::trace!("engine torn down, ignoring key");
            return KeyOutcome::Ignored;
        }

        match event.target {
            InputTarget::StatusBar => return KeyOutcome::Ignored,
            InputTarget::TextEntry { .. } => {
                if self.site.is_native_search_input(&event.target) && event.is_escape() {
                    tracing::debug!("blurring native search input");
                    return KeyOutcome::Blurred;
                }
                return KeyOutcome::Ignored;
            }
            InputTarget::Page | InputTarget::EngineInput(_) => {}
        }

        let state = self.host.state();
        if !state.is_active() {
            return KeyOutcome::Ignored;
        }

        if event.is_escape() {
            let next = if state.ui.drawer.is_some() {
                tracing::debug!(drawer = ?state.ui.drawer, "escape closes drawer");
                Some(state.clone().close_drawer())
            } else if state.ui.filter_active {
                tracing::debug!("escape clears filter");
                Some(state.clone().clear_filter())
            } else if state.ui.search_active {
                tracing::debug!("escape clears search");
                Some(state.clone().clear_search())
            } else {
                None
            };

            let Some(next) = next else {
                tracing::trace!("escape with no layer open");
                return KeyOutcome::Passed;
            };
            self.host.set_state(next);
            self.host.render();
            return KeyOutcome::Consumed;
        }

        match state.ui.drawer.as_deref() {
            Some(PALETTE_DRAWER) => return KeyOutcome::Ignored,
            Some(RECOMMENDED_DRAWER) | None => {}
            Some(drawer) => {
                let site = self.host.site_state();
                let handled = self.host.on_drawer_key(drawer, event, site.as_ref());
                tracing::debug!(drawer, handled, "key delegated to drawer");
                return KeyOutcome::Consumed;
            }
        }

        let Some(token) = normalize(event) else {
            return KeyOutcome::Ignored;
        };

        let context = KeyContext {
            page_type: self.site.page_type(&self.host),
            filter_active: state.ui.filter_active,
            search_active: state.ui.search_active,
            drawer: state.ui.drawer.clone(),
        };
        let table = self.site.key_sequences(&context);
        let blocked = self.site.blocked_native_keys(&context);

        let mut consumed = blocked.iter().any(|key| *key == token);
        if consumed {
            tracing::trace!(token = %token, "native key blocked");
        }

        self.cancel_sequence_timer();

        let resolution = resolve(&token, &self.dispatch.sequence, &table);
        self.dispatch.sequence = resolution.sequence;
        consumed |= resolution.consumed;
        self.sync_sequence();

        let outcome = if consumed {
            KeyOutcome::Consumed
        } else {
            KeyOutcome::Passed
        };

        if let Some(action) = resolution.action {
            tracing::debug!(token = %token, "binding resolved");
            self.dispatch.pending = None;
            self.fire(&action);
            return outcome;
        }

        if let Some(pending) = resolution.pending {
            tracing::debug!(sequence = %self.dispatch.sequence, "ambiguous binding deferred");
            self.dispatch.pending = Some(pending);
        }

        if self.dispatch.sequence.is_empty() {
            if let Some(pending) = self.dispatch.pending.take() {
                tracing::debug!(token = %token, "sequence broken, firing deferred binding");
                self.fire(&pending);
            }
            return outcome;
        }

        let id = self.timers.schedule(self.sequence_timeout, Deferred::Disambiguate);
        self.dispatch.timer = Some(id);
        tracing::trace!(sequence = %self.dispatch.sequence, "disambiguation timer armed");

        outcome
    }

    /// Advances the virtual clock, running every deferred callback that
    /// becomes due.
    pub fn advance(&mut self, by: Duration) {
        let limit = self.timers.now().saturating_add(by);
        while let Some((id, deferred)) = self.timers.pop_due(limit) {
            match deferred {
                Deferred::Disambiguate => self.on_sequence_timeout(id),
                Deferred::Refocus => self.host.focus_status_bar(),
            }
        }
        self.timers.settle(limit);
    }

    /// Tears the engine down: nothing deferred fires afterwards and every
    /// later key is ignored. Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        tracing::debug!(outstanding = self.timers.len(), "tearing down engine");
        self.timers.clear();
        self.dispatch = DispatchState::default();
        self.sync_sequence();
        self.torn_down = true;
    }

    fn on_sequence_timeout(&mut self, id: TimerId) {
        if self.dispatch.timer != Some(id) {
            return;
        }
        self.dispatch.timer = None;
        self.dispatch.sequence.clear();
        self.sync_sequence();

        if let Some(pending) = self.dispatch.pending.take() {
            tracing::debug!("disambiguation window elapsed, firing deferred binding");
            self.fire(&pending);
        } else {
            tracing::trace!("disambiguation window elapsed, sequence dropped");
        }
    }

    fn cancel_sequence_timer(&mut self) {
        if let Some(id) = self.dispatch.timer.take() {
            self.timers.cancel(id);
        }
    }

    fn fire(&mut self, action: &Action<H>) {
        (**action)(&mut self.host);
        self.timers.schedule(self.refocus_delay, Deferred::Refocus);
    }

    /// Mirrors the accumulated sequence into the host state for display.
    fn sync_sequence(&mut self) {
        let state = self.host.state();
        if state.ui.key_sequence != self.dispatch.sequence {
            let sequence = self.dispatch.sequence.clone();
            self.host.set_state(state.with_key_sequence(sequence));
        }
    }
}

impl<H: Host, S: SiteConfig<H>> KeySubscriber for Engine<H, S> {
    fn on_key(&mut self, event: &KeyEvent) -> KeyOutcome {
        self.handle_key(event)
    }
}

/// A running overlay session: an engine registered in the host's pipeline.
pub struct Session<H, S> {
    engine: Rc<RefCell<Engine<H, S>>>,
    subscription: Option<SubscriptionId>,
}

/// Registers `engine` as the highest-priority key subscriber.
pub fn setup<H, S>(pipeline: &mut InputPipeline, engine: Engine<H, S>) -> Session<H, S>
where
    H: Host + 'static,
    S: SiteConfig<H> + 'static,
{
    let engine = Rc::new(RefCell::new(engine));
    let subscriber: Rc<RefCell<dyn KeySubscriber>> = engine.clone();
    let subscription = pipeline.subscribe(Priority::CAPTURE, subscriber);
    tracing::debug!("overlay session started");
    Session {
        engine,
        subscription: Some(subscription),
    }
}

impl<H: Host, S: SiteConfig<H>> Session<H, S> {
    #[must_use]
    pub fn engine(&self) -> Ref<'_, Engine<H, S>> {
        self.engine.borrow()
    }

    pub fn engine_mut(&self) -> RefMut<'_, Engine<H, S>> {
        self.engine.borrow_mut()
    }

    /// See [`Engine::advance`].
    pub fn advance(&self, by: Duration) {
        self.engine.borrow_mut().advance(by);
    }

    #[must_use]
    pub const fn is_registered(&self) -> bool {
        self.subscription.is_some()
    }

    /// Tears the engine down and removes it from the pipeline. Idempotent.
    pub fn cleanup(&mut self, pipeline: &mut InputPipeline) {
        self.engine.borrow_mut().teardown();
        if let Some(id) = self.subscription.take() {
            pipeline.unsubscribe(id);
            tracing::debug!("overlay session cleaned up");
        }
    }
}
