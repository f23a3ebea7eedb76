//! The host collaborator the engine reads state from and invokes actions on.
//!
//! The engine implements none of the operations it triggers. The host type
//! supplies them through [`Host`]: state accessors, the named operations that
//! bindings call, and the callbacks the engine itself needs (render, drawer
//! key delegation, status-bar refocus). Bindings are [`Action`]s, closures over
//! `&mut H`, so a site's binding table can call any of the host's methods,
//! including domain-specific ones beyond this trait.
//!
//! # Example
//!
//! ```rust
//! use overlay_keys::app::{action, Action, AppState, Direction, Host};
//!
//! #[derive(Default)]
//! struct Page { state: AppState, moves: Vec<Direction> }
//!
//! impl Host for Page {
//!     fn state(&self) -> AppState { self.state.clone() }
//!     fn set_state(&mut self, state: AppState) { self.state = state; }
//!     fn render(&mut self) {}
//!     fn navigate(&mut self, direction: Direction) { self.moves.push(direction); }
//! }
//!
//! let down: Action<Page> = action(|page: &mut Page| page.navigate(Direction::Down));
//! let mut page = Page::default();
//! (*down)(&mut page);
//! assert_eq!(page.moves, vec![Direction::Down]);
//! ```

use super::state::AppState;
use crate::input::KeyEvent;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;

/// A bound action: a zero-argument operation against the host.
pub type Action<H> = Rc<dyn Fn(&mut H)>;

/// Wraps a closure as an [`Action`].
pub fn action<H, F>(f: F) -> Action<H>
where
    F: Fn(&mut H) + 'static,
{
    Rc::new(f)
}

/// Cursor movement direction for [`Host::navigate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    Top,
    Bottom,
}

/// What the command palette lists when opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteMode {
    /// Global commands.
    Commands,
    /// Actions for the selected item.
    Item,
}

/// The host side of an overlay session.
///
/// Only the state accessors and `render` are required; every other operation
/// defaults to a no-op so a site implements just what its bindings use.
pub trait Host {
    /// Current snapshot. Called afresh on every event.
    fn state(&self) -> AppState;

    /// Replaces the snapshot.
    fn set_state(&mut self, state: AppState);

    /// Reflects the current state on screen.
    fn render(&mut self);

    /// Collaborator state handed to drawer callbacks.
    fn site_state(&self) -> Option<Value> {
        None
    }

    fn navigate(&mut self, _direction: Direction) {}

    fn select(&mut self, _new_tab: bool) {}

    fn open_palette(&mut self, _mode: PaletteMode) {}

    fn open_drawer(&mut self, _id: &str) {}

    fn close_drawer(&mut self) {}

    /// Receives every key while a non-reserved drawer is open.
    ///
    /// Returns whether the drawer handled the key; the engine consumes the
    /// event either way.
    fn on_drawer_key(&mut self, _drawer: &str, _event: &KeyEvent, _site: Option<&Value>) -> bool {
        false
    }

    /// Moves input focus to the status-bar text widget.
    fn focus_status_bar(&mut self) {}

    /// Runs a domain-specific operation by name.
    fn invoke(&mut self, _name: &str) {}
}
