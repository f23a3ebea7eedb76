//! Named commands a keymap can bind, lowered onto [`Host`] calls.

use crate::app::{Action, Direction, Host, PaletteMode};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// A bindable command.
///
/// In TOML a command is a table with a `command` tag and an optional `arg`:
///
/// ```toml
/// j = { command = "navigate", arg = "down" }
/// o = { command = "select" }
/// gc = { command = "open_drawer", arg = "chapters" }
/// y = { command = "invoke", arg = "copy-link" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "arg", rename_all = "snake_case")]
pub enum Command {
    Navigate(Direction),
    Select,
    SelectNewTab,
    OpenPalette(PaletteMode),
    OpenDrawer(String),
    CloseDrawer,
    /// Enter local filter mode.
    StartFilter,
    /// Enter search mode.
    StartSearch,
    Render,
    /// A site-specific operation, passed to [`Host::invoke`] by name.
    Invoke(String),
}

impl Command {
    /// Runs the command against a host.
    pub fn apply<H: Host>(&self, host: &mut H) {
        tracing::debug!(command = ?self, "applying command");
        match self {
            Self::Navigate(direction) => host.navigate(*direction),
            Self::Select => host.select(false),
            Self::SelectNewTab => host.select(true),
            Self::OpenPalette(mode) => host.open_palette(*mode),
            Self::OpenDrawer(id) => host.open_drawer(id),
            Self::CloseDrawer => host.close_drawer(),
            Self::StartFilter => {
                let state = host.state().start_filter();
                host.set_state(state);
                host.render();
            }
            Self::StartSearch => {
                let state = host.state().start_search();
                host.set_state(state);
                host.render();
            }
            Self::Render => host.render(),
            Self::Invoke(name) => host.invoke(name),
        }
    }

    /// Wraps the command as a bound action.
    #[must_use]
    pub fn into_action<H: Host + 'static>(self) -> Action<H> {
        Rc::new(move |host: &mut H| self.apply(host))
    }
}
