//! Application state snapshot shared between the host and the engine.
//!
//! [`AppState`] is a plain value in four partitions. The engine never mutates
//! a snapshot in place: every transition consumes the old value and returns a
//! new one, which the host stores through [`Host::set_state`](crate::app::Host::set_state).
//!
//! # State Components
//!
//! - **Core**: whether the overlay session is active at all
//! - **UI**: drawer, filter and search layers, palette query, cursor, status text
//! - **Site / Page**: collaborator-owned JSON the engine threads through untouched
//!
//! # Example
//!
//! ```rust
//! use overlay_keys::app::{derive_mode, AppState, Mode};
//!
//! let state = AppState::active().open_drawer("chapters").start_filter();
//! assert_eq!(derive_mode(&state), Mode::Drawer("chapters".into()));
//!
//! let state = state.close_drawer();
//! assert_eq!(derive_mode(&state), Mode::Filter);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Global overlay flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreState {
    /// Whether the overlay session is active. Inactive sessions see no keys.
    pub active: bool,
}

/// Interaction sub-state driving the derived mode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    /// Id of the open drawer, if any (`"palette"` and `"recommended"` are reserved).
    pub drawer: Option<String>,
    pub filter_active: bool,
    pub filter_query: String,
    pub search_active: bool,
    pub search_query: String,
    /// Query typed into the command palette.
    pub palette_query: String,
    /// Highlighted palette entry.
    pub palette_selected: usize,
    /// Mirror of the engine's accumulated sequence, for status display.
    pub key_sequence: String,
    /// Cursor position within the current listing.
    pub selected_index: usize,
    /// Transient status-bar message.
    pub flash: Option<String>,
}

/// Full application snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub core: CoreState,
    pub ui: UiState,
    /// Site collaborator data (transcripts, chapters). Never interpreted here.
    pub site: Option<Value>,
    /// Page collaborator data (listing items, page type). Never interpreted here.
    pub page: Option<Value>,
}

impl AppState {
    /// A fresh snapshot with the overlay session active.
    #[must_use]
    pub fn active() -> Self {
        Self {
            core: CoreState { active: true },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.core.active
    }

    #[must_use]
    pub fn drawer(&self) -> Option<&str> {
        self.ui.drawer.as_deref()
    }

    #[must_use]
    pub fn open_drawer(mut self, id: impl Into<String>) -> Self {
        self.ui.drawer = Some(id.into());
        self
    }

    /// Closes the drawer and resets any in-flight palette query.
    ///
    /// Filter and search layers underneath are left as they were.
    #[must_use]
    pub fn close_drawer(mut self) -> Self {
        self.ui.drawer = None;
        self.ui.palette_query.clear();
        self.ui.palette_selected = 0;
        self
    }

    #[must_use]
    pub fn start_filter(mut self) -> Self {
        self.ui.filter_active = true;
        self
    }

    /// Leaves filter mode, dropping the query and resetting the cursor.
    #[must_use]
    pub fn clear_filter(mut self) -> Self {
        self.ui.filter_active = false;
        self.ui.filter_query.clear();
        self.ui.selected_index = 0;
        self
    }

    #[must_use]
    pub fn start_search(mut self) -> Self {
        self.ui.search_active = true;
        self
    }

    /// Leaves search mode, dropping the query.
    #[must_use]
    pub fn clear_search(mut self) -> Self {
        self.ui.search_active = false;
        self.ui.search_query.clear();
        self
    }

    #[must_use]
    pub fn with_key_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.ui.key_sequence = sequence.into();
        self
    }

    #[must_use]
    pub fn with_flash(mut self, message: impl Into<String>) -> Self {
        self.ui.flash = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_page(mut self, page: Value) -> Self {
        self.page = Some(page);
        self
    }

    #[must_use]
    pub fn with_site(mut self, site: Value) -> Self {
        self.site = Some(site);
        self
    }
}
