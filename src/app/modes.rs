//! Interaction modes derived from the application state.
//!
//! The mode is never stored. It is recomputed from [`AppState`] with a fixed
//! precedence so that stacked layers resolve deterministically:
//!
//! 1. An open drawer (its own mode; `palette` and `recommended` are special)
//! 2. Local filter
//! 3. Search
//! 4. Normal
//!
//! Closing a drawer therefore reveals an active filter underneath instead of
//! jumping back to normal mode.

use super::state::AppState;
use std::fmt;

/// Reserved drawer id for the command palette.
pub const PALETTE_DRAWER: &str = "palette";

/// Reserved drawer id for the recommendations panel.
pub const RECOMMENDED_DRAWER: &str = "recommended";

/// Current interaction mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Default navigation and command mode.
    Normal,
    /// Local filter over the current listing.
    Filter,
    /// Search input active.
    Search,
    /// Command palette open.
    Command,
    /// Recommendations drawer open.
    Recommended,
    /// Any other drawer, carrying its id.
    Drawer(String),
}

impl Mode {
    /// Upper-case tag shown in the status bar (`"NORMAL"`, `"CHAPTERS"`).
    #[must_use]
    pub fn tag(&self) -> String {
        match self {
            Self::Normal => "NORMAL".to_string(),
            Self::Filter => "FILTER".to_string(),
            Self::Search => "SEARCH".to_string(),
            Self::Command => "COMMAND".to_string(),
            Self::Recommended => "RECOMMENDED".to_string(),
            Self::Drawer(id) => id.to_uppercase(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

/// Derives the effective mode of a snapshot.
#[must_use]
pub fn derive_mode(state: &AppState) -> Mode {
    if let Some(drawer) = state.ui.drawer.as_deref() {
        return match drawer {
            PALETTE_DRAWER => Mode::Command,
            RECOMMENDED_DRAWER => Mode::Recommended,
            other => Mode::Drawer(other.to_string()),
        };
    }
    if state.ui.filter_active {
        Mode::Filter
    } else if state.ui.search_active {
        Mode::Search
    } else {
        Mode::Normal
    }
}
