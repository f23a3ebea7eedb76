//! Raw key events and their normalization into binding tokens.
//!
//! A token is the string form a key takes inside a binding sequence. Plain
//! printable keys keep their label exactly as delivered (Shift has already
//! produced an uppercase label upstream), Control chords gain a `C-` prefix,
//! and named keys such as `Enter` or `ArrowDown` may carry `C-`, `S-` or `C-S-`.
//!
//! # Example
//!
//! ```rust
//! use overlay_keys::input::{normalize, KeyEvent};
//!
//! assert_eq!(normalize(&KeyEvent::plain("g")), Some("g".to_string()));
//! assert_eq!(normalize(&KeyEvent::ctrl("f")), Some("C-f".to_string()));
//! assert_eq!(normalize(&KeyEvent::plain("Shift")), None);
//! ```

use std::fmt;

/// Labels of keys that only ever act as modifiers.
const MODIFIER_KEYS: [&str; 4] = ["Shift", "Control", "Alt", "Meta"];

/// Modifier keys held while a key was pressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        ctrl: false,
        shift: false,
        alt: false,
        meta: false,
    };
}

/// Which engine-owned entry widget an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineInputKind {
    /// The command palette's query input.
    Command,
    /// The local filter input.
    Filter,
    /// The search input.
    Search,
}

/// Where a key event originated.
///
/// The host classifies the focused element before handing the event over;
/// the engine only uses this to decide whether a text widget owns the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InputTarget {
    /// The page body or any non-editable element.
    Page,
    /// The overlay's status-bar text input.
    StatusBar,
    /// One of the engine's own entry inputs.
    EngineInput(EngineInputKind),
    /// A text-entry widget that belongs to the host page.
    TextEntry {
        /// Host-assigned identifier, used by native-search predicates.
        id: String,
    },
}

/// A single raw key press as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key label as delivered (`"g"`, `"G"`, `"Enter"`, `"Shift"`).
    pub key: String,
    pub modifiers: Modifiers,
    pub target: InputTarget,
}

impl KeyEvent {
    /// Creates an event with explicit modifiers targeting the page.
    #[must_use]
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            target: InputTarget::Page,
        }
    }

    /// A key pressed with no modifiers.
    #[must_use]
    pub fn plain(key: impl Into<String>) -> Self {
        Self::new(key, Modifiers::NONE)
    }

    /// A key pressed with Control held.
    #[must_use]
    pub fn ctrl(key: impl Into<String>) -> Self {
        Self::new(
            key,
            Modifiers {
                ctrl: true,
                ..Modifiers::NONE
            },
        )
    }

    /// A key pressed with Shift held.
    #[must_use]
    pub fn shift(key: impl Into<String>) -> Self {
        Self::new(
            key,
            Modifiers {
                shift: true,
                ..Modifiers::NONE
            },
        )
    }

    /// Returns the same event originating from `target`.
    #[must_use]
    pub fn on(mut self, target: InputTarget) -> Self {
        self.target = target;
        self
    }

    /// Whether this is the Escape key, regardless of modifiers.
    #[must_use]
    pub fn is_escape(&self) -> bool {
        self.key == "Escape"
    }

    /// Parses the textual chord syntax used by keymaps and replay scripts.
    ///
    /// `"g"`, `"C-f"`, `"S-Enter"` and `"C-S-Tab"` map back onto the event
    /// that would normalize to them. A lone `"-"` or a trailing `-` is a key.
    #[must_use]
    pub fn parse_chord(chord: &str) -> Self {
        let mut modifiers = Modifiers::NONE;
        let mut rest = chord;
        loop {
            if rest.len() > 2 && rest.starts_with("C-") {
                modifiers.ctrl = true;
                rest = &rest[2..];
            } else if rest.len() > 2 && rest.starts_with("S-") {
                modifiers.shift = true;
                rest = &rest[2..];
            } else {
                break;
            }
        }
        Self::new(rest, modifiers)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match normalize(self) {
            Some(token) => f.write_str(&token),
            None => write!(f, "<{}>", self.key),
        }
    }
}

/// Whether a key label names a printable character rather than a named key.
fn is_printable(label: &str) -> bool {
    let mut chars = label.chars();
    matches!((chars.next(), chars.next()), (Some(_), None))
}

/// Converts a raw key event into its binding token.
///
/// Returns `None` for presses the engine must not see: a lone modifier key,
/// or a chord involving Alt or Meta (those belong to the browser and OS).
#[must_use]
pub fn normalize(event: &KeyEvent) -> Option<String> {
    let label = event.key.as_str();
    if label.is_empty() || MODIFIER_KEYS.contains(&label) {
        return None;
    }

    let mods = event.modifiers;
    if mods.alt || mods.meta {
        return None;
    }

    if is_printable(label) {
        return Some(if mods.ctrl {
            format!("C-{label}")
        } else {
            label.to_string()
        });
    }

    let prefix = match (mods.ctrl, mods.shift) {
        (true, true) => "C-S-",
        (true, false) => "C-",
        (false, true) => "S-",
        (false, false) => "",
    };
    Some(format!("{prefix}{label}"))
}
