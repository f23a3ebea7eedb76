//! Declarative keymaps loaded from TOML.
//!
//! A [`Keymap`] is the data side of a site configuration: binding layers per
//! mode, optional per-page-type layers, and the native keys to block.
//! [`KeymapConfig`] serves it to the engine as a [`SiteConfig`].
//!
//! # TOML Format
//!
//! ```toml
//! blocked_keys = ["f", "m"]
//! native_search_inputs = ["masthead-search"]
//!
//! [global]
//! "C-k" = { command = "open_palette", arg = "commands" }
//!
//! [normal]
//! j = { command = "navigate", arg = "down" }
//! k = { command = "navigate", arg = "up" }
//! gh = { command = "open_drawer", arg = "history" }
//! "/" = { command = "start_filter" }
//!
//! [filter]
//! "C-n" = { command = "navigate", arg = "down" }
//!
//! [pages.watch]
//! m = { command = "invoke", arg = "mute" }
//! ```
//!
//! # Layering
//!
//! The table for a keystroke is `global`, overlaid by exactly one mode layer
//! (`recommended` when that drawer is open, else `filter`, else `search`, else
//! `normal`), and in normal mode by `pages.<type>` for the current page type.

pub mod command;

pub use command::Command;

use crate::app::{Action, BindingTable, Host, KeyContext, SiteConfig, RECOMMENDED_DRAWER};
use crate::domain::{OverlayError, Result};
use crate::input::InputTarget;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Sequence string to command, for one layer.
pub type Layer = BTreeMap<String, Command>;

/// A site's complete binding vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Keymap {
    /// Tokens whose host default is always suppressed.
    #[serde(default)]
    pub blocked_keys: Vec<String>,

    /// Ids of page text inputs that act as the site's own search box.
    #[serde(default)]
    pub native_search_inputs: Vec<String>,

    #[serde(default)]
    pub global: Layer,
    #[serde(default)]
    pub normal: Layer,
    #[serde(default)]
    pub filter: Layer,
    #[serde(default)]
    pub search: Layer,
    #[serde(default)]
    pub recommended: Layer,

    /// Extra normal-mode layers keyed by page type.
    #[serde(default)]
    pub pages: BTreeMap<String, Layer>,
}

impl Keymap {
    /// Parses and validates a keymap from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Keymap`] on malformed TOML or unknown commands,
    /// and [`OverlayError::InvalidBinding`] for empty sequences or blocked keys.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let keymap: Self = toml::from_str(raw)?;
        keymap.validate()?;
        tracing::debug!(
            bindings = keymap.binding_count(),
            blocked = keymap.blocked_keys.len(),
            pages = keymap.pages.len(),
            "keymap loaded"
        );
        Ok(keymap)
    }

    /// Reads a keymap file.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Io`] if the file cannot be read, otherwise as
    /// [`Keymap::from_toml_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw).map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "failed to load keymap");
            e
        })
    }

    /// Checks that every sequence and blocked key is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::InvalidBinding`] naming the first offender.
    pub fn validate(&self) -> Result<()> {
        if self.blocked_keys.iter().any(String::is_empty) {
            return Err(OverlayError::InvalidBinding("empty key in blocked_keys".to_string()));
        }
        for (name, layer) in self.layers() {
            if layer.keys().any(String::is_empty) {
                return Err(OverlayError::InvalidBinding(format!("empty sequence in [{name}]")));
            }
        }
        Ok(())
    }

    /// Total number of bindings across all layers.
    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.layers().map(|(_, layer)| layer.len()).sum()
    }

    fn layers(&self) -> impl Iterator<Item = (String, &Layer)> {
        [
            ("global", &self.global),
            ("normal", &self.normal),
            ("filter", &self.filter),
            ("search", &self.search),
            ("recommended", &self.recommended),
        ]
        .into_iter()
        .map(|(name, layer)| (name.to_string(), layer))
        .chain(
            self.pages
                .iter()
                .map(|(page, layer)| (format!("pages.{page}"), layer)),
        )
    }

    /// Builds the command table for a keystroke in `context`.
    #[must_use]
    pub fn table_for(&self, context: &KeyContext) -> BindingTable<Command> {
        let mut table: BindingTable<Command> = self.global.clone().into_iter().collect();

        let recommended = context.drawer.as_deref() == Some(RECOMMENDED_DRAWER);
        let layer = if recommended {
            &self.recommended
        } else if context.filter_active {
            &self.filter
        } else if context.search_active {
            &self.search
        } else {
            &self.normal
        };
        table.merge(layer.clone().into_iter().collect());

        let normal = !recommended && !context.filter_active && !context.search_active;
        if normal {
            if let Some(page) = context
                .page_type
                .as_deref()
                .and_then(|kind| self.pages.get(kind))
            {
                table.merge(page.clone().into_iter().collect());
            }
        }

        table
    }
}

/// Serves a [`Keymap`] to the engine.
///
/// The page type is read from the `"type"` field of the host's page state.
#[derive(Debug, Clone, Default)]
pub struct KeymapConfig {
    keymap: Keymap,
}

impl KeymapConfig {
    #[must_use]
    pub const fn new(keymap: Keymap) -> Self {
        Self { keymap }
    }

    #[must_use]
    pub const fn keymap(&self) -> &Keymap {
        &self.keymap
    }
}

impl<H: Host + 'static> SiteConfig<H> for KeymapConfig {
    fn page_type(&self, host: &H) -> Option<String> {
        host.state()
            .page
            .as_ref()
            .and_then(|page| page.get("type"))
            .and_then(|kind| kind.as_str())
            .map(String::from)
    }

    fn key_sequences(&self, context: &KeyContext) -> BindingTable<Action<H>> {
        self.keymap
            .table_for(context)
            .into_iter()
            .map(|(sequence, command)| (sequence, command.into_action()))
            .collect()
    }

    fn blocked_native_keys(&self, _context: &KeyContext) -> Vec<String> {
        self.keymap.blocked_keys.clone()
    }

    fn is_native_search_input(&self, target: &InputTarget) -> bool {
        match target {
            InputTarget::TextEntry { id } => self.keymap.native_search_inputs.contains(id),
            _ => false,
        }
    }
}
