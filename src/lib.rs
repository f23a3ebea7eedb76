//! Overlay Keys: modal key dispatch for vim-style overlays.
//!
//! The crate is the input core of a keyboard overlay that sits on top of a
//! page it does not own. It provides:
//! - Key normalization into binding tokens (`g`, `C-f`, `S-Enter`)
//! - A pure mode model with fixed precedence (drawer > filter > search > normal)
//! - Multi-key sequence matching with prefix/exact disambiguation
//! - A timed dispatch engine that defers ambiguous bindings and fires them on
//!   timeout or when a follow-up key breaks the sequence
//! - Declarative TOML keymaps for sites that keep their bindings as data

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Replay binary (main.rs)                            │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Dispatch engine and session lifecycle            │
//! │  - Sequence matcher                                 │
//! │  - Mode model and state snapshot                    │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Input Layer   │   │ Keymap Layer  │   │ Domain Layer  │
//! │ (input/)      │   │ (keymap/)     │   │ (domain/)     │
//! │ - Normalizer  │   │ - TOML tables │   │ - Error types │
//! │ - Pipeline    │   │ - Commands    │   │               │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - tracing subscriber setup                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Engine, matcher, modes and state
//! - [`domain`]: Error types
//! - [`input`]: Key events, normalization, subscriber pipeline
//! - [`keymap`]: TOML keymaps served as a site configuration
//! - `observability`: tracing setup
//!
//! # Configuration
//!
//! Engine timing and logging are configured with a flat string map, the same
//! shape a host's settings store or a plugin manifest provides:
//!
//! ```text
//! sequence_timeout_ms = "500"
//! refocus_delay_ms = "10"
//! trace_level = "debug"
//! keymap_file = "~/.config/overlay/youtube.toml"
//! ```
//!
//! # Example
//!
//! ```rust
//! use overlay_keys::app::{setup, AppState, Engine, Host};
//! use overlay_keys::input::{InputPipeline, KeyEvent};
//! use overlay_keys::keymap::{Keymap, KeymapConfig};
//! use overlay_keys::Config;
//!
//! #[derive(Default)]
//! struct Page { state: AppState, invoked: Vec<String> }
//!
//! impl Host for Page {
//!     fn state(&self) -> AppState { self.state.clone() }
//!     fn set_state(&mut self, state: AppState) { self.state = state; }
//!     fn render(&mut self) {}
//!     fn invoke(&mut self, name: &str) { self.invoked.push(name.to_string()); }
//! }
//!
//! let keymap = Keymap::from_toml_str(r#"
//!     [normal]
//!     gh = { command = "invoke", arg = "home" }
//! "#)?;
//!
//! let mut pipeline = InputPipeline::new();
//! let page = Page { state: AppState::active(), ..Page::default() };
//! let engine = Engine::new(page, KeymapConfig::new(keymap), &Config::default());
//! let mut session = setup(&mut pipeline, engine);
//!
//! pipeline.dispatch(&KeyEvent::plain("g"));
//! pipeline.dispatch(&KeyEvent::plain("h"));
//! assert_eq!(session.engine().host().invoked, vec!["home"]);
//!
//! session.cleanup(&mut pipeline);
//! # Ok::<(), overlay_keys::OverlayError>(())
//! ```

pub mod app;
pub mod domain;
pub mod input;
pub mod keymap;

pub mod observability;

pub use app::{derive_mode, resolve, setup, AppState, Engine, Host, Mode, Session, SiteConfig};
pub use domain::{OverlayError, Result};
pub use input::{normalize, KeyEvent, KeyOutcome};
pub use keymap::{Keymap, KeymapConfig};

use std::collections::BTreeMap;
use std::time::Duration;

/// Default disambiguation window for ambiguous sequences.
pub const DEFAULT_SEQUENCE_TIMEOUT: Duration = Duration::from_millis(500);

/// Default delay before focus returns to the status bar after an action.
pub const DEFAULT_REFOCUS_DELAY: Duration = Duration::from_millis(10);

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// How long an ambiguous or partial sequence waits for another key.
    pub sequence_timeout: Duration,

    /// Delay between an action firing and the status bar regaining focus.
    pub refocus_delay: Duration,

    /// Tracing filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`, or any `EnvFilter`
    /// directive. Default: `"info"`
    pub trace_level: Option<String>,

    /// Path to a TOML keymap to load at startup.
    pub keymap_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sequence_timeout: DEFAULT_SEQUENCE_TIMEOUT,
            refocus_delay: DEFAULT_REFOCUS_DELAY,
            trace_level: None,
            keymap_file: None,
        }
    }
}

impl Config {
    /// Parses configuration from a flat string map.
    ///
    /// # Parsing Rules
    ///
    /// - `sequence_timeout_ms`: String → milliseconds (falls back to 500 on parse error)
    /// - `refocus_delay_ms`: String → milliseconds (falls back to 10 on parse error)
    /// - `trace_level`: String → `Option<String>`
    /// - `keymap_file`: String → `Option<String>` (empty values ignored)
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use std::time::Duration;
    /// use overlay_keys::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("sequence_timeout_ms".to_string(), "750".to_string());
    /// map.insert("refocus_delay_ms".to_string(), "soon".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.sequence_timeout, Duration::from_millis(750));
    /// assert_eq!(config.refocus_delay, Duration::from_millis(10));
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let millis = |key: &str, default: Duration| {
            config
                .get(key)
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map_or(default, Duration::from_millis)
        };

        let non_empty = |key: &str| {
            config
                .get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        Self {
            sequence_timeout: millis("sequence_timeout_ms", DEFAULT_SEQUENCE_TIMEOUT),
            refocus_delay: millis("refocus_delay_ms", DEFAULT_REFOCUS_DELAY),
            trace_level: non_empty("trace_level"),
            keymap_file: non_empty("keymap_file"),
        }
    }
}

/// Loads the keymap named by the configuration.
///
/// Returns an empty keymap when no file is configured.
///
/// # Errors
///
/// Propagates [`Keymap::from_file`] failures.
pub fn initialize(config: &Config) -> Result<Keymap> {
    tracing::debug!(keymap_file = ?config.keymap_file, "initializing overlay keys");

    config.keymap_file.as_ref().map_or_else(
        || Ok(Keymap::default()),
        |path| {
            Keymap::from_file(path).map_err(|e| {
                tracing::warn!(keymap_file = %path, error = %e, "failed to load keymap");
                e
            })
        },
    )
}
