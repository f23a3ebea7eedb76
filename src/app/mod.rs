//! Application layer: state model, binding resolution and the dispatch engine.
//!
//! # Architecture
//!
//! Keys flow one way through the layer:
//!
//! ```text
//! KeyEvent → normalize → Engine ──(mode stack)──→ resolve(token, sequence, table)
//!                          │                              │
//!                          │            fire now / defer / keep building / reset
//!                          ▼                              ▼
//!                   Host::set_state ←──────────── Action(&mut Host)
//! ```
//!
//! # Modules
//!
//! - [`actions`]: The [`Host`] collaborator and bound [`Action`]s
//! - [`engine`]: The stateful [`Engine`] and session lifecycle
//! - [`matcher`]: [`BindingTable`] and the pure [`resolve`] step
//! - [`modes`]: [`Mode`] derivation with fixed precedence
//! - [`site`]: [`SiteConfig`] binding sources and [`KeyContext`]
//! - [`state`]: The immutable [`AppState`] snapshot
//! - [`timers`]: Virtual-clock one-shot timers

pub mod actions;
pub mod engine;
pub mod matcher;
pub mod modes;
pub mod site;
pub mod state;
pub mod timers;

pub use actions::{action, Action, Direction, Host, PaletteMode};
pub use engine::{setup, Engine, Session};
pub use matcher::{resolve, BindingTable, Resolution};
pub use modes::{derive_mode, Mode, PALETTE_DRAWER, RECOMMENDED_DRAWER};
pub use site::{KeyContext, SiteConfig};
pub use state::{AppState, CoreState, UiState};
pub use timers::{TimerId, Timers};
