//! Structured logging setup.
//!
//! The engine emits `tracing` spans and events at every dispatch decision:
//! a `handle_key` span per event, `debug` events when bindings resolve, defer
//! or fire, and `trace` events for timer bookkeeping. This module installs the
//! subscriber that renders them.
//!
//! # Configuration
//!
//! Level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` config option
//! 3. Default: `"info"`
//!
//! # Usage
//!
//! ```rust
//! use overlay_keys::observability::init_tracing;
//! use overlay_keys::Config;
//!
//! init_tracing(&Config::default());
//! tracing::debug!("overlay initialized");
//! ```

mod init;

pub use init::init_tracing;
