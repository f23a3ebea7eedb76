//! Error types for the overlay key engine.
//!
//! The dispatch core itself never fails: missing collaborator hooks default to
//! neutral values and unknown keys resolve to dead ends. Errors only surface at
//! the edges, when keymaps and configuration are loaded from disk or parsed.

use thiserror::Error;

/// The main error type for keymap loading and configuration.
///
/// # Examples
///
/// ```
/// use overlay_keys::OverlayError;
///
/// fn validate() -> Result<(), OverlayError> {
///     Err(OverlayError::InvalidBinding("empty sequence in [normal]".to_string()))
/// }
/// assert!(validate().is_err());
/// ```
#[derive(Debug, Error)]
pub enum OverlayError {
    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from reading keymap files or replay scripts.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A keymap document could not be parsed.
    #[error("Keymap parse error: {0}")]
    Keymap(#[from] toml::de::Error),

    /// A keymap parsed but contains a binding the engine cannot use.
    ///
    /// The string names the offending section and sequence.
    #[error("Invalid binding: {0}")]
    InvalidBinding(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for overlay key operations.
pub type Result<T> = std::result::Result<T, OverlayError>;
