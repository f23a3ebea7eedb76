//! Domain layer: error types shared by every other layer.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases

pub mod error;

pub use error::{OverlayError, Result};
