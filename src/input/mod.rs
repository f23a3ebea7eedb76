//! Input layer: raw key events, token normalization and the subscriber
//! pipeline that decides which layer sees a key first.
//!
//! # Modules
//!
//! - [`key`]: Key events, input targets and [`normalize`]
//! - [`pipeline`]: Priority-ordered [`InputPipeline`]

pub mod key;
pub mod pipeline;

pub use key::{normalize, EngineInputKind, InputTarget, KeyEvent, Modifiers};
pub use pipeline::{InputPipeline, KeyOutcome, KeySubscriber, Priority, SubscriptionId};
