//! # Sentiscore Common Library
//!
//! Shared code for the sentiscore workspace:
//! - Error type and result alias
//! - Configuration loading (TOML file + environment overrides)
//! - Tracing subscriber initialisation
//! - Scoring event types and the broadcast event bus

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
