//! Shared data model, configuration, and error types for the Healio client.

pub mod config;
pub mod error;
pub mod types;

pub use config::HealioConfig;
pub use error::{HealioError, Result};
pub use types::*;
