//! # Core Module
//!
//! Core domain types, configuration, and error handling for persona studio.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.0.0: Initial creation with config, error, and response modules

pub mod config;
pub mod error;
pub mod response;

// Re-export commonly used items
pub use config::Config;
pub use error::{ChatError, DebateError, GenerationError, IngestionError, RegistryError};
pub use response::{preview, truncate_for_display, truncate_text, DISPLAY_LIMIT};
