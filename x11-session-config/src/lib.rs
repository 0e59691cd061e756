//! Configuration system for the x11-session window driver.
//!
//! This crate provides configuration loading, saving, validation and default
//! values for a window session. It includes:
//!
//! - [`SessionConfig`]: tunables for the event loop and input translation
//! - [`LogLevel`]: file-logging verbosity
//! - [`ConfigError`]: typed failures for config I/O and validation

pub mod config;
pub mod error;
mod types;

// Re-export main types for convenience
pub use config::SessionConfig;
pub use error::ConfigError;
pub use types::LogLevel;
