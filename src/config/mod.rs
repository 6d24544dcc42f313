//! Configuration module for filebundle.
//!
//! Provides YAML-based configuration loading and validation for:
//! - Base directory the listed paths are resolved against
//! - Output file path
//! - Ordered file list
//! - Unreadable-file policy

mod app;
mod validation;

pub use app::{AppConfig, UnreadablePolicy};
pub use validation::{ConfigError, expand_env_vars};

// Re-export defaults
pub use app::{DEFAULT_BASE_DIR, DEFAULT_FILES, DEFAULT_OUTPUT_FILE};
