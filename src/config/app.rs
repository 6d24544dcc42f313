//! Application configuration structures.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::validation::{ConfigError, expand_env_vars};

// =============================================================================
// Constants
// =============================================================================

/// Default base directory.
pub const DEFAULT_BASE_DIR: &str = "eRupeeWallet";

/// Default output file.
pub const DEFAULT_OUTPUT_FILE: &str = "sample.txt";

/// Default project files, in output order.
pub const DEFAULT_FILES: &[&str] = &[
    "client/public/index.html",
    "client/public/style.css",
    "client/src/App.css",
    "client/src/App.js",
    "client/src/index.js",
    "client/src/script.js",
    "client/src/components/Login.js",
    "client/src/components/Register.js",
    "client/src/components/Wallet.js",
    "server/.env",
    "server/blockchain.js",
    "server/package-lock.json",
    "server/package.json",
    "server/server.js",
    "server/middleware/auth.js",
    "server/models/Token.js",
    "server/models/Transaction.js",
    "server/models/User.js",
    "server/routes/auth.js",
];

fn default_base_dir() -> String {
    DEFAULT_BASE_DIR.to_string()
}

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

fn default_files() -> Vec<String> {
    DEFAULT_FILES.iter().map(|f| f.to_string()).collect()
}

// =============================================================================
// Unreadable Policy
// =============================================================================

/// What to do with a listed path that exists but cannot be read as text.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum UnreadablePolicy {
    /// Fail the run; the destination file is left as it was.
    #[default]
    Abort,
    /// Emit an `(UNREADABLE)` header and continue.
    Mark,
}

impl std::fmt::Display for UnreadablePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Mark => write!(f, "mark"),
        }
    }
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Top-level application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root directory every listed path is resolved against (default: "eRupeeWallet").
    #[serde(default = "default_base_dir")]
    pub base_dir: String,

    /// Destination file (default: "sample.txt").
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Relative paths to collect, in output order.
    #[serde(default = "default_files")]
    pub files: Vec<String>,

    /// Handling of existing but unreadable entries (default: abort).
    #[serde(default)]
    pub on_unreadable: UnreadablePolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            output_file: default_output_file(),
            files: default_files(),
            on_unreadable: UnreadablePolicy::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, parsed, or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    ///
    /// `${VAR}` references in `base_dir` and `output_file` are expanded.
    /// An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.base_dir = expand_env_vars(&config.base_dir);
        config.output_file = expand_env_vars(&config.output_file);
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Listed paths are deliberately not validated; duplicates are only
    /// reported through the log.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if any field is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_file.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "output_file cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for file in &self.files {
            if !seen.insert(file.as_str()) {
                tracing::warn!(path = %file, "File listed more than once");
            }
        }

        Ok(())
    }
}
