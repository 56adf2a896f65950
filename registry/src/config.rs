//! Registry configuration with TOML file support.

use ballotbox_utils::LogFormat;
use serde::{Deserialize, Serialize};

use crate::VotingError;

/// Limits and logging settings for a [`VotingRegistry`](crate::VotingRegistry).
///
/// Can be loaded from a TOML file via [`RegistryConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Upper bound on the number of candidates in one session.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Longest voting window a creator may request, in minutes.
    #[serde(default = "default_max_duration_minutes")]
    pub max_duration_minutes: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_max_candidates() -> usize {
    64
}

fn default_max_duration_minutes() -> u64 {
    // One year.
    525_600
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl RegistryConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, VotingError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| VotingError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, VotingError> {
        toml::from_str(s).map_err(|e| VotingError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, VotingError> {
        toml::to_string_pretty(self).map_err(|e| VotingError::Config(e.to_string()))
    }

    /// The configured log format, parsed.
    pub fn log_format(&self) -> Result<LogFormat, VotingError> {
        self.log_format
            .parse()
            .map_err(|e: ballotbox_utils::LoggingError| VotingError::Config(e.to_string()))
    }

    /// Install the global tracing subscriber with this config's format and
    /// level.
    pub fn init_logging(&self) -> Result<(), VotingError> {
        ballotbox_utils::init_logging(self.log_format()?, &self.log_level)
            .map_err(|e| VotingError::Config(e.to_string()))
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_candidates: default_max_candidates(),
            max_duration_minutes: default_max_duration_minutes(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
