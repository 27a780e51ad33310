//! Configuration errors.
//!
//! | Error | Code | Recoverable |
//! |-------|------|-------------|
//! | [`ConfigError::Read`] | `CONFIG_READ` | Yes |
//! | [`ConfigError::Parse`] | `CONFIG_PARSE` | No |
//! | [`ConfigError::InvalidEnvVar`] | `CONFIG_INVALID_ENV_VAR` | No |

use std::path::PathBuf;

use thiserror::Error;
use weft_types::ErrorCode;

/// Configuration loading error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config file '{path}': {reason}")]
    Read {
        /// Offending path.
        path: PathBuf,
        /// I/O failure description.
        reason: String,
    },

    /// The config file is not valid TOML for [`WeftConfig`](super::WeftConfig).
    #[error("cannot parse config: {0}")]
    Parse(String),

    /// An environment variable held an unparseable value.
    #[error("invalid environment variable '{var}': {reason}")]
    InvalidEnvVar {
        /// Variable name.
        var: String,
        /// What was expected.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid_env_var(var: &str, reason: &str) -> Self {
        Self::InvalidEnvVar {
            var: var.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl ErrorCode for ConfigError {
    fn code(&self) -> &'static str {
        match self {
            Self::Read { .. } => "CONFIG_READ",
            Self::Parse(_) => "CONFIG_PARSE",
            Self::InvalidEnvVar { .. } => "CONFIG_INVALID_ENV_VAR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(self, Self::Read { .. })
    }
}
