//! Runtime configuration.
//!
//! All types implement [`Default`] for compile-time fallback values and
//! round-trip through TOML. [`ConfigLoader`] layers sources:
//!
//! 1. Default values (compile-time)
//! 2. Config file (TOML)
//! 3. Environment variables (`WEFT_*`)
//!
//! Each layer overrides the previous.

mod error;
mod loader;

pub use error::ConfigError;
pub use loader::ConfigLoader;

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default broadcast dedupe window in milliseconds.
pub const DEFAULT_DEDUPE_WINDOW_MS: u64 = 50;

/// Default mount channel buffer (messages).
pub const DEFAULT_MOUNT_BUFFER: usize = 32;

/// Main configuration structure.
///
/// # Example
///
/// ```
/// use weft_runtime::WeftConfig;
///
/// let config = WeftConfig::default();
/// assert!(!config.debug);
/// assert_eq!(config.router.dedupe_window_ms, 50);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeftConfig {
    /// Enable debug mode (verbose routing diagnostics).
    pub debug: bool,

    /// Pipeline router configuration.
    pub router: RouterConfig,

    /// Boundary bridge configuration.
    pub bridge: BridgeConfig,
}

impl WeftConfig {
    /// Creates a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

/// Pipeline router tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Trailing broadcast dedupe window, milliseconds.
    pub dedupe_window_ms: u64,
}

impl RouterConfig {
    /// The dedupe window as a [`Duration`].
    #[must_use]
    pub fn dedupe_window(&self) -> Duration {
        Duration::from_millis(self.dedupe_window_ms)
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            dedupe_window_ms: DEFAULT_DEDUPE_WINDOW_MS,
        }
    }
}

/// Boundary bridge tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Per-widget mount channel buffer, in messages.
    pub mount_buffer: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mount_buffer: DEFAULT_MOUNT_BUFFER,
        }
    }
}
