//! Configuration loader with layered merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Config file (TOML), when one is set
//! 3. Environment variables (`WEFT_*`)
//!
//! Each layer overrides the previous.
//!
//! | Variable | Field | Type |
//! |----------|-------|------|
//! | `WEFT_DEBUG` | `debug` | bool |
//! | `WEFT_DEDUPE_WINDOW_MS` | `router.dedupe_window_ms` | u64 |
//! | `WEFT_MOUNT_BUFFER` | `bridge.mount_buffer` | usize |

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ConfigError, WeftConfig};

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```
/// use weft_runtime::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .skip_env_vars() // deterministic in tests
///     .load()
///     .expect("defaults always load");
/// assert!(!config.debug);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    skip_env: bool,
}

impl ConfigLoader {
    /// Creates a loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the config file path.
    ///
    /// A missing file is an error; omit the path to skip the file layer.
    #[must_use]
    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Skips environment variable loading.
    ///
    /// Useful for testing with deterministic config.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Loads and merges all layers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed,
    /// or an environment variable holds an unparseable value.
    pub fn load(&self) -> Result<WeftConfig, ConfigError> {
        let mut config = WeftConfig::default();

        if let Some(path) = &self.config_path {
            config = load_file(path)?;
            debug!(path = %path.display(), "loaded config file");
        }

        if !self.skip_env {
            apply_env(&mut config)?;
        }

        Ok(config)
    }
}

fn load_file(path: &Path) -> Result<WeftConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    WeftConfig::from_toml(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
}

fn apply_env(config: &mut WeftConfig) -> Result<(), ConfigError> {
    if let Ok(val) = std::env::var("WEFT_DEBUG") {
        config.debug =
            parse_bool(&val).ok_or_else(|| ConfigError::invalid_env_var("WEFT_DEBUG", "expected bool"))?;
    }
    if let Ok(val) = std::env::var("WEFT_DEDUPE_WINDOW_MS") {
        config.router.dedupe_window_ms = val
            .parse()
            .map_err(|_| ConfigError::invalid_env_var("WEFT_DEDUPE_WINDOW_MS", "expected u64"))?;
    }
    if let Ok(val) = std::env::var("WEFT_MOUNT_BUFFER") {
        config.bridge.mount_buffer = val
            .parse()
            .map_err(|_| ConfigError::invalid_env_var("WEFT_MOUNT_BUFFER", "expected usize"))?;
    }
    Ok(())
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
