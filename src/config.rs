//! Configuration system for timeframe.
//!
//! Provides layered configuration from multiple sources:
//!
//! 1. **Compiled defaults** - US date order, text output, colors on
//! 2. **User config file** - `~/.config/timeframe/config.toml`
//! 3. **Environment variables** - `TIMEFRAME_*` prefix
//! 4. **CLI arguments** - Highest priority, always wins
//!
//! # Example Configuration File
//!
//! ```toml
//! [parser]
//! dialect = "uk"
//!
//! [output]
//! format = "json"
//! colors = false
//! quiet = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{Result, ResultExt, TimeframeError};
use crate::fallback::DateDialect;

/// Main configuration structure for timeframe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fallback parser configuration.
    pub parser: ParserConfig,
    /// Output formatting configuration.
    pub output: OutputConfig,
}

/// Fallback single-date parser configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Day/month order for numeric dates like `04/01/17`.
    /// Environment variable: `TIMEFRAME_DIALECT`
    pub dialect: DateDialect,
}

/// Output formatting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format: text, json, json-pretty, compact.
    /// Environment variable: `TIMEFRAME_FORMAT`
    pub format: String,

    /// Enable colored output.
    pub colors: bool,

    /// Suppress everything except results and errors.
    pub quiet: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            colors: true,
            quiet: false,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. User config file (~/.config/timeframe/config.toml)
    /// 3. Compiled defaults
    #[must_use]
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(path) = Self::user_config_path() {
            match Self::load_from_file(&path) {
                Ok(Some(user_config)) => config = user_config,
                Ok(None) => {}
                Err(e) => warn!("Ignoring user config: {e}"),
            }
        }

        config.apply_env_overrides();

        debug!("Configuration loaded: {:?}", config);
        config
    }

    /// Load configuration from an explicit file, then apply env overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or not valid TOML.
    pub fn load_explicit(path: &Path) -> Result<Self> {
        let mut config = Self::load_from_file(path)?.ok_or_else(|| {
            TimeframeError::config_error(path, "file does not exist")
        })?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            debug!("Config file not found: {}", path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| TimeframeError::path_error("read", path, e))?;
        let config = toml::from_str(&content)
            .map_err(|e| TimeframeError::config_error(path, e.to_string()))?;
        info!("Loaded config from: {}", path.display());
        Ok(Some(config))
    }

    /// Get the path to the user configuration file.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("timeframe").join("config.toml"))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dialect) = lookup("TIMEFRAME_DIALECT") {
            match dialect.parse() {
                Ok(d) => self.parser.dialect = d,
                Err(e) => warn!("Ignoring TIMEFRAME_DIALECT: {e}"),
            }
        }

        if let Some(format) = lookup("TIMEFRAME_FORMAT") {
            self.output.format = format;
        }
        if lookup("TIMEFRAME_NO_COLOR").is_some() || lookup("NO_COLOR").is_some() {
            self.output.colors = false;
        }
        if lookup("TIMEFRAME_QUIET").is_some() {
            self.output.quiet = true;
        }
    }

    /// Write this configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TimeframeError::path_error("create", parent, e))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content).map_err(|e| TimeframeError::path_error("write", path, e))?;
        info!("Saved config to: {}", path.display());
        Ok(())
    }
}
