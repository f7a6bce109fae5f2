//! Configuration module for plotpipe-rs
//!
//! This module holds the configuration surface of a plotting session:
//! which program to launch, the temp file pool capacity, the command
//! length limit and its policy, the default draw style, and a few
//! advisory switches.
//!
//! # Config Location
//!
//! A session config can be persisted as TOML in the platform-appropriate
//! config directory under `dev.plotpipe.plotpipe-rs`:
//!
//! - **Linux**: `~/.config/dev.plotpipe.plotpipe-rs/session.toml`
//! - **macOS**: `~/Library/Application Support/dev.plotpipe.plotpipe-rs/session.toml`
//! - **Windows**: `%APPDATA%\dev.plotpipe.plotpipe-rs\session.toml`
//!
//! # Example
//!
//! ```ignore
//! use plotpipe_rs::config::SessionConfig;
//!
//! let mut config = SessionConfig::load_or_default();
//! config.max_temp_files = 16;
//! config.save(plotpipe_rs::config::config_path().unwrap())?;
//! ```

use crate::error::{PlotError, Result};
use crate::types::DrawStyle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "dev.plotpipe.plotpipe-rs";

/// Session config filename
pub const CONFIG_FILE: &str = "session.toml";

/// Program launched when none is configured
pub const DEFAULT_PROGRAM: &str = "gnuplot";

/// Maximal number of simultaneous temporary files
pub const DEFAULT_MAX_TEMP_FILES: usize = 64;

/// Maximal size of a gnuplot command in bytes, line terminator excluded
pub const DEFAULT_MAX_COMMAND_LEN: usize = 2048;

/// Prefix for temporary data file names
pub const DEFAULT_TEMP_PREFIX: &str = "gnuplot-i-";

/// Environment variable checked (advisory only) at session init
pub const DISPLAY_VAR: &str = "DISPLAY";

/// Get the config directory path for this application
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the session config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

/// What to do with a command longer than the configured maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OverlongPolicy {
    /// Refuse to send it and report [`PlotError::CommandTooLong`]
    #[default]
    Reject,
    /// Cut it at the limit, send the prefix and record a warning
    Truncate,
}

/// Configuration for one plotting session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Executable name (searched in CWD and PATH) or path to launch
    #[serde(default = "default_program")]
    pub program: String,

    /// Temp file pool capacity; at most `max_temp_files - 1` files are live
    #[serde(default = "default_max_temp_files")]
    pub max_temp_files: usize,

    /// Maximum length of one command in bytes
    #[serde(default = "default_max_command_len")]
    pub max_command_len: usize,

    /// Policy for commands over `max_command_len`
    #[serde(default)]
    pub overlong_commands: OverlongPolicy,

    /// Style at construction and substitute for invalid requests
    #[serde(default)]
    pub default_style: DrawStyle,

    /// Escape quote characters inside quoted titles and labels
    #[serde(default = "default_true")]
    pub escape_quotes: bool,

    /// Directory for data files (system temp dir when unset)
    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    /// Prefix for data file names
    #[serde(default = "default_temp_prefix")]
    pub temp_prefix: String,

    /// Warn at init when no display variable is set
    #[serde(default = "default_true")]
    pub check_display: bool,

    /// Send the plotting process's stdout/stderr to the null device
    #[serde(default)]
    pub discard_output: bool,
}

fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_max_temp_files() -> usize {
    DEFAULT_MAX_TEMP_FILES
}

fn default_max_command_len() -> usize {
    DEFAULT_MAX_COMMAND_LEN
}

fn default_temp_prefix() -> String {
    DEFAULT_TEMP_PREFIX.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            max_temp_files: DEFAULT_MAX_TEMP_FILES,
            max_command_len: DEFAULT_MAX_COMMAND_LEN,
            overlong_commands: OverlongPolicy::default(),
            default_style: DrawStyle::default(),
            escape_quotes: true,
            temp_dir: None,
            temp_prefix: default_temp_prefix(),
            check_display: true,
            discard_output: false,
        }
    }
}

impl SessionConfig {
    /// Create a config launching `program` with all other settings default
    pub fn for_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    /// Check the config for values no session can work with
    pub fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(PlotError::Config("program name is empty".to_string()));
        }
        if self.max_temp_files < 2 {
            return Err(PlotError::Config(format!(
                "max_temp_files must be at least 2, got {}",
                self.max_temp_files
            )));
        }
        if self.max_command_len == 0 {
            return Err(PlotError::Config(
                "max_command_len must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Directory new data files are created in
    pub fn effective_temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Load a config file (TOML) from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PlotError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            PlotError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load the config from the default location, returning defaults on any error
    pub fn load_or_default() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load session config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save config to disk as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PlotError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| PlotError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| PlotError::Config(format!("Failed to write config file: {}", e)))
    }
}
