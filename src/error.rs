//! Error handling for plotpipe-rs
//!
//! This module defines the crate error type and a Result alias for use
//! throughout the library.
//!
//! Errors fall into two groups:
//!
//! - **Init failures** ([`PlotError::NotFound`], [`PlotError::InitFailed`]):
//!   no session handle is ever produced.
//! - **Per-operation failures** (capacity, I/O, closed channel, bad input):
//!   only the failing call is aborted, the session stays usable.

use thiserror::Error;

/// Main error type for plotpipe-rs operations
#[derive(Error, Debug)]
pub enum PlotError {
    /// The plotting executable could not be located
    #[error("Cannot find {program} in the current directory or PATH")]
    NotFound { program: String },

    /// Spawning the plotting process or wiring its pipe failed
    #[error("Failed to start plotting process: {0}")]
    InitFailed(String),

    /// The temp file pool is full
    #[error("Maximum number of temporary files reached ({limit}): cannot open more")]
    CapacityExceeded { limit: usize },

    /// A formatted command exceeds the configured maximum length
    #[error("Command of {len} bytes exceeds the maximum of {max} bytes")]
    CommandTooLong { len: usize, max: usize },

    /// The command channel has already been closed
    #[error("Command channel is closed")]
    ChannelClosed,

    /// The session has been closed
    #[error("Session is closed")]
    SessionClosed,

    /// Plot input that cannot be turned into a command
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors (temp file writes, pipe writes, process reaping)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PlotError>,
    },
}

impl PlotError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PlotError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, with any context layers peeled off
    pub fn root(&self) -> &PlotError {
        match self {
            PlotError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this error prevented a session from being created
    pub fn is_init_failure(&self) -> bool {
        matches!(
            self.root(),
            PlotError::NotFound { .. } | PlotError::InitFailed(_)
        )
    }
}

/// Result type alias for plotpipe-rs operations
pub type Result<T> = std::result::Result<T, PlotError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PlotError::Io(e).with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| PlotError::Io(e).with_context(f()))
    }
}
