//! Session data types

use std::fmt;
use std::path::PathBuf;

use crate::types::{DrawStyle, PlotVerb};

/// Lifecycle state of a session
///
/// A session that failed to initialize is never handed out, so the only
/// observable states are these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Process running, commands accepted
    #[default]
    Active,
    /// Temp files removed and process reaped (terminal)
    Closed,
}

impl SessionState {
    pub fn is_active(&self) -> bool {
        matches!(self, SessionState::Active)
    }

    /// Display name for the state
    pub fn display_name(&self) -> &'static str {
        match self {
            SessionState::Active => "Active",
            SessionState::Closed => "Closed",
        }
    }
}

/// Non-fatal condition noticed by a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionWarning {
    /// A style outside [`DrawStyle::ALL`] was requested; the default was used
    InvalidStyle {
        requested: String,
        substituted: DrawStyle,
    },
    /// No display variable was set at init
    DisplayUnset,
    /// A command was cut down to the configured maximum length
    CommandTruncated { original_len: usize, max: usize },
}

impl fmt::Display for SessionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionWarning::InvalidStyle {
                requested,
                substituted,
            } => write!(
                f,
                "unknown requested style '{}': using {}",
                requested, substituted
            ),
            SessionWarning::DisplayUnset => {
                write!(f, "cannot find DISPLAY variable: is it set?")
            }
            SessionWarning::CommandTruncated { original_len, max } => write!(
                f,
                "command of {} bytes truncated to {} bytes",
                original_len, max
            ),
        }
    }
}

/// Result of a plot-class call that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum PlotOutcome {
    /// A command was sent
    Plotted {
        /// Verb the command used
        verb: PlotVerb,
        /// Temp file backing the plot, if it was data-backed
        data_file: Option<PathBuf>,
    },
    /// Nothing to plot; no file was allocated and no command was sent
    Skipped,
}

impl PlotOutcome {
    pub fn is_plotted(&self) -> bool {
        matches!(self, PlotOutcome::Plotted { .. })
    }

    pub fn verb(&self) -> Option<PlotVerb> {
        match self {
            PlotOutcome::Plotted { verb, .. } => Some(*verb),
            PlotOutcome::Skipped => None,
        }
    }
}
