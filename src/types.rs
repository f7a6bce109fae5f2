//! Core data types for plotpipe-rs
//!
//! This module contains the small value types shared between the session
//! and its backend components: the closed set of draw styles and the
//! plot/replot verb.
//!
//! # Main Types
//!
//! - [`DrawStyle`] - Closed set of rendering modes understood by gnuplot
//! - [`PlotVerb`] - `plot` (fresh canvas) or `replot` (add to canvas)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rendering mode for plotted series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DrawStyle {
    Lines,
    #[default]
    Points,
    LinesPoints,
    Impulses,
    Dots,
    Steps,
    Histogram,
    ErrorBars,
    Boxes,
    BoxErrorBars,
}

impl DrawStyle {
    /// Every accepted style, in the order gnuplot documents them
    pub const ALL: [DrawStyle; 10] = [
        DrawStyle::Lines,
        DrawStyle::Points,
        DrawStyle::LinesPoints,
        DrawStyle::Impulses,
        DrawStyle::Dots,
        DrawStyle::Steps,
        DrawStyle::Histogram,
        DrawStyle::ErrorBars,
        DrawStyle::Boxes,
        DrawStyle::BoxErrorBars,
    ];

    /// The keyword used after `with` in a plot command
    pub fn as_str(&self) -> &'static str {
        match self {
            DrawStyle::Lines => "lines",
            DrawStyle::Points => "points",
            DrawStyle::LinesPoints => "linespoints",
            DrawStyle::Impulses => "impulses",
            DrawStyle::Dots => "dots",
            DrawStyle::Steps => "steps",
            DrawStyle::Histogram => "histogram",
            DrawStyle::ErrorBars => "errorbars",
            DrawStyle::Boxes => "boxes",
            DrawStyle::BoxErrorBars => "boxerrorbars",
        }
    }
}

impl fmt::Display for DrawStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a style name is not one of [`DrawStyle::ALL`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStyle(pub String);

impl fmt::Display for UnknownStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown plot style '{}'", self.0)
    }
}

impl std::error::Error for UnknownStyle {}

impl FromStr for DrawStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        DrawStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}

/// Command verb for data and function plots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlotVerb {
    /// Start a fresh canvas
    Plot,
    /// Add to the current canvas
    Replot,
}

impl PlotVerb {
    /// `plot` for the first plot since init/reset, `replot` afterwards
    pub fn for_plot_count(plot_count: usize) -> Self {
        if plot_count == 0 {
            PlotVerb::Plot
        } else {
            PlotVerb::Replot
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlotVerb::Plot => "plot",
            PlotVerb::Replot => "replot",
        }
    }
}

impl fmt::Display for PlotVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
