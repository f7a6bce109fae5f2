//! One-shot plotting
//!
//! Open a session, plot one signal, wait for the caller, close. Missing
//! style and axis labels fall back to `lines`, `X` and `Y`.

use crate::backend::CommandSink;
use crate::config::SessionConfig;
use crate::error::Result;
use crate::types::DrawStyle;

use super::{PlotOutcome, Session};

/// Style used when a one-shot request names none
pub const ONCE_DEFAULT_STYLE: DrawStyle = DrawStyle::Lines;

/// What to plot in a one-shot session
#[derive(Debug, Clone, Default)]
pub struct OnceRequest<'a> {
    /// Series title
    pub title: Option<&'a str>,
    /// Style name, validated like [`Session::set_style`]
    pub style: Option<&'a str>,
    pub x_label: Option<&'a str>,
    pub y_label: Option<&'a str>,
    /// Values plotted against their index, or x coordinates when `ys` is set
    pub xs: &'a [f64],
    /// Y coordinates
    pub ys: Option<&'a [f64]>,
}

impl<'a> OnceRequest<'a> {
    /// Plot `values` against their index
    pub fn series(values: &'a [f64]) -> Self {
        Self {
            xs: values,
            ..Default::default()
        }
    }

    /// Plot `(xs[i], ys[i])` points
    pub fn points(xs: &'a [f64], ys: &'a [f64]) -> Self {
        Self {
            xs,
            ys: Some(ys),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn with_style(mut self, style: &'a str) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_labels(mut self, x_label: &'a str, y_label: &'a str) -> Self {
        self.x_label = Some(x_label);
        self.y_label = Some(y_label);
        self
    }
}

/// Start a session from `config`, plot `request`, call `pause`, close
///
/// Nothing is spawned when `request.xs` is empty.
pub fn plot_once<F>(config: SessionConfig, request: &OnceRequest<'_>, pause: F) -> Result<PlotOutcome>
where
    F: FnOnce() -> Result<()>,
{
    if request.xs.is_empty() {
        return Ok(PlotOutcome::Skipped);
    }
    let session = Session::with_config(config)?;
    plot_once_in(session, request, pause)
}

/// [`plot_once`] on an already started session, which is closed afterwards
pub fn plot_once_in<S, F>(
    mut session: Session<S>,
    request: &OnceRequest<'_>,
    pause: F,
) -> Result<PlotOutcome>
where
    S: CommandSink,
    F: FnOnce() -> Result<()>,
{
    let outcome = plot_request(&mut session, request).and_then(|outcome| {
        pause()?;
        Ok(outcome)
    });
    let closed = session.close();

    let outcome = outcome?;
    closed?;
    Ok(outcome)
}

fn plot_request<S: CommandSink>(
    session: &mut Session<S>,
    request: &OnceRequest<'_>,
) -> Result<PlotOutcome> {
    match request.style {
        Some(style) => {
            session.set_style(style);
        }
        None => session.set_draw_style(ONCE_DEFAULT_STYLE),
    }
    session.set_xlabel(request.x_label.unwrap_or("X"))?;
    session.set_ylabel(request.y_label.unwrap_or("Y"))?;

    match request.ys {
        Some(ys) => session.plot_xy(request.xs, ys, request.title),
        None => session.plot_series(request.xs, request.title),
    }
}
