//! Plotting session
//!
//! A [`Session`] is one conversation with a gnuplot process, from init to
//! close. It owns the command channel and the temp file pool, counts plots
//! to choose between `plot` and `replot`, and remembers the current draw
//! style.
//!
//! # Lifecycle
//!
//! - [`Session::init`] / [`Session::with_config`] locate the program, spawn
//!   it and return an active session, or an init error and no session.
//! - Plot calls write their data to a temp file and send a command naming
//!   that file. The first plot after init or [`Session::reset_plot`] uses
//!   `plot`, later ones `replot`.
//! - [`Session::close`] deletes the temp files and reaps the process.
//!   Closing twice is harmless and dropping an active session closes it.
//!
//! Nothing is ever read back from gnuplot: a command it rejects fails
//! silently on its side. Errors returned here are the ones this process
//! can see (missing program, full pool, failed disk or pipe write).
//!
//! # Example
//!
//! ```ignore
//! use plotpipe_rs::session::Session;
//!
//! let mut session = Session::init()?;
//! session.set_style("lines");
//! session.set_title("Parabola")?;
//!
//! let ys: Vec<f64> = (0..50).map(|i| (i * i) as f64).collect();
//! session.plot_series(&ys, Some("x^2"))?;
//! session.plot_slope(10.0, 0.0, Some("10x"))?;
//!
//! session.close()?;
//! ```

pub mod histogram;
pub mod once;
pub mod types;

pub use histogram::{bin_counts, HistogramOptions};
pub use once::{plot_once, plot_once_in, OnceRequest};
pub use types::{PlotOutcome, SessionState, SessionWarning};

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::backend::command::{self, CommandLimit};
use crate::backend::{
    CloseStatus, CommandChannel, CommandSink, ExecutableResolver, SearchPathResolver,
    SpawnOptions, TempFileStore,
};
use crate::config::{SessionConfig, DISPLAY_VAR};
use crate::error::{PlotError, Result};
use crate::types::{DrawStyle, PlotVerb};

/// Controller for one gnuplot process
///
/// Not synchronised: callers sharing a session between threads must wrap
/// it in a mutex.
#[derive(Debug)]
pub struct Session<S: CommandSink = CommandChannel> {
    config: SessionConfig,
    sink: S,
    store: TempFileStore,
    limit: CommandLimit,
    state: SessionState,
    /// Plots since init or the last reset
    plot_count: usize,
    style: DrawStyle,
    warnings: Vec<SessionWarning>,
    commands_sent: u64,
    started_at: DateTime<Utc>,
    program_dir: PathBuf,
}

impl Session<CommandChannel> {
    /// Start a session with the default config (or the saved one, if any)
    pub fn init() -> Result<Self> {
        Self::with_config(SessionConfig::load_or_default())
    }

    /// Start a session, locating the program through `PATH`
    pub fn with_config(config: SessionConfig) -> Result<Self> {
        Self::init_with(config, &SearchPathResolver::new())
    }

    /// Start a session, locating the program through `resolver`
    pub fn init_with(config: SessionConfig, resolver: &dyn ExecutableResolver) -> Result<Self> {
        let options = SpawnOptions {
            discard_output: config.discard_output,
        };
        Self::connect(config, resolver, |program| {
            CommandChannel::open(program, &options)
        })
    }
}

impl<S: CommandSink> Session<S> {
    /// Start a session over any sink
    ///
    /// `open` receives the full path of the located program and returns
    /// the sink commands are written to. If the program cannot be located
    /// `open` is never called.
    pub fn connect<F>(config: SessionConfig, resolver: &dyn ExecutableResolver, open: F) -> Result<Self>
    where
        F: FnOnce(&Path) -> Result<S>,
    {
        config.validate()?;

        let mut warnings = Vec::new();
        if config.check_display
            && cfg!(all(unix, not(target_os = "macos")))
            && std::env::var_os(DISPLAY_VAR).is_none()
        {
            tracing::warn!("Cannot find {} variable: is it set?", DISPLAY_VAR);
            warnings.push(SessionWarning::DisplayUnset);
        }

        let Some(program_dir) = resolver.locate(&config.program) else {
            tracing::error!("Cannot find {} in your PATH", config.program);
            return Err(PlotError::NotFound {
                program: config.program.clone(),
            });
        };

        let program = program_path(&program_dir, &config.program);
        let sink = open(&program)?;

        let store = TempFileStore::new(
            config.effective_temp_dir(),
            config.temp_prefix.clone(),
            config.max_temp_files,
        );
        let limit = CommandLimit::new(config.max_command_len, config.overlong_commands);

        tracing::info!("Plotting session started with {}", program.display());
        Ok(Self {
            style: config.default_style,
            config,
            sink,
            store,
            limit,
            state: SessionState::Active,
            plot_count: 0,
            warnings,
            commands_sent: 0,
            started_at: Utc::now(),
            program_dir,
        })
    }

    // ==================== Introspection ====================

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Number of plots since init or the last reset
    pub fn plot_count(&self) -> usize {
        self.plot_count
    }

    /// Current draw style
    pub fn style(&self) -> DrawStyle {
        self.style
    }

    /// Verb the next plot command will use
    pub fn next_verb(&self) -> PlotVerb {
        PlotVerb::for_plot_count(self.plot_count)
    }

    /// Warnings recorded so far, oldest first
    pub fn warnings(&self) -> &[SessionWarning] {
        &self.warnings
    }

    /// Take the recorded warnings, leaving none behind
    pub fn take_warnings(&mut self) -> Vec<SessionWarning> {
        std::mem::take(&mut self.warnings)
    }

    /// Temp files currently backing plotted data
    pub fn temp_files(&self) -> &[PathBuf] {
        self.store.paths()
    }

    /// Total commands written to the process
    pub fn commands_sent(&self) -> u64 {
        self.commands_sent
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Directory the program was found in
    pub fn program_dir(&self) -> &Path {
        &self.program_dir
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    // ==================== Configuration commands ====================

    /// Send a raw command line
    pub fn command(&mut self, text: &str) -> Result<()> {
        self.send(text)
    }

    /// Change the draw style used by later plots
    ///
    /// An unknown style is replaced by the configured default and a
    /// warning is recorded; this never fails. On a closed session nothing
    /// changes. Returns the style in effect.
    pub fn set_style(&mut self, style: &str) -> DrawStyle {
        if !self.is_active() {
            tracing::debug!("Ignoring style change on closed session");
            return self.style;
        }
        match style.parse::<DrawStyle>() {
            Ok(style) => self.style = style,
            Err(e) => {
                let substituted = self.config.default_style;
                tracing::warn!("{}: using {}", e, substituted);
                self.warnings.push(SessionWarning::InvalidStyle {
                    requested: style.to_string(),
                    substituted,
                });
                self.style = substituted;
            }
        }
        self.style
    }

    /// Change the draw style from an already validated value
    pub fn set_draw_style(&mut self, style: DrawStyle) {
        self.style = style;
    }

    pub fn set_title(&mut self, title: &str) -> Result<()> {
        let line = command::set_title(title, self.config.escape_quotes);
        self.send(&line)
    }

    pub fn set_xlabel(&mut self, label: &str) -> Result<()> {
        let line = command::set_xlabel(label, self.config.escape_quotes);
        self.send(&line)
    }

    pub fn set_ylabel(&mut self, label: &str) -> Result<()> {
        let line = command::set_ylabel(label, self.config.escape_quotes);
        self.send(&line)
    }

    // ==================== Plotting ====================

    /// Plot `values` against their index
    ///
    /// Empty input is skipped: no file is allocated and nothing is sent.
    pub fn plot_series(&mut self, values: &[f64], title: Option<&str>) -> Result<PlotOutcome> {
        self.ensure_active()?;
        if values.is_empty() {
            tracing::debug!("Skipping plot of empty series");
            return Ok(PlotOutcome::Skipped);
        }

        let path = self.store.store_series(values)?;
        self.plot_data_file(path, title)
    }

    /// Plot `(xs[i], ys[i])` points
    ///
    /// Both slices empty is skipped; an empty `xs` with data in `ys`, or
    /// slices of different lengths, are rejected as invalid input.
    pub fn plot_xy(&mut self, xs: &[f64], ys: &[f64], title: Option<&str>) -> Result<PlotOutcome> {
        self.ensure_active()?;
        if xs.is_empty() && ys.is_empty() {
            tracing::debug!("Skipping plot of empty point set");
            return Ok(PlotOutcome::Skipped);
        }
        if xs.len() != ys.len() {
            return Err(PlotError::InvalidInput(format!(
                "x and y lengths differ ({} vs {})",
                xs.len(),
                ys.len()
            )));
        }

        let path = self.store.store_pairs(xs, ys)?;
        self.plot_data_file(path, title)
    }

    /// Plot the line `y = a*x + b`
    pub fn plot_slope(&mut self, a: f64, b: f64, title: Option<&str>) -> Result<PlotOutcome> {
        self.ensure_active()?;
        let verb = self.next_verb();
        let line = command::plot_slope(verb, a, b, title, self.style, self.config.escape_quotes);
        self.send_function_plot(verb, &line)
    }

    /// Plot `y = f(x)` given the `f(x)` side, e.g. `sin(x) * cos(2*x)`
    ///
    /// The expression is sent as written; gnuplot is the only validator.
    pub fn plot_equation(&mut self, expression: &str, title: Option<&str>) -> Result<PlotOutcome> {
        self.ensure_active()?;
        if expression.trim().is_empty() {
            return Err(PlotError::InvalidInput("equation is empty".to_string()));
        }
        let verb = self.next_verb();
        let line = command::plot_equation(
            verb,
            expression,
            title,
            self.style,
            self.config.escape_quotes,
        );
        self.send_function_plot(verb, &line)
    }

    /// Bin `raw_values` and plot the counts as boxes
    ///
    /// See [`histogram`] for the binning rules. The style is switched to
    /// boxes and stays that way afterwards.
    pub fn plot_histogram(
        &mut self,
        edges: &[f64],
        raw_values: &[f64],
        nbins: usize,
        include_outliers: bool,
        title: Option<&str>,
    ) -> Result<PlotOutcome> {
        self.plot_histogram_with(
            edges,
            raw_values,
            nbins,
            HistogramOptions::with_outliers(include_outliers),
            title,
        )
    }

    /// [`plot_histogram`](Self::plot_histogram) with explicit options
    pub fn plot_histogram_with(
        &mut self,
        edges: &[f64],
        raw_values: &[f64],
        nbins: usize,
        options: HistogramOptions,
        title: Option<&str>,
    ) -> Result<PlotOutcome> {
        self.ensure_active()?;
        if raw_values.is_empty() {
            tracing::debug!("Skipping histogram of empty data");
            return Ok(PlotOutcome::Skipped);
        }

        let counts = bin_counts(edges, raw_values, nbins, options)?;
        self.style = DrawStyle::Boxes;
        self.plot_xy(&edges[..nbins], &counts, title)
    }

    // ==================== Lifecycle ====================

    /// Forget all plots: delete the temp files and make the next plot a `plot`
    ///
    /// Style and any titles or labels already sent are kept.
    pub fn reset_plot(&mut self) -> Result<()> {
        self.ensure_active()?;
        let removed = self.store.clear();
        self.plot_count = 0;
        tracing::debug!("Plot reset, {} temp file(s) removed", removed);
        Ok(())
    }

    /// Delete the temp files and shut the plotting process down
    ///
    /// Closing an already closed session does nothing.
    pub fn close(&mut self) -> Result<CloseStatus> {
        if !self.is_active() {
            return Ok(CloseStatus::AlreadyClosed);
        }

        self.store.clear();
        self.plot_count = 0;
        self.state = SessionState::Closed;

        let status = self.sink.close()?;
        tracing::info!(
            "Plotting session closed after {} command(s): {:?}",
            self.commands_sent,
            status
        );
        Ok(status)
    }

    // ==================== Internals ====================

    fn ensure_active(&self) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(PlotError::SessionClosed)
        }
    }

    fn plot_data_file(&mut self, path: PathBuf, title: Option<&str>) -> Result<PlotOutcome> {
        let verb = self.next_verb();
        let line = command::plot_file(verb, &path, title, self.style, self.config.escape_quotes);
        if let Err(e) = self.send(&line) {
            // Unreferenced files never hold a pool slot
            self.store.release(&path);
            return Err(e);
        }
        self.plot_count += 1;
        Ok(PlotOutcome::Plotted {
            verb,
            data_file: Some(path),
        })
    }

    fn send_function_plot(&mut self, verb: PlotVerb, line: &str) -> Result<PlotOutcome> {
        self.send(line)?;
        self.plot_count += 1;
        Ok(PlotOutcome::Plotted {
            verb,
            data_file: None,
        })
    }

    fn send(&mut self, line: &str) -> Result<()> {
        self.ensure_active()?;

        let fitted = self.limit.fit(line)?;
        if fitted.len() < line.len() {
            tracing::warn!(
                "Command truncated from {} to {} bytes",
                line.len(),
                fitted.len()
            );
            self.warnings.push(SessionWarning::CommandTruncated {
                original_len: line.len(),
                max: self.limit.max_len,
            });
        }

        self.sink.send_line(fitted)?;
        self.commands_sent += 1;
        tracing::debug!("Sent: {}", fitted);
        Ok(())
    }
}

impl<S: CommandSink> Drop for Session<S> {
    fn drop(&mut self) {
        if self.is_active() {
            if let Err(e) = self.close() {
                tracing::error!("Failed to close plotting session: {}", e);
            }
        }
    }
}

/// Full path of the program to spawn
fn program_path(dir: &Path, program: &str) -> PathBuf {
    let as_path = Path::new(program);
    if as_path.components().count() > 1 {
        as_path.to_path_buf()
    } else {
        dir.join(program)
    }
}
