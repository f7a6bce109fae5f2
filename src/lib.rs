//! # plotpipe-rs: gnuplot session controller
//!
//! Drives a long-running gnuplot process through a one-way command pipe.
//! A session spawns the process, writes plotted data to temp files, sends
//! `plot`/`replot` commands naming those files, and cleans everything up on
//! reset and close. Nothing is read back from gnuplot.
//!
//! ## Architecture
//!
//! - **Session**: Orchestrator owning one channel and one temp file pool
//! - **Backend**: Program lookup, temp file pool, command grammar, process pipe
//! - **Config**: Limits, defaults and advisory switches, persisted as TOML
//!
//! ## Configuration
//!
//! A saved config is read from the platform-appropriate config directory
//! under `dev.plotpipe.plotpipe-rs`:
//!
//! - **Linux**: `~/.config/dev.plotpipe.plotpipe-rs/session.toml`
//! - **macOS**: `~/Library/Application Support/dev.plotpipe.plotpipe-rs/session.toml`
//! - **Windows**: `%APPDATA%\dev.plotpipe.plotpipe-rs\session.toml`
//!
//! ## Example
//!
//! ```ignore
//! use plotpipe_rs::{Session, SessionConfig};
//!
//! fn main() -> plotpipe_rs::Result<()> {
//!     let mut session = Session::with_config(SessionConfig::default())?;
//!
//!     session.set_xlabel("x")?;
//!     session.set_ylabel("x^2")?;
//!     session.set_style("lines");
//!
//!     let ys: Vec<f64> = (0..50).map(|i| (i * i) as f64).collect();
//!     session.plot_series(&ys, Some("parabola"))?;
//!
//!     // Edges [0, 1, 2, 3): counts of the raw values, drawn as boxes
//!     session.plot_histogram(&[0.0, 1.0, 2.0, 3.0], &[0.5, 1.5, 1.5], 3, false, Some("h"))?;
//!
//!     session.close()?;
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use backend::{CloseStatus, CommandChannel, CommandSink, ExecutableResolver, TempFileStore};
pub use config::{OverlongPolicy, SessionConfig};
pub use error::{PlotError, Result};
pub use session::{
    plot_once, HistogramOptions, OnceRequest, PlotOutcome, Session, SessionState, SessionWarning,
};
pub use types::{DrawStyle, PlotVerb};
