//! In-memory command sink for testing
//!
//! [`MemorySink`] records every command line instead of piping it to a
//! process. A cloned [`MemorySinkHandle`] stays with the test so the
//! recorded lines can be inspected after the sink has been moved into a
//! session, and so a broken pipe can be simulated.
//!
//! # Enabling
//!
//! Outside of this crate's own unit tests the sink is only available with
//! the `mock-channel` feature:
//!
//! ```bash
//! cargo test --features mock-channel
//! ```

use crate::error::{PlotError, Result, ResultExt};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::channel::{CloseStatus, CommandSink};

#[derive(Debug, Default)]
struct Shared {
    lines: Mutex<Vec<String>>,
    open: AtomicBool,
    failing: AtomicBool,
    closes: AtomicUsize,
}

/// Command sink that stores lines in memory
#[derive(Debug)]
pub struct MemorySink {
    shared: Arc<Shared>,
}

/// Test-side view of a [`MemorySink`]
#[derive(Debug, Clone)]
pub struct MemorySinkHandle {
    shared: Arc<Shared>,
}

impl MemorySink {
    /// Create an open sink and a handle observing it
    pub fn new() -> (Self, MemorySinkHandle) {
        let shared = Arc::new(Shared::default());
        shared.open.store(true, Ordering::SeqCst);
        (
            Self {
                shared: shared.clone(),
            },
            MemorySinkHandle { shared },
        )
    }
}

impl CommandSink for MemorySink {
    fn send_line(&mut self, line: &str) -> Result<()> {
        if !self.shared.open.load(Ordering::SeqCst) {
            return Err(PlotError::ChannelClosed);
        }
        if self.shared.failing.load(Ordering::SeqCst) {
            return Err::<(), _>(io::Error::new(io::ErrorKind::BrokenPipe, "simulated broken pipe"))
                .context("Failed to send command to plotting process");
        }
        if let Ok(mut lines) = self.shared.lines.lock() {
            lines.push(line.to_string());
        }
        Ok(())
    }

    fn close(&mut self) -> Result<CloseStatus> {
        if self.shared.open.swap(false, Ordering::SeqCst) {
            self.shared.closes.fetch_add(1, Ordering::SeqCst);
            Ok(CloseStatus::Clean)
        } else {
            Ok(CloseStatus::AlreadyClosed)
        }
    }

    fn is_open(&self) -> bool {
        self.shared.open.load(Ordering::SeqCst)
    }
}

impl MemorySinkHandle {
    /// Every line sent so far, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.shared
            .lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    /// The most recent line
    pub fn last_line(&self) -> Option<String> {
        self.lines().pop()
    }

    pub fn line_count(&self) -> usize {
        self.shared.lines.lock().map(|l| l.len()).unwrap_or(0)
    }

    /// Make subsequent sends fail as if the pipe broke
    pub fn set_failing(&self, failing: bool) {
        self.shared.failing.store(failing, Ordering::SeqCst);
    }

    pub fn is_open(&self) -> bool {
        self.shared.open.load(Ordering::SeqCst)
    }

    /// How many times the sink was actually closed (not counting repeats)
    pub fn close_count(&self) -> usize {
        self.shared.closes.load(Ordering::SeqCst)
    }
}
