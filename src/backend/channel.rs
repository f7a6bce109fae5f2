//! One-way command channel to the plotting process
//!
//! [`CommandChannel`] spawns the plotting program with its stdin piped,
//! writes newline-terminated commands and flushes after each one. Nothing
//! is ever read back: gnuplot reports errors on its own terminal, so a
//! failed pipe write is the only failure this side can observe.
//!
//! The channel owns the child process. Closing it (explicitly or on drop)
//! closes the write end and waits for the process, reaping it exactly once.

use crate::error::{PlotError, Result, ResultExt};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

/// How the plotting process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseStatus {
    /// Process exited with status 0
    Clean,
    /// Process exited non-zero or was killed (code when available)
    Unclean(Option<i32>),
    /// Already closed by an earlier call
    AlreadyClosed,
}

impl CloseStatus {
    fn from_exit(status: ExitStatus) -> Self {
        if status.success() {
            CloseStatus::Clean
        } else {
            CloseStatus::Unclean(status.code())
        }
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, CloseStatus::Clean)
    }
}

/// Write-only sink for command lines
///
/// The session talks to the plotting process only through this trait, so
/// tests can substitute an in-memory sink for the real pipe.
pub trait CommandSink: Send {
    /// Send one command; the sink adds the line terminator and flushes
    fn send_line(&mut self, line: &str) -> Result<()>;

    /// Stop accepting commands and release the underlying resource
    ///
    /// Calling it again is harmless and reports [`CloseStatus::AlreadyClosed`].
    fn close(&mut self) -> Result<CloseStatus>;

    /// Whether [`send_line`](Self::send_line) can still succeed
    fn is_open(&self) -> bool;
}

/// Options for spawning the plotting process
#[derive(Debug, Clone, Default)]
pub struct SpawnOptions {
    /// Send the child's stdout/stderr to the null device
    pub discard_output: bool,
}

/// Pipe to a running plotting process
#[derive(Debug)]
pub struct CommandChannel {
    program: PathBuf,
    stdin: Option<ChildStdin>,
    child: Option<Child>,
}

impl CommandChannel {
    /// Spawn `program` with no arguments and its stdin piped to this channel
    pub fn open(program: impl AsRef<Path>, options: &SpawnOptions) -> Result<Self> {
        let program = program.as_ref().to_path_buf();
        let mut command = Command::new(&program);
        command.stdin(Stdio::piped());
        if options.discard_output {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let mut child = command.spawn().map_err(|e| {
            PlotError::InitFailed(format!("error starting {}: {}", program.display(), e))
        })?;

        let Some(stdin) = child.stdin.take() else {
            // Reap before bailing out so no zombie is left behind
            let _ = child.kill();
            let _ = child.wait();
            return Err(PlotError::InitFailed(format!(
                "no stdin pipe for {}",
                program.display()
            )));
        };

        tracing::info!("Started {} (pid {})", program.display(), child.id());
        Ok(Self {
            program,
            stdin: Some(stdin),
            child: Some(child),
        })
    }

    /// Path of the spawned program
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Process id while the process has not been reaped
    pub fn pid(&self) -> Option<u32> {
        self.child.as_ref().map(Child::id)
    }
}

impl CommandSink for CommandChannel {
    fn send_line(&mut self, line: &str) -> Result<()> {
        let stdin = self.stdin.as_mut().ok_or(PlotError::ChannelClosed)?;

        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        tracing::trace!("-> {}", line);
        stdin
            .write_all(buf.as_bytes())
            .and_then(|()| stdin.flush())
            .context("Failed to send command to plotting process")
    }

    fn close(&mut self) -> Result<CloseStatus> {
        // Closing stdin is what tells gnuplot to exit
        drop(self.stdin.take());

        let Some(mut child) = self.child.take() else {
            return Ok(CloseStatus::AlreadyClosed);
        };

        let status = child
            .wait()
            .with_context(|| format!("Failed to wait for {}", self.program.display()))?;
        let status = CloseStatus::from_exit(status);
        if status.is_clean() {
            tracing::info!("{} exited cleanly", self.program.display());
        } else {
            tracing::warn!(
                "Problem closing communication to {}: {:?}",
                self.program.display(),
                status
            );
        }
        Ok(status)
    }

    fn is_open(&self) -> bool {
        self.stdin.is_some()
    }
}

impl Drop for CommandChannel {
    fn drop(&mut self) {
        if self.child.is_some() {
            if let Err(e) = self.close() {
                tracing::error!("Failed to close command channel: {}", e);
            }
        }
    }
}
