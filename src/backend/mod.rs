//! Backend components driven by a plotting session
//!
//! Everything below the [`Session`](crate::session::Session) lives here:
//! finding the plotting program, keeping the temp files that hold plotted
//! data, formatting commands and pushing them down the pipe.
//!
//! # Components
//!
//! - [`ExecutableResolver`] / [`SearchPathResolver`] - Locate the program in CWD and `PATH`
//! - [`TempFileStore`] - Bounded pool of uniquely named data files
//! - [`command`] - Command grammar, quoting, number formatting and the length limit
//! - [`CommandSink`] / [`CommandChannel`] - One-way pipe to the spawned process
//! - [`MemorySink`] - In-memory sink for tests (feature-gated)
//!
//! # Example
//!
//! ```ignore
//! use plotpipe_rs::backend::{CommandChannel, CommandSink, SpawnOptions, TempFileStore};
//!
//! let mut store = TempFileStore::new(std::env::temp_dir(), "gnuplot-i-", 64);
//! let path = store.store_series(&[1.0, 4.0, 9.0])?;
//!
//! let mut channel = CommandChannel::open("gnuplot", &SpawnOptions::default())?;
//! channel.send_line(&format!("plot \"{}\" with lines", path.display()))?;
//! channel.close()?;
//! store.clear();
//! ```

pub mod channel;
pub mod command;
#[cfg(any(test, feature = "mock-channel"))]
pub mod mock_channel;
pub mod path_resolver;
pub mod temp_store;

pub use channel::{CloseStatus, CommandChannel, CommandSink, SpawnOptions};
pub use command::CommandLimit;
#[cfg(any(test, feature = "mock-channel"))]
pub use mock_channel::{MemorySink, MemorySinkHandle};
pub use path_resolver::{locate_in, ExecutableResolver, SearchPathResolver};
pub use temp_store::{TempDataFile, TempFileStore};
