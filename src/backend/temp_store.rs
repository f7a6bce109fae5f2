//! Temp file pool backing plotted data
//!
//! Each data-backed plot writes its values to a fresh, uniquely named file
//! under the temp directory and hands gnuplot the path. The store tracks
//! those files in creation order and deletes them all on reset or close.
//!
//! The pool is bounded: with a capacity of `N`, at most `N - 1` files can
//! be live at once and the allocation that would reach `N` is refused.

use crate::backend::command::format_number;
use crate::error::{PlotError, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// A freshly allocated, tracked and still empty data file
#[derive(Debug)]
pub struct TempDataFile {
    file: File,
    path: PathBuf,
}

impl TempDataFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Bounded, ordered collection of temp files owned by one session
#[derive(Debug)]
pub struct TempFileStore {
    /// Directory new files are created in
    dir: PathBuf,
    /// File name prefix
    prefix: String,
    /// Pool capacity (live files never reach this number)
    capacity: usize,
    /// Tracked files, oldest first
    files: Vec<PathBuf>,
}

impl TempFileStore {
    /// Create an empty store
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, capacity: usize) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            capacity,
            files: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Tracked files in creation order
    pub fn paths(&self) -> &[PathBuf] {
        &self.files
    }

    /// Number of allocations that can still succeed
    pub fn remaining(&self) -> usize {
        self.capacity
            .saturating_sub(1)
            .saturating_sub(self.files.len())
    }

    /// Create and track a new uniquely named file
    ///
    /// The file is tracked before anything is written to it, so it is
    /// deleted by [`clear`](Self::clear) no matter how the write goes.
    pub fn allocate(&mut self) -> Result<TempDataFile> {
        if self.files.len() + 1 >= self.capacity {
            tracing::warn!(
                "Maximum # of temporary files reached ({}): cannot open more",
                self.capacity
            );
            return Err(PlotError::CapacityExceeded {
                limit: self.capacity,
            });
        }

        let (file, path) = tempfile::Builder::new()
            .prefix(&self.prefix)
            .tempfile_in(&self.dir)
            .and_then(|named| named.keep().map_err(|e| e.error))
            .map_err(|e| {
                PlotError::Io(e).with_context(format!(
                    "Cannot create temporary file in {:?}",
                    self.dir
                ))
            })?;

        tracing::debug!("Allocated temp file {:?}", path);
        self.files.push(path.clone());
        Ok(TempDataFile { file, path })
    }

    /// Write one value per line
    pub fn write_series(&mut self, file: TempDataFile, values: &[f64]) -> Result<PathBuf> {
        self.write_with(file, |writer| {
            for value in values {
                writeln!(writer, "{}", format_number(*value))?;
            }
            Ok(())
        })
    }

    /// Write `x y` rows, one pair per line
    ///
    /// Rows stop at the end of the shorter slice.
    pub fn write_pairs(&mut self, file: TempDataFile, xs: &[f64], ys: &[f64]) -> Result<PathBuf> {
        self.write_with(file, |writer| {
            for (x, y) in xs.iter().zip(ys) {
                writeln!(writer, "{} {}", format_number(*x), format_number(*y))?;
            }
            Ok(())
        })
    }

    /// Allocate a file and write `values` into it
    pub fn store_series(&mut self, values: &[f64]) -> Result<PathBuf> {
        let file = self.allocate()?;
        self.write_series(file, values)
    }

    /// Allocate a file and write the `(x, y)` rows into it
    pub fn store_pairs(&mut self, xs: &[f64], ys: &[f64]) -> Result<PathBuf> {
        let file = self.allocate()?;
        self.write_pairs(file, xs, ys)
    }

    /// Delete every tracked file and forget them
    ///
    /// Files that are already gone are ignored. Returns the number of
    /// files actually removed.
    pub fn clear(&mut self) -> usize {
        let mut removed = 0;
        for path in self.files.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!("Failed to remove temp file {:?}: {}", path, e),
            }
        }
        if removed > 0 {
            tracing::debug!("Removed {} temp file(s)", removed);
        }
        removed
    }

    fn write_with<F>(&mut self, file: TempDataFile, body: F) -> Result<PathBuf>
    where
        F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
    {
        let TempDataFile { file, path } = file;
        let mut writer = BufWriter::new(file);
        let result = body(&mut writer).and_then(|()| writer.flush());
        drop(writer);

        match result {
            Ok(()) => Ok(path),
            Err(e) => {
                tracing::warn!("Write failed for temp file {:?}: {}", path, e);
                self.release(&path);
                Err(PlotError::Io(e).with_context(format!("Failed to write data to {:?}", path)))
            }
        }
    }

    /// Delete one tracked file and stop tracking it
    ///
    /// Returns `false` if the file could not be removed, in which case it
    /// stays tracked so that [`clear`](Self::clear) retries it.
    pub fn release(&mut self, path: &Path) -> bool {
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!("Failed to remove temp file {:?}: {}", path, e);
                return false;
            }
        }
        self.files.retain(|p| p != path);
        true
    }
}

impl Drop for TempFileStore {
    fn drop(&mut self) {
        if !self.files.is_empty() {
            self.clear();
        }
    }
}
