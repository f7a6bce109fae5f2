//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

use plotpipe_rs::SessionConfig;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A stand-in plotting program that appends everything it reads on stdin
/// to a log file
pub struct FakePlotter {
    /// Holds the script, the command log and the data files
    pub dir: TempDir,
    pub program: PathBuf,
    pub log: PathBuf,
    pub data_dir: PathBuf,
}

impl FakePlotter {
    /// Write an executable script named `name`
    #[cfg(unix)]
    pub fn new(name: &str) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("create temp dir");
        let log = dir.path().join("commands.log");
        let program = dir.path().join(name);
        let data_dir = dir.path().join("data");
        std::fs::create_dir(&data_dir).expect("create data dir");

        let script = format!("#!/bin/sh\nexec cat >> '{}'\n", log.display());
        std::fs::write(&program, script).expect("write fake plotter");
        std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755))
            .expect("make fake plotter executable");

        Self {
            dir,
            program,
            log,
            data_dir,
        }
    }

    /// Config launching this plotter by absolute path
    pub fn config(&self) -> SessionConfig {
        SessionConfig {
            temp_dir: Some(self.data_dir.clone()),
            check_display: false,
            discard_output: true,
            ..SessionConfig::for_program(self.program.to_string_lossy())
        }
    }

    /// Directory holding the script, for PATH based lookup
    pub fn bin_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Command lines received so far
    pub fn commands(&self) -> Vec<String> {
        std::fs::read_to_string(&self.log)
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Number of data files currently on disk
    pub fn data_file_count(&self) -> usize {
        std::fs::read_dir(&self.data_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}
