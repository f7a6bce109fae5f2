//! Executable lookup, the equivalent of `which`
//!
//! The lookup is a pure function over its inputs (program name, search path
//! value, working directory) so it can be tested without touching the
//! process environment. [`SearchPathResolver`] binds it to the real
//! environment and is the default [`ExecutableResolver`] of a session.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Locates the directory containing an executable
#[cfg_attr(test, mockall::automock)]
pub trait ExecutableResolver {
    /// Directory containing `name`, or `None` when it cannot be found
    fn locate(&self, name: &str) -> Option<PathBuf>;
}

/// Resolver reading `PATH` from the process environment
#[derive(Debug, Clone, Default)]
pub struct SearchPathResolver {
    /// Overrides the `PATH` value when set
    search_path: Option<OsString>,
}

impl SearchPathResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `search_path` instead of the `PATH` environment variable
    pub fn with_search_path(search_path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(search_path.into()),
        }
    }
}

impl ExecutableResolver for SearchPathResolver {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        let env_path;
        let search_path = match &self.search_path {
            Some(path) => Some(path.as_os_str()),
            None => {
                env_path = std::env::var_os("PATH");
                if env_path.is_none() {
                    tracing::warn!("PATH variable not set");
                }
                env_path.as_deref()
            }
        };
        locate_in(name, search_path, Path::new("."))
    }
}

/// Find the directory holding executable `name`
///
/// The working directory `cwd` is tried first, then every entry of
/// `search_path` in order (an empty entry stands for `cwd`). A name that
/// already contains a path separator is checked as given and never
/// searched for.
pub fn locate_in(name: &str, search_path: Option<&OsStr>, cwd: &Path) -> Option<PathBuf> {
    if name.is_empty() {
        return None;
    }

    if has_separator(name) {
        let path = Path::new(name);
        let candidate = if path.is_absolute() {
            path.to_path_buf()
        } else {
            cwd.join(path)
        };
        if !is_executable(&candidate) {
            return None;
        }
        return Some(match candidate.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => cwd.to_path_buf(),
        });
    }

    if is_executable(&cwd.join(name)) {
        return Some(cwd.to_path_buf());
    }

    let search_path = search_path?;
    std::env::split_paths(search_path)
        .map(|dir| {
            if dir.as_os_str().is_empty() {
                cwd.to_path_buf()
            } else {
                dir
            }
        })
        .find(|dir| is_executable(&dir.join(name)))
}

fn has_separator(name: &str) -> bool {
    name.contains('/') || name.contains(std::path::MAIN_SEPARATOR)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file() || path.with_extension("exe").is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn make_file(dir: &Path, name: &str, mode: u32) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
        path
    }

    #[test]
    fn test_cwd_wins_over_search_path() {
        let cwd = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        make_file(cwd.path(), "hello", 0o755);
        make_file(bin.path(), "hello", 0o755);

        let found = locate_in("hello", Some(bin.path().as_os_str()), cwd.path());
        assert_eq!(found.as_deref(), Some(cwd.path()));
    }

    #[test]
    fn test_first_hit_in_path_order() {
        let cwd = tempfile::tempdir().unwrap();
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        make_file(first.path(), "plotter", 0o755);
        make_file(second.path(), "plotter", 0o755);

        let search = std::env::join_paths([second.path(), first.path()]).unwrap();
        let found = locate_in("plotter", Some(&search), cwd.path());
        assert_eq!(found.as_deref(), Some(second.path()));
    }

    #[test]
    fn test_non_executable_is_skipped() {
        let cwd = tempfile::tempdir().unwrap();
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        make_file(first.path(), "plotter", 0o644);
        make_file(second.path(), "plotter", 0o700);

        let search = std::env::join_paths([first.path(), second.path()]).unwrap();
        let found = locate_in("plotter", Some(&search), cwd.path());
        assert_eq!(found.as_deref(), Some(second.path()));
    }

    #[test]
    fn test_empty_segments_are_tolerated() {
        let cwd = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        make_file(bin.path(), "tool", 0o755);

        let search = format!("::{}", bin.path().display());
        let found = locate_in("tool", Some(OsStr::new(&search)), cwd.path());
        assert_eq!(found.as_deref(), Some(bin.path()));
    }

    #[test]
    fn test_not_found() {
        let cwd = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        assert_eq!(
            locate_in("no-such-plotter", Some(bin.path().as_os_str()), cwd.path()),
            None
        );
        assert_eq!(locate_in("no-such-plotter", None, cwd.path()), None);
        assert_eq!(locate_in("", Some(bin.path().as_os_str()), cwd.path()), None);
    }

    #[test]
    fn test_name_with_separator_is_checked_literally() {
        let cwd = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        let exe = make_file(bin.path(), "gp", 0o755);

        let found = locate_in(exe.to_str().unwrap(), None, cwd.path());
        assert_eq!(found.as_deref(), Some(bin.path()));

        // A separator-bearing name is never searched for in PATH
        let missing = format!("sub/{}", "gp");
        assert_eq!(
            locate_in(&missing, Some(bin.path().as_os_str()), cwd.path()),
            None
        );
    }

    #[test]
    fn test_directory_is_not_an_executable() {
        let cwd = tempfile::tempdir().unwrap();
        std::fs::create_dir(cwd.path().join("plotdir")).unwrap();
        assert_eq!(locate_in("plotdir", None, cwd.path()), None);
    }

    #[test]
    fn test_resolver_with_explicit_search_path() {
        let bin = tempfile::tempdir().unwrap();
        make_file(bin.path(), "explicit-plotter-xyz", 0o755);

        let resolver = SearchPathResolver::with_search_path(bin.path().as_os_str());
        assert_eq!(
            resolver.locate("explicit-plotter-xyz").as_deref(),
            Some(bin.path())
        );
    }
}
