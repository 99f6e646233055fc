//! Session-wide working directory.
//!
//! The shell never calls `std::env::set_current_dir`: every path a builtin or
//! the globber touches is resolved against the directory held here, so a test
//! can run against its own temporary directory without touching process state.

use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;

/// Holds the current working directory of one shell session.
///
/// Pipeline stages read it from several threads. The lock only keeps that
/// memory-safe; running `cd` in one stage while a sibling resolves paths still
/// has no defined ordering.
#[derive(Debug)]
pub struct Environment {
    cwd: RwLock<PathBuf>,
}

impl Environment {
    /// Start in `dir`, which should be absolute.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            cwd: RwLock::new(dir.into()),
        }
    }

    /// Start in the process working directory.
    pub fn from_process() -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    pub fn current_dir(&self) -> PathBuf {
        match self.cwd.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Change directory to `path` (relative paths are taken from the current
    /// directory). Fails unless the target is an existing directory.
    pub fn set_current_dir(&self, path: impl AsRef<Path>) -> io::Result<PathBuf> {
        let target = self.resolve(path);
        if !target.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("{}: Not a directory", target.display()),
            ));
        }
        log::info!("cd {}", target.display());
        match self.cwd.write() {
            Ok(mut guard) => *guard = target.clone(),
            Err(poisoned) => *poisoned.into_inner() = target.clone(),
        }
        Ok(target)
    }

    /// Join `path` onto the current directory and normalise `.` and `..`
    /// lexically. Absolute paths are only normalised.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.current_dir().join(path)
        };
        normalize(&joined)
    }
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `/..` stays `/`
                if !matches!(out.components().next_back(), Some(Component::RootDir) | None) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_relative() {
        let env = Environment::new("/home/user");
        assert_eq!(env.resolve("docs/a.txt"), PathBuf::from("/home/user/docs/a.txt"));
    }

    #[test]
    fn resolve_parent_and_current() {
        let env = Environment::new("/home/user");
        assert_eq!(env.resolve("../other/./b"), PathBuf::from("/home/other/b"));
    }

    #[test]
    fn resolve_absolute_ignores_cwd() {
        let env = Environment::new("/home/user");
        assert_eq!(env.resolve("/tmp/x"), PathBuf::from("/tmp/x"));
    }

    #[test]
    fn parent_of_root_is_root() {
        let env = Environment::new("/");
        assert_eq!(env.resolve(".."), PathBuf::from("/"));
    }

    #[test]
    fn set_current_dir_requires_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "x").unwrap();

        let env = Environment::new(dir.path());
        assert!(env.set_current_dir("plain.txt").is_err());
        assert_eq!(env.current_dir(), dir.path());

        std::fs::create_dir(dir.path().join("sub")).unwrap();
        env.set_current_dir("sub").unwrap();
        assert_eq!(env.current_dir(), dir.path().join("sub"));
    }
}
