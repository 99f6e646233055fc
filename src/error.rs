//! Error types shared by the parser, the evaluator and the builtins.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Any failure raised while parsing or evaluating a command line.
///
/// The exit request is not an error: it travels as
/// [`Outcome::Exit`](crate::eval::Outcome) instead.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("shell: syntax error: {0}")]
    Syntax(String),

    #[error("shell: {0}")]
    Redirection(#[from] RedirectionError),

    #[error("shell: {0}: command not found")]
    CommandNotFound(String),

    #[error(transparent)]
    Application(#[from] AppError),

    #[error("shell: command substitution nested deeper than {0} levels")]
    SubstitutionDepth(usize),

    #[error("shell: {0}")]
    Io(#[from] io::Error),
}

impl ShellError {
    pub fn syntax(detail: impl Into<String>) -> Self {
        ShellError::Syntax(detail.into())
    }

    /// True when the failure is a write into a pipe whose reader already went away.
    pub fn is_broken_pipe(&self) -> bool {
        match self {
            ShellError::Io(e) => e.kind() == io::ErrorKind::BrokenPipe,
            ShellError::Application(e) => e.is_broken_pipe(),
            _ => false,
        }
    }
}

/// Failures while binding a call's stdin/stdout to files.
#[derive(Debug, Error)]
pub enum RedirectionError {
    #[error("missing file operand after '{0}'")]
    MissingOperand(String),

    #[error("{0}: ambiguous redirect")]
    Ambiguous(String),

    #[error("{}: No such file or directory", .0.display())]
    NotFound(PathBuf),

    #[error("{}: This is a directory", .0.display())]
    IsDirectory(PathBuf),

    #[error("{}: Permission denied", .0.display())]
    PermissionDenied(PathBuf),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RedirectionError {
    /// Classify an `open` failure on `resolved`, reporting it under `path`
    /// (the name as the user typed it).
    pub fn from_open(resolved: &Path, path: PathBuf, source: io::Error) -> Self {
        if resolved.is_dir() {
            return RedirectionError::IsDirectory(path);
        }
        match source.kind() {
            io::ErrorKind::NotFound => RedirectionError::NotFound(path),
            io::ErrorKind::PermissionDenied => RedirectionError::PermissionDenied(path),
            _ => RedirectionError::Io { path, source },
        }
    }
}

/// An error reported by a builtin application, prefixed with its name.
#[derive(Debug, Error)]
#[error("{app}: {message}")]
pub struct AppError {
    pub app: &'static str,
    pub message: String,
    #[source]
    source: Option<io::Error>,
}

impl AppError {
    pub fn new(app: &'static str, message: impl Into<String>) -> Self {
        Self {
            app,
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an I/O failure, keeping the original error as the source.
    pub fn io(app: &'static str, source: io::Error) -> Self {
        Self {
            app,
            message: source.to_string(),
            source: Some(source),
        }
    }

    pub fn is_broken_pipe(&self) -> bool {
        self.source
            .as_ref()
            .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
    }
}
