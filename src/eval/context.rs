use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use super::Registry;
use crate::config::{Config, Settings};
use crate::environment::Environment;
use crate::error::ShellError;

/// Everything an evaluation needs besides its streams.
///
/// Shared by reference between pipeline stage threads, so every field is
/// `Sync`.
pub struct Context {
    pub env: Environment,
    pub registry: Registry,
    pub settings: Settings,
    pub errors: ErrorSink,
}

impl Context {
    pub fn new(env: Environment, registry: Registry, settings: Settings, errors: ErrorSink) -> Self {
        Self {
            env,
            registry,
            settings,
            errors,
        }
    }

    /// Registry and settings from `config`, errors to stderr.
    pub fn from_config(config: &Config, env: Environment) -> Self {
        Self::new(
            env,
            Registry::from_config(config),
            config.settings.clone(),
            ErrorSink::stderr(),
        )
    }
}

/// Destination for error messages, kept apart from every command's stdout.
pub struct ErrorSink {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ErrorSink {
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
        }
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Write one error as a line. Failures to write are ignored: there is
    /// nowhere left to report them.
    pub fn report(&self, err: &ShellError) {
        log::warn!("{err}");
        let mut out = match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = writeln!(out, "{err}");
        let _ = out.flush();
    }
}

impl Default for ErrorSink {
    fn default() -> Self {
        Self::stderr()
    }
}

/// Cloneable in-memory writer; every clone appends to the same buffer.
///
/// Handy as an [`ErrorSink`] target when the caller wants to inspect what was
/// reported.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
