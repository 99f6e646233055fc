pub mod context;
pub mod glob;
pub mod outcome;
mod pipeline;
pub mod redirect;
pub mod resolve;

pub use context::{Context, ErrorSink, SharedBuffer};
pub use outcome::Outcome;

use std::collections::HashMap;
use std::io::{self, Read, Write};

use log::{debug, warn};

use crate::commands::{self, Application};
use crate::config::Config;
use crate::error::ShellError;
use crate::parse::{self, Call, Command, Sequence};
use resolve::{Resolver, Substitute};

/// Registry of enabled applications, keyed by command name.
pub struct Registry {
    apps: HashMap<String, Box<dyn Application>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            apps: HashMap::new(),
        }
    }

    /// Build the registry from `applications.enabled`. Names without a
    /// builtin implementation are logged and skipped.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::new();
        for name in &config.applications.enabled {
            match commands::builtin(name) {
                Some(app) => registry.register(name.clone(), app),
                None => warn!("no builtin named {name:?}; skipping"),
            }
        }
        registry
    }

    /// Add or replace the application for `name`.
    pub fn register(&mut self, name: impl Into<String>, app: Box<dyn Application>) {
        self.apps.insert(name.into(), app);
    }

    /// Look up an application by exact command name.
    pub fn get(&self, name: &str) -> Option<&dyn Application> {
        self.apps.get(name).map(|b| b.as_ref())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.apps.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Walks a command tree and runs it.
///
/// Cheap to copy: pipeline stages each take their own copy onto their
/// thread. `depth` counts how many backtick substitutions enclose the
/// command being evaluated.
#[derive(Clone, Copy)]
pub struct Evaluator<'a> {
    ctx: &'a Context,
    depth: usize,
}

impl<'a> Evaluator<'a> {
    pub fn new(ctx: &'a Context) -> Self {
        Self { ctx, depth: 0 }
    }

    /// Evaluate `command` against the given streams.
    ///
    /// Inside a sequence, an element's error is reported to the context's
    /// error sink and the next element still runs. `exit` stops the sequence
    /// and comes back as [`Outcome::Exit`].
    pub fn evaluate(
        &self,
        command: &Command,
        stdin: &mut (dyn Read + Send),
        stdout: &mut (dyn Write + Send),
    ) -> Result<Outcome, ShellError> {
        match command {
            Command::Call(call) => self.call(call, stdin, stdout),
            Command::Pipe(pipe) => pipeline::run(*self, &pipe.calls, stdin, stdout),
            Command::Sequence(seq) => self.sequence(seq, stdin, stdout),
        }
    }

    fn sequence(
        &self,
        seq: &Sequence,
        stdin: &mut (dyn Read + Send),
        stdout: &mut (dyn Write + Send),
    ) -> Result<Outcome, ShellError> {
        for element in &seq.commands {
            match self.evaluate(element, stdin, stdout) {
                Ok(Outcome::Continue) => {}
                Ok(exit) => return Ok(exit),
                Err(e) => self.ctx.errors.report(&e),
            }
        }
        Ok(Outcome::Continue)
    }

    /// Run one call: redirections first, then argument resolution, then the
    /// application. Files opened for redirection close when this returns;
    /// the caller's streams are left open.
    pub(crate) fn call(
        &self,
        call: &Call,
        stdin: &mut (dyn Read + Send),
        stdout: &mut (dyn Write + Send),
    ) -> Result<Outcome, ShellError> {
        let substitute = |text: &str| self.substitute(text);
        let substitute: &Substitute = &substitute;
        let resolver = Resolver::new(&self.ctx.env, substitute);

        let mut redirections = redirect::extract(&call.tokens, &self.ctx.env, |t| resolver.resolve(t))?;
        let argv = resolver.resolve_all(&redirections.args)?;
        let Some((name, args)) = argv.split_first() else {
            return Err(ShellError::syntax("empty command"));
        };
        let app = self
            .ctx
            .registry
            .get(name)
            .ok_or_else(|| ShellError::CommandNotFound(name.clone()))?;

        debug!(
            "run: {}",
            shlex::try_join(argv.iter().map(String::as_str)).unwrap_or_else(|_| argv.join(" "))
        );

        let input: &mut dyn Read = match redirections.input.as_mut() {
            Some(file) => file,
            None => stdin,
        };
        let output: &mut dyn Write = match redirections.output.as_mut() {
            Some(file) => file,
            None => stdout,
        };
        let outcome = app.run(args, &self.ctx.env, input, output);
        let flushed = output.flush();
        let outcome = outcome?;
        flushed?;
        Ok(outcome)
    }

    /// Evaluate `text` one substitution level deeper and return its stdout.
    fn substitute(&self, text: &str) -> Result<String, ShellError> {
        let limit = self.ctx.settings.max_substitution_depth;
        if self.depth >= limit {
            return Err(ShellError::SubstitutionDepth(limit));
        }
        let inner = Evaluator {
            ctx: self.ctx,
            depth: self.depth + 1,
        };
        let mut captured = Vec::new();
        inner.capture(text, &mut captured)?;
        Ok(String::from_utf8_lossy(&captured).into_owned())
    }

    /// Run a whole command line with no stdin, writing into `out`.
    ///
    /// Every sequence element runs, but the first failure is returned instead
    /// of reported; later failures go to the error sink. `exit` ends only this
    /// command line.
    fn capture(&self, text: &str, out: &mut Vec<u8>) -> Result<(), ShellError> {
        let command = parse::parse(text)?;
        let elements: Vec<&Command> = match &command {
            Command::Sequence(seq) => seq.commands.iter().collect(),
            other => vec![other],
        };

        let mut first_err = None;
        for element in elements {
            match self.evaluate(element, &mut io::empty(), &mut *out) {
                Ok(Outcome::Continue) => {}
                Ok(Outcome::Exit(_)) => break,
                Err(e) if first_err.is_none() => first_err = Some(e),
                Err(e) => self.ctx.errors.report(&e),
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
