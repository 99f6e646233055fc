//! The top-level façade: one-shot evaluation and the interactive loop.

use std::io::{self, BufRead, Read, Write};

use log::{info, warn};

use crate::config::Config;
use crate::environment::Environment;
use crate::error::ShellError;
use crate::eval::{Context, ErrorSink, Evaluator, Outcome};
use crate::parse;

pub struct Shell {
    ctx: Context,
}

impl Shell {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    /// A shell started in the process working directory.
    pub fn from_config(config: &Config) -> io::Result<Self> {
        Ok(Self::with_environment(config, Environment::from_process()?))
    }

    /// A shell started in `env`, reporting errors to stderr.
    pub fn with_environment(config: &Config, env: Environment) -> Self {
        Self::new(Context::from_config(config, env))
    }

    /// Send error messages to `sink` instead of stderr.
    pub fn with_error_sink(mut self, sink: ErrorSink) -> Self {
        self.ctx.errors = sink;
        self
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Parse and evaluate one line with an empty stdin.
    pub fn parse_and_evaluate(
        &self,
        line: &str,
        stdout: &mut (dyn Write + Send),
    ) -> Result<Outcome, ShellError> {
        self.evaluate_with_input(line, &mut io::empty(), stdout)
    }

    /// Parse and evaluate one line.
    ///
    /// Only a parse failure is returned as an error: failures inside the
    /// line's sequence are reported to the error sink as they happen.
    pub fn evaluate_with_input(
        &self,
        line: &str,
        stdin: &mut (dyn Read + Send),
        stdout: &mut (dyn Write + Send),
    ) -> Result<Outcome, ShellError> {
        let command = parse::parse(line)?;
        let outcome = Evaluator::new(&self.ctx).evaluate(&command, stdin, stdout)?;
        stdout.flush()?;
        Ok(outcome)
    }

    /// Read-evaluate loop.
    ///
    /// Prints the prompt, reads a line and evaluates it, with `input` also
    /// serving as the commands' stdin. Returns the exit status: the one from
    /// `exit`, or 0 at end of input or on a read error.
    pub fn run_repl<R>(&self, input: &mut R, stdout: &mut (dyn Write + Send)) -> i32
    where
        R: BufRead + Send,
    {
        info!("repl started in {}", self.ctx.env.current_dir().display());
        let mut line = String::new();
        loop {
            if write!(stdout, "{}", self.ctx.settings.prompt)
                .and_then(|()| stdout.flush())
                .is_err()
            {
                return 0;
            }

            line.clear();
            match input.read_line(&mut line) {
                Ok(0) => {
                    info!("repl reached end of input");
                    return 0;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!("repl read failed: {e}");
                    return 0;
                }
            }

            let text = line.trim_end_matches(['\n', '\r']);
            if text.trim().is_empty() {
                continue;
            }
            match self.evaluate_with_input(text, input, stdout) {
                Ok(Outcome::Continue) => {}
                Ok(Outcome::Exit(code)) => {
                    info!("repl exiting with status {code}");
                    return code;
                }
                Err(e) => self.ctx.errors.report(&e),
            }
        }
    }
}
