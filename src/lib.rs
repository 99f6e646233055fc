//! tinysh: a small line-oriented shell with in-process builtins.
//!
//! A line is parsed into a [`Sequence`](parse::Sequence) of
//! [`Pipe`](parse::Pipe)s of [`Call`](parse::Call)s. Each call has its
//! redirections opened, its arguments resolved (quotes, backtick
//! substitution, `*` globbing) and is then dispatched to an
//! [`Application`](commands::Application) found in the
//! [`Registry`](eval::Registry). Pipeline stages run concurrently on
//! threads connected by OS pipes.
//!
//! # Architecture
//!
//! - **[`parse`]**: line splitting, quote tracking, raw tokenization, command tree.
//! - **[`eval`]**: evaluator, argument resolver, globbing, redirection, pipelines.
//! - **[`commands`]**: the `Application` trait and the builtin applications.
//! - **[`config`]**: embedded defaults + user overlay merge.
//! - **[`logging`]**: file logger setup.
//! - **[`shell`]**: the [`Shell`](shell::Shell) façade and the REPL.

/// Application trait, flag parsing and builtins.
pub mod commands;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
pub mod environment;
pub mod error;
/// Evaluation engine: registry, context, resolver, pipelines.
pub mod eval;
/// File-based logging.
pub mod logging;
/// Line parsing and the command tree.
pub mod parse;
pub mod shell;

use environment::Environment;
use error::ShellError;
use eval::Outcome;

/// Evaluate `line` with the default configuration in `env` and return what it
/// wrote to stdout.
///
/// Errors inside the line are written to stderr as the REPL would; only a
/// parse failure is returned. Mostly useful for tests and quick embedding.
pub fn evaluate(line: &str, env: Environment) -> Result<(Outcome, String), ShellError> {
    let config = config::Config::default_config();
    let shell = shell::Shell::with_environment(&config, env);
    let mut out: Vec<u8> = Vec::new();
    let outcome = shell.parse_and_evaluate(line, &mut out)?;
    Ok((outcome, String::from_utf8_lossy(&out).into_owned()))
}
