use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use crate::environment::Environment;
use crate::error::{RedirectionError, ShellError};
use crate::parse::tokenize::{REDIRECT_APPEND, REDIRECT_IN, REDIRECT_OUT};

/// A call's tokens with the redirections taken out and their files open.
#[derive(Debug, Default)]
pub struct Redirections {
    /// Remaining raw tokens, still unresolved.
    pub args: Vec<String>,
    pub input: Option<File>,
    pub output: Option<File>,
}

/// Pull `<`, `>` and `>>` with their operands out of `tokens`.
///
/// Each operand goes through `resolve` and must come back as exactly one
/// word. At most one `<` is allowed. Every `>`/`>>` target is opened (and
/// truncated for `>`) in order; the last one becomes the output. Files opened
/// before a failure are closed when the error returns.
pub fn extract<F>(tokens: &[String], env: &Environment, mut resolve: F) -> Result<Redirections, ShellError>
where
    F: FnMut(&str) -> Result<Vec<String>, ShellError>,
{
    let mut out = Redirections::default();
    let mut iter = tokens.iter();

    while let Some(token) = iter.next() {
        let op = token.as_str();
        if !matches!(op, REDIRECT_IN | REDIRECT_OUT | REDIRECT_APPEND) {
            out.args.push(token.clone());
            continue;
        }

        let operand = match iter.next() {
            Some(next) if !crate::parse::is_redirect(next) => next,
            _ => return Err(RedirectionError::MissingOperand(op.to_string()).into()),
        };
        let mut words = resolve(operand)?;
        if words.len() != 1 {
            return Err(RedirectionError::Ambiguous(operand.clone()).into());
        }
        let name = words.remove(0);
        if name.is_empty() {
            return Err(RedirectionError::NotFound(PathBuf::from(name)).into());
        }

        if op == REDIRECT_IN {
            if out.input.is_some() {
                return Err(ShellError::syntax("only one input redirection is allowed"));
            }
            out.input = Some(open_input(env, &name)?);
        } else {
            out.output = Some(open_output(env, &name, op == REDIRECT_APPEND)?);
        }
    }
    Ok(out)
}

fn open_input(env: &Environment, name: &str) -> Result<File, RedirectionError> {
    let path = env.resolve(name);
    if path.is_dir() {
        return Err(RedirectionError::IsDirectory(PathBuf::from(name)));
    }
    File::open(&path).map_err(|e| RedirectionError::from_open(&path, PathBuf::from(name), e))
}

fn open_output(env: &Environment, name: &str, append: bool) -> Result<File, RedirectionError> {
    let path = env.resolve(name);
    if path.is_dir() {
        return Err(RedirectionError::IsDirectory(PathBuf::from(name)));
    }
    OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(&path)
        .map_err(|e| RedirectionError::from_open(&path, PathBuf::from(name), e))
}
