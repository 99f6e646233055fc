use std::io::{Read, Write};

use regex::{Regex, RegexBuilder};

use super::args::parse_args;
use super::util::{lines, read_operand, write_lines, E_NO_ARGS, STDIN_OPERAND};
use super::Application;
use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

const APP: &str = "grep";
const STDIN_LABEL: &str = "(standard input)";

/// `grep [-icH] PATTERN [FILE]...`
///
/// Prints matching lines. Output lines are prefixed with `<file>: ` when
/// `-H` is given or more than one input is searched.
pub struct Grep;

impl Application for Grep {
    fn run(
        &self,
        args: &[String],
        env: &Environment,
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError> {
        let parsed = parse_args(APP, args, "icH")?;
        let Some((pattern, files)) = parsed.operands.split_first() else {
            return Err(AppError::new(APP, E_NO_ARGS));
        };
        let regex = compile(pattern, parsed.has('i'))?;

        let mut inputs: Vec<&str> = files.iter().map(String::as_str).collect();
        if inputs.is_empty() {
            inputs.push(STDIN_OPERAND);
        }
        let prefix = parsed.has('H') || inputs.len() > 1;
        let count_only = parsed.has('c');

        let mut out = Vec::new();
        let mut first_err = None;
        for name in inputs {
            let bytes = match read_operand(APP, env, name, stdin) {
                Ok(bytes) => bytes,
                Err(e) => {
                    first_err.get_or_insert(e);
                    continue;
                }
            };
            let label = if name == STDIN_OPERAND { STDIN_LABEL } else { name };
            let matches: Vec<String> = lines(&bytes)
                .into_iter()
                .filter(|line| regex.is_match(line))
                .collect();

            if count_only {
                out.push(labelled(prefix, label, &matches.len().to_string()));
            } else {
                out.extend(matches.iter().map(|line| labelled(prefix, label, line)));
            }
        }
        write_lines(APP, stdout, &out)?;

        match first_err {
            Some(e) => Err(e),
            None => Ok(Outcome::Continue),
        }
    }
}

fn compile(pattern: &str, ignore_case: bool) -> Result<Regex, AppError> {
    RegexBuilder::new(pattern)
        .case_insensitive(ignore_case)
        .build()
        .map_err(|_| AppError::new(APP, format!("{pattern}: Invalid regular expression supplied")))
}

fn labelled(prefix: bool, label: &str, text: &str) -> String {
    if prefix {
        format!("{label}: {text}")
    } else {
        text.to_string()
    }
}
