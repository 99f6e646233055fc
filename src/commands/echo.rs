use std::io::{Read, Write};

use super::util::write_lines;
use super::Application;
use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

/// `echo [ARG]...`: arguments joined by single spaces, newline-terminated.
pub struct Echo;

impl Application for Echo {
    fn run(
        &self,
        args: &[String],
        _env: &Environment,
        _stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError> {
        write_lines("echo", stdout, &[args.join(" ")])?;
        Ok(Outcome::Continue)
    }
}
