use std::io::{Read, Write};

use super::Application;
use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

/// `exit [ANY]...`: ask the shell to terminate with status 0.
pub struct Exit;

impl Application for Exit {
    fn run(
        &self,
        _args: &[String],
        _env: &Environment,
        _stdin: &mut dyn Read,
        _stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError> {
        Ok(Outcome::Exit(0))
    }
}
