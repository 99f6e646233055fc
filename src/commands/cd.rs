use std::io::{self, Read, Write};

use super::util::{E_FILE_NOT_FOUND, E_NO_ARGS, E_NO_PERM, E_TOO_MANY_ARGS};
use super::Application;
use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

const APP: &str = "cd";

/// `cd DIR`: change the session's working directory.
pub struct Cd;

impl Application for Cd {
    fn run(
        &self,
        args: &[String],
        env: &Environment,
        _stdin: &mut dyn Read,
        _stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError> {
        let target = match args {
            [] => return Err(AppError::new(APP, E_NO_ARGS)),
            [one] => one,
            _ => return Err(AppError::new(APP, E_TOO_MANY_ARGS)),
        };
        if target.is_empty() {
            return Err(AppError::new(APP, E_NO_ARGS));
        }

        let path = env.resolve(target);
        if !path.exists() {
            return Err(AppError::new(APP, format!("{target}: {E_FILE_NOT_FOUND}")));
        }
        if !path.is_dir() {
            return Err(AppError::new(APP, format!("{target}: Not a directory")));
        }
        if let Err(e) = std::fs::read_dir(&path) {
            if e.kind() == io::ErrorKind::PermissionDenied {
                return Err(AppError::new(APP, format!("{target}: {E_NO_PERM}")));
            }
        }

        env.set_current_dir(&path).map_err(|e| AppError::io(APP, e))?;
        Ok(Outcome::Continue)
    }
}
