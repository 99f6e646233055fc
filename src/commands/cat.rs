use std::io::{self, Read, Write};

use super::args::parse_args;
use super::util::{lines, open_file, read_all, write_all, STDIN_OPERAND};
use super::Application;
use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

const APP: &str = "cat";

/// `cat [-n] [FILE]...`
///
/// Files are processed in order. A file that cannot be opened is skipped and
/// the first such failure is returned once the others have been written.
pub struct Cat;

impl Application for Cat {
    fn run(
        &self,
        args: &[String],
        env: &Environment,
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError> {
        let parsed = parse_args(APP, args, "n")?;
        let number = parsed.has('n');
        let mut operands = parsed.operands;
        if operands.is_empty() {
            operands.push(STDIN_OPERAND.to_string());
        }

        let mut line_no = 0usize;
        let mut first_err = None;
        for name in &operands {
            let result = if name == STDIN_OPERAND {
                emit(stdin, stdout, number, &mut line_no)
            } else {
                open_file(APP, env, name)
                    .and_then(|mut file| emit(&mut file, stdout, number, &mut line_no))
            };
            if let Err(e) = result {
                if e.is_broken_pipe() {
                    return Err(e);
                }
                first_err.get_or_insert(e);
            }
        }
        stdout.flush().map_err(|e| AppError::io(APP, e))?;

        match first_err {
            Some(e) => Err(e),
            None => Ok(Outcome::Continue),
        }
    }
}

fn emit(
    input: &mut dyn Read,
    stdout: &mut dyn Write,
    number: bool,
    line_no: &mut usize,
) -> Result<(), AppError> {
    if !number {
        io::copy(input, stdout).map_err(|e| AppError::io(APP, e))?;
        return Ok(());
    }
    let bytes = read_all(APP, input)?;
    for line in lines(&bytes) {
        *line_no += 1;
        write_all(APP, stdout, format!("{:>6}\t{line}\n", *line_no).as_bytes())?;
    }
    Ok(())
}
