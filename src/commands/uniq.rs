use std::fs::File;
use std::io::{Read, Write};

use super::args::parse_args;
use super::util::{lines, read_operand, write_lines, E_IS_DIR, E_TOO_MANY_ARGS, STDIN_OPERAND};
use super::Application;
use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

const APP: &str = "uniq";

/// `uniq [-cdD] [INPUT [OUTPUT]]`: collapse adjacent duplicate lines.
pub struct Uniq;

impl Application for Uniq {
    fn run(
        &self,
        args: &[String],
        env: &Environment,
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError> {
        let parsed = parse_args(APP, args, "cdD")?;
        let (input, output) = match parsed.operands.as_slice() {
            [] => (STDIN_OPERAND, None),
            [input] => (input.as_str(), None),
            [input, output] => (input.as_str(), Some(output.as_str())),
            _ => return Err(AppError::new(APP, E_TOO_MANY_ARGS)),
        };
        if parsed.has('c') && parsed.has('D') {
            return Err(AppError::new(
                APP,
                "printing all duplicated lines and repeat counts is meaningless",
            ));
        }

        let text = read_operand(APP, env, input, stdin)?;
        let mode = if parsed.has('D') {
            Mode::AllRepeated
        } else if parsed.has('d') {
            Mode::Repeated
        } else {
            Mode::All
        };
        let result = collapse(&lines(&text), mode, parsed.has('c'));

        match output {
            None => write_lines(APP, stdout, &result)?,
            Some(name) => {
                let path = env.resolve(name);
                if path.is_dir() {
                    return Err(AppError::new(APP, format!("{name}: {E_IS_DIR}")));
                }
                let mut file = File::create(&path).map_err(|e| AppError::io(APP, e))?;
                write_lines(APP, &mut file, &result)?;
            }
        }
        Ok(Outcome::Continue)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    All,
    Repeated,
    AllRepeated,
}

fn collapse(lines: &[String], mode: Mode, count: bool) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = lines;
    while let Some(first) = rest.first() {
        let run = rest.iter().take_while(|l| *l == first).count();
        let (group, tail) = rest.split_at(run);
        rest = tail;

        match mode {
            Mode::All => {}
            Mode::Repeated | Mode::AllRepeated if run < 2 => continue,
            Mode::Repeated => {}
            Mode::AllRepeated => {
                out.extend(group.iter().cloned());
                continue;
            }
        }
        if count {
            out.push(format!("{run:>7} {first}"));
        } else {
            out.push(first.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniq(env: &Environment, args: &[&str], input: &str) -> Result<String, String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut stdin = input.as_bytes();
        let mut out: Vec<u8> = Vec::new();
        Uniq.run(&args, env, &mut stdin, &mut out)
            .map(|_| String::from_utf8(out).unwrap())
            .map_err(|e| e.to_string())
    }

    const INPUT: &str = "a\na\nb\nc\nc\nc\na\n";

    #[test]
    fn adjacent_only() {
        let env = Environment::new("/");
        assert_eq!(uniq(&env, &[], INPUT).unwrap(), "a\nb\nc\na\n");
    }

    #[test]
    fn counts() {
        let env = Environment::new("/");
        assert_eq!(
            uniq(&env, &["-c"], INPUT).unwrap(),
            "      2 a\n      1 b\n      3 c\n      1 a\n"
        );
    }

    #[test]
    fn repeated_groups() {
        let env = Environment::new("/");
        assert_eq!(uniq(&env, &["-d"], INPUT).unwrap(), "a\nc\n");
        assert_eq!(uniq(&env, &["-D"], INPUT).unwrap(), "a\na\nc\nc\nc\n");
    }

    #[test]
    fn writes_output_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("in.txt"), "x\nx\ny\n").unwrap();
        let env = Environment::new(dir.path());

        assert_eq!(uniq(&env, &["in.txt", "out.txt"], "").unwrap(), "");
        let written = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        assert_eq!(written, "x\ny\n");
    }

    #[test]
    fn too_many_operands() {
        let env = Environment::new("/");
        assert_eq!(
            uniq(&env, &["a", "b", "c"], "").unwrap_err(),
            "uniq: Too many arguments"
        );
    }
}
