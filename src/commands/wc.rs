use std::io::{Read, Write};

use super::args::parse_args;
use super::util::{read_operand, write_lines, STDIN_OPERAND};
use super::Application;
use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

const APP: &str = "wc";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Counts {
    lines: usize,
    words: usize,
    bytes: usize,
}

impl Counts {
    fn of(bytes: &[u8]) -> Self {
        Self {
            lines: bytes.iter().filter(|&&b| b == b'\n').count(),
            words: bytes
                .split(|b| b.is_ascii_whitespace())
                .filter(|w| !w.is_empty())
                .count(),
            bytes: bytes.len(),
        }
    }

    fn add(&mut self, other: Counts) {
        self.lines += other.lines;
        self.words += other.words;
        self.bytes += other.bytes;
    }
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    lines: bool,
    words: bool,
    bytes: bool,
}

impl Columns {
    fn render(self, counts: Counts, label: Option<&str>) -> String {
        let mut out = String::new();
        for (on, n) in [
            (self.lines, counts.lines),
            (self.words, counts.words),
            (self.bytes, counts.bytes),
        ] {
            if on {
                out.push('\t');
                out.push_str(&n.to_string());
            }
        }
        if let Some(label) = label {
            out.push(' ');
            out.push_str(label);
        }
        out
    }
}

/// `wc [-clw] [FILE]...`: line, word and byte counts.
pub struct Wc;

impl Application for Wc {
    fn run(
        &self,
        args: &[String],
        env: &Environment,
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError> {
        let parsed = parse_args(APP, args, "clw")?;
        let any = parsed.has('c') || parsed.has('l') || parsed.has('w');
        let columns = Columns {
            lines: !any || parsed.has('l'),
            words: !any || parsed.has('w'),
            bytes: !any || parsed.has('c'),
        };

        if parsed.operands.is_empty() {
            let bytes = read_operand(APP, env, STDIN_OPERAND, stdin)?;
            write_lines(APP, stdout, &[columns.render(Counts::of(&bytes), None)])?;
            return Ok(Outcome::Continue);
        }

        let mut out = Vec::new();
        let mut total = Counts::default();
        let mut first_err = None;
        for name in &parsed.operands {
            match read_operand(APP, env, name, stdin) {
                Ok(bytes) => {
                    let counts = Counts::of(&bytes);
                    total.add(counts);
                    out.push(columns.render(counts, Some(name)));
                }
                Err(e) => {
                    first_err.get_or_insert(e);
                }
            }
        }
        if parsed.operands.len() > 1 {
            out.push(columns.render(total, Some("total")));
        }
        write_lines(APP, stdout, &out)?;

        match first_err {
            Some(e) => Err(e),
            None => Ok(Outcome::Continue),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wc(env: &Environment, args: &[&str], input: &str) -> String {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut stdin = input.as_bytes();
        let mut out: Vec<u8> = Vec::new();
        let _ = Wc.run(&args, env, &mut stdin, &mut out);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn counts_stdin() {
        let env = Environment::new("/");
        assert_eq!(wc(&env, &[], "hello world\nbye\n"), "\t2\t3\t16\n");
    }

    #[test]
    fn lines_only() {
        let env = Environment::new("/");
        assert_eq!(wc(&env, &["-l"], "x\n"), "\t1\n");
    }

    #[test]
    fn flag_order_does_not_change_columns() {
        let env = Environment::new("/");
        assert_eq!(wc(&env, &["-cl"], "ab\n"), wc(&env, &["-l", "-c"], "ab\n"));
        assert_eq!(wc(&env, &["-cl"], "ab\n"), "\t1\t3\n");
    }

    #[test]
    fn files_get_labels_and_total() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a b\n").unwrap();
        std::fs::write(dir.path().join("b.txt"), "c\nd\n").unwrap();
        let env = Environment::new(dir.path());

        assert_eq!(
            wc(&env, &["-lw", "a.txt", "b.txt"], ""),
            "\t1\t2 a.txt\n\t2\t2 b.txt\n\t3\t4 total\n"
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let env = Environment::new(dir.path());
        let args = vec!["nope".to_string()];
        let mut out: Vec<u8> = Vec::new();
        let err = Wc.run(&args, &env, &mut std::io::empty(), &mut out).unwrap_err();
        assert_eq!(err.to_string(), "wc: nope: No such file or directory");
    }
}
