use std::io::{Read, Write};

use super::args::parse_args;
use super::util::{lines, read_operand, write_lines, STDIN_OPERAND};
use super::Application;
use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

const APP: &str = "paste";

/// `paste [-s] [FILE]...`
///
/// Without `-s`, line *i* of every input is joined by tabs; shorter inputs
/// contribute empty fields. With `-s`, each input becomes one tab-joined line.
/// Stdin is read once; a repeated `-` sees it already drained.
pub struct Paste;

impl Application for Paste {
    fn run(
        &self,
        args: &[String],
        env: &Environment,
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError> {
        let parsed = parse_args(APP, args, "s")?;
        let mut operands = parsed.operands.clone();
        if operands.is_empty() {
            operands.push(STDIN_OPERAND.to_string());
        }

        let mut columns = Vec::with_capacity(operands.len());
        for name in &operands {
            columns.push(lines(&read_operand(APP, env, name, stdin)?));
        }

        let out = if parsed.has('s') {
            columns.iter().map(|col| col.join("\t")).collect()
        } else {
            merge(&columns)
        };
        write_lines(APP, stdout, &out)?;
        Ok(Outcome::Continue)
    }
}

fn merge(columns: &[Vec<String>]) -> Vec<String> {
    let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
    (0..rows)
        .map(|i| {
            columns
                .iter()
                .map(|col| col.get(i).map(String::as_str).unwrap_or(""))
                .collect::<Vec<_>>()
                .join("\t")
        })
        .collect()
}
