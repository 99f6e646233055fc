use std::cmp::Ordering;
use std::io::{Read, Write};

use super::args::parse_args;
use super::util::{lines, read_operand, write_lines, STDIN_OPERAND};
use super::Application;
use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

const APP: &str = "sort";

/// `sort [-nrf] [FILE]...`: sort the lines of all inputs together.
pub struct Sort;

impl Application for Sort {
    fn run(
        &self,
        args: &[String],
        env: &Environment,
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError> {
        let parsed = parse_args(APP, args, "nrf")?;
        let mut operands = parsed.operands.clone();
        if operands.is_empty() {
            operands.push(STDIN_OPERAND.to_string());
        }

        let mut all = Vec::new();
        for name in &operands {
            all.extend(lines(&read_operand(APP, env, name, stdin)?));
        }

        let order = Order {
            numeric: parsed.has('n'),
            fold: parsed.has('f'),
        };
        all.sort_by(|a, b| order.compare(a, b));
        if parsed.has('r') {
            all.reverse();
        }

        write_lines(APP, stdout, &all)?;
        Ok(Outcome::Continue)
    }
}

#[derive(Debug, Clone, Copy)]
struct Order {
    numeric: bool,
    fold: bool,
}

impl Order {
    fn compare(self, a: &str, b: &str) -> Ordering {
        let (a, b) = if self.fold {
            (a.to_lowercase(), b.to_lowercase())
        } else {
            (a.to_string(), b.to_string())
        };
        if self.numeric {
            compare_chunks(&a, &b)
        } else {
            a.cmp(&b)
        }
    }
}

/// Compare strings chunk by chunk, where runs of ASCII digits compare by
/// numeric value and everything else compares by code point.
fn compare_chunks(a: &str, b: &str) -> Ordering {
    let (ca, cb) = (chunks(a), chunks(b));
    for (x, y) in ca.iter().zip(cb.iter()) {
        let ord = match (is_number(x), is_number(y)) {
            (true, true) => compare_digits(x, y),
            _ => x.cmp(y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    ca.len().cmp(&cb.len())
}

fn is_number(chunk: &str) -> bool {
    chunk.starts_with(|c: char| c.is_ascii_digit())
}

fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn chunks(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut digits = None;
    for (i, c) in s.char_indices() {
        let d = c.is_ascii_digit();
        if digits.is_some_and(|prev| prev != d) {
            out.push(&s[start..i]);
            start = i;
        }
        digits = Some(d);
    }
    if start < s.len() {
        out.push(&s[start..]);
    }
    out
}
