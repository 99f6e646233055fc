use std::collections::BTreeSet;
use std::io::{Read, Write};

use super::args::parse_args;
use super::util::{lines, read_operand, write_lines, E_NO_ARGS, STDIN_OPERAND};
use super::Application;
use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

const APP: &str = "cut";

/// `cut -c LIST [FILE]...` or `cut -b LIST [FILE]...`
///
/// LIST is a comma-separated list of 1-based positions and ranges (`3`,
/// `2-5`, `-4`, `6-`). Selected positions are printed in ascending order
/// regardless of how LIST orders them.
pub struct Cut;

impl Application for Cut {
    fn run(
        &self,
        args: &[String],
        env: &Environment,
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError> {
        let parsed = parse_args(APP, args, "cb")?;
        let by_char = match (parsed.has('c'), parsed.has('b')) {
            (true, false) => true,
            (false, true) => false,
            (true, true) => {
                return Err(AppError::new(APP, "only one type of list may be specified"));
            }
            (false, false) => {
                return Err(AppError::new(APP, "you must specify a list of bytes or characters"));
            }
        };
        let Some((list, files)) = parsed.operands.split_first() else {
            return Err(AppError::new(APP, E_NO_ARGS));
        };
        let ranges = parse_list(list)?;

        let mut inputs: Vec<&str> = files.iter().map(String::as_str).collect();
        if inputs.is_empty() {
            inputs.push(STDIN_OPERAND);
        }

        let mut out = Vec::new();
        for name in inputs {
            for line in lines(&read_operand(APP, env, name, stdin)?) {
                out.push(if by_char {
                    select_chars(&line, &ranges)
                } else {
                    select_bytes(&line, &ranges)
                });
            }
        }
        write_lines(APP, stdout, &out)?;
        Ok(Outcome::Continue)
    }
}

/// Inclusive 1-based range; `None` as the end means "to end of line".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Range {
    start: usize,
    end: Option<usize>,
}

impl Range {
    fn contains(self, pos: usize) -> bool {
        pos >= self.start && self.end.is_none_or(|end| pos <= end)
    }
}

fn parse_list(list: &str) -> Result<Vec<Range>, AppError> {
    let invalid = || AppError::new(APP, format!("{list}: Invalid list"));
    let position = |s: &str| -> Result<usize, AppError> {
        match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(invalid()),
        }
    };

    let mut ranges = Vec::new();
    for item in list.split(',') {
        let range = match item.split_once('-') {
            None => {
                let n = position(item)?;
                Range { start: n, end: Some(n) }
            }
            Some(("", "")) => return Err(invalid()),
            Some(("", end)) => Range { start: 1, end: Some(position(end)?) },
            Some((start, "")) => Range { start: position(start)?, end: None },
            Some((start, end)) => {
                let (start, end) = (position(start)?, position(end)?);
                if end < start {
                    return Err(invalid());
                }
                Range { start, end: Some(end) }
            }
        };
        ranges.push(range);
    }
    Ok(ranges)
}

fn selected(len: usize, ranges: &[Range]) -> BTreeSet<usize> {
    (1..=len).filter(|&p| ranges.iter().any(|r| r.contains(p))).collect()
}

fn select_chars(line: &str, ranges: &[Range]) -> String {
    let chars: Vec<char> = line.chars().collect();
    selected(chars.len(), ranges).into_iter().map(|p| chars[p - 1]).collect()
}

fn select_bytes(line: &str, ranges: &[Range]) -> String {
    let bytes = line.as_bytes();
    let picked: Vec<u8> = selected(bytes.len(), ranges).into_iter().map(|p| bytes[p - 1]).collect();
    String::from_utf8_lossy(&picked).into_owned()
}
