use super::scan::Quote;
use super::tokenize::tokenize;
use super::types::{Call, Command, Operator, Pipe, Sequence};
use crate::error::ShellError;

/// Split `text` at every `op` that sits outside quotes and backticks.
///
/// Pieces are returned untrimmed. An unterminated quote or backtick at the
/// end of `text` is a syntax error.
fn split_unquoted(text: &str, op: Operator) -> Result<Vec<&str>, ShellError> {
    let sep = op.as_char();
    let mut parts = Vec::new();
    let mut state = Quote::None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        if state.is_plain() && c == sep {
            parts.push(&text[start..i]);
            start = i + c.len_utf8();
            continue;
        }
        state = state.step(c);
    }

    if !state.is_plain() {
        return Err(ShellError::syntax(format!("unterminated {}", state.describe())));
    }
    parts.push(&text[start..]);
    Ok(parts)
}

/// Parse one command line into a `Sequence` of `Pipe`s of `Call`s.
///
/// A blank line yields an empty sequence. Empty segments (`a;;b`, `;a`, `a;`)
/// and empty stages (`a||b`, `|a`, `a|`) are syntax errors.
pub fn parse(line: &str) -> Result<Command, ShellError> {
    if line.trim().is_empty() {
        return Ok(Command::Sequence(Sequence::default()));
    }
    if line.contains(['\n', '\r']) {
        return Err(ShellError::syntax("unexpected newline"));
    }

    let mut commands = Vec::new();
    for segment in split_unquoted(line, Operator::Semi)? {
        if segment.trim().is_empty() {
            return Err(ShellError::syntax("unexpected ';'"));
        }

        let mut calls = Vec::new();
        for stage in split_unquoted(segment, Operator::Pipe)? {
            if stage.trim().is_empty() {
                return Err(ShellError::syntax("unexpected '|'"));
            }
            calls.push(Call::new(tokenize(stage)?));
        }
        commands.push(Command::Pipe(Pipe::new(calls)));
    }

    let sequence = Sequence::new(commands);
    log::debug!("parsed: {sequence}");
    Ok(Command::Sequence(sequence))
}
