use super::scan::Quote;
use crate::error::ShellError;

/// Redirection operators recognised outside quotes.
pub const REDIRECT_IN: &str = "<";
pub const REDIRECT_OUT: &str = ">";
pub const REDIRECT_APPEND: &str = ">>";

/// Split one pipeline stage into raw tokens.
///
/// Whitespace outside quotes and backticks separates tokens; quote characters
/// are kept so the resolver can tell quoted text apart. `<`, `>` and `>>`
/// become tokens of their own even when glued to a word: `cat<a>b` gives
/// `cat`, `<`, `a`, `>`, `b`.
pub fn tokenize(stage: &str) -> Result<Vec<String>, ShellError> {
    let mut tokens = Vec::new();
    let mut buf = String::new();
    let mut state = Quote::None;
    let mut chars = stage.chars().peekable();

    while let Some(c) = chars.next() {
        if state.is_plain() {
            if c.is_whitespace() {
                flush(&mut buf, &mut tokens);
                continue;
            }
            if c == '<' {
                flush(&mut buf, &mut tokens);
                tokens.push(REDIRECT_IN.to_string());
                continue;
            }
            if c == '>' {
                flush(&mut buf, &mut tokens);
                if chars.next_if_eq(&'>').is_some() {
                    tokens.push(REDIRECT_APPEND.to_string());
                } else {
                    tokens.push(REDIRECT_OUT.to_string());
                }
                continue;
            }
        }
        state = state.step(c);
        buf.push(c);
    }

    if !state.is_plain() {
        return Err(ShellError::syntax(format!("unterminated {}", state.describe())));
    }
    flush(&mut buf, &mut tokens);
    Ok(tokens)
}

fn flush(buf: &mut String, tokens: &mut Vec<String>) {
    if !buf.is_empty() {
        tokens.push(std::mem::take(buf));
    }
}

/// Whether a raw token is one of the redirection operators.
pub fn is_redirect(token: &str) -> bool {
    matches!(token, REDIRECT_IN | REDIRECT_OUT | REDIRECT_APPEND)
}
