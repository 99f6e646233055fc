//! Quote removal, backtick substitution and globbing of raw tokens.

use super::glob::{self, Piece};
use crate::environment::Environment;
use crate::error::ShellError;
use crate::parse::Quote;

/// Runs the text of a backtick region and returns what it printed.
pub type Substitute<'a> = dyn Fn(&str) -> Result<String, ShellError> + 'a;

/// Turns raw tokens into final argument words.
pub struct Resolver<'a> {
    env: &'a Environment,
    substitute: &'a Substitute<'a>,
}

/// A word under construction.
#[derive(Default)]
struct Word {
    pieces: Vec<Piece>,
    /// Set once a quote opened, so `''` still yields an (empty) word.
    started: bool,
}

impl Word {
    fn push_str(&mut self, s: &str) {
        self.started = true;
        match self.pieces.last_mut() {
            Some(Piece::Literal(text)) => text.push_str(s),
            _ => self.pieces.push(Piece::Literal(s.to_string())),
        }
    }

    fn push_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.push_str(c.encode_utf8(&mut buf));
    }

    fn push_star(&mut self) {
        self.started = true;
        self.pieces.push(Piece::Star);
    }
}

impl<'a> Resolver<'a> {
    pub fn new(env: &'a Environment, substitute: &'a Substitute<'a>) -> Self {
        Self { env, substitute }
    }

    /// Resolve every token, concatenating the results in order.
    pub fn resolve_all(&self, tokens: &[String]) -> Result<Vec<String>, ShellError> {
        let mut out = Vec::new();
        for token in tokens {
            out.extend(self.resolve(token)?);
        }
        Ok(out)
    }

    /// Resolve one raw token into zero or more words.
    ///
    /// Single quotes keep their text verbatim. Double quotes keep text but
    /// still run backtick substitution, whose output then stays inside the
    /// word. An unquoted substitution is split on whitespace: its first word
    /// joins the text before it and its last word joins the text after it.
    /// Only `*` written outside quotes globs; substituted text never does.
    pub fn resolve(&self, token: &str) -> Result<Vec<String>, ShellError> {
        let mut words: Vec<Word> = Vec::new();
        let mut current = Word::default();
        let mut state = Quote::None;
        let mut command = String::new();

        for c in token.chars() {
            let next = state.step(c);
            match (state, next) {
                // closing backtick
                (Quote::Backtick, Quote::None) => {
                    let output = self.run(&command)?;
                    command.clear();
                    let mut split = output.split_whitespace();
                    if let Some(first) = split.next() {
                        current.push_str(first);
                    }
                    for word in split {
                        words.push(std::mem::take(&mut current));
                        current.push_str(word);
                    }
                }
                (Quote::BacktickInDouble, Quote::Double) => {
                    let output = self.run(&command)?;
                    command.clear();
                    current.push_str(&output);
                }
                (Quote::Backtick | Quote::BacktickInDouble, _) => command.push(c),
                // opening or closing a quote
                (_, _) if next != state => {
                    if next != Quote::Backtick && next != Quote::BacktickInDouble {
                        current.started = true;
                    }
                }
                (Quote::None, _) if c == '*' => current.push_star(),
                _ => current.push_char(c),
            }
            state = next;
        }

        if !state.is_plain() {
            return Err(ShellError::syntax(format!("unterminated {}", state.describe())));
        }
        if current.started {
            words.push(current);
        }

        let mut out = Vec::new();
        for word in words {
            if glob::has_star(&word.pieces) {
                out.extend(glob::expand(self.env, &word.pieces));
            } else {
                out.push(glob::literal(&word.pieces));
            }
        }
        Ok(out)
    }

    /// Run a substitution and normalise its output: one trailing newline
    /// dropped, remaining newlines turned into spaces.
    fn run(&self, command: &str) -> Result<String, ShellError> {
        let output = (self.substitute)(command)?;
        let trimmed = output
            .strip_suffix('\n')
            .map(|s| s.strip_suffix('\r').unwrap_or(s))
            .unwrap_or(&output);
        Ok(trimmed.replace("\r\n", " ").replace('\n', " "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pretend `echo` is the only command: print its arguments.
    fn fake_echo(command: &str) -> Result<String, ShellError> {
        let rest = command.trim().strip_prefix("echo").ok_or_else(|| {
            ShellError::CommandNotFound(command.trim().to_string())
        })?;
        Ok(format!("{}\n", rest.trim()))
    }

    fn resolve(env: &Environment, token: &str) -> Result<Vec<String>, ShellError> {
        let substitute: &Substitute = &fake_echo;
        Resolver::new(env, substitute).resolve(token)
    }

    fn words(token: &str) -> Vec<String> {
        resolve(&Environment::new("/nonexistent-dir-for-tests"), token).unwrap()
    }

    #[test]
    fn plain_word() {
        assert_eq!(words("hello"), vec!["hello"]);
    }

    #[test]
    fn quotes_are_removed() {
        assert_eq!(words("'a b'"), vec!["a b"]);
        assert_eq!(words("\"a b\""), vec!["a b"]);
        assert_eq!(words("x'y'\"z\""), vec!["xyz"]);
    }

    #[test]
    fn empty_quotes_make_an_empty_word() {
        assert_eq!(words("''"), vec![""]);
        assert_eq!(words("\"\""), vec![""]);
    }

    #[test]
    fn single_quotes_block_substitution() {
        assert_eq!(words("'`echo hi`'"), vec!["`echo hi`"]);
    }

    #[test]
    fn double_quotes_keep_substitution_whole() {
        assert_eq!(words("\"<`echo a b`>\""), vec!["<a b>"]);
        assert_eq!(words("\"*`echo x y`\""), vec!["*x y"]);
    }

    #[test]
    fn unquoted_substitution_splits_and_merges() {
        assert_eq!(words("x`echo a b c`y"), vec!["xa", "b", "cy"]);
        assert_eq!(words("`echo one`"), vec!["one"]);
    }

    #[test]
    fn empty_substitution_vanishes() {
        assert!(words("`echo`").is_empty());
        assert_eq!(words("a`echo`"), vec!["a"]);
    }

    #[test]
    fn quoted_star_is_literal() {
        assert_eq!(words("'*.txt'"), vec!["*.txt"]);
        assert_eq!(words("\"*\""), vec!["*"]);
    }

    #[test]
    fn unquoted_star_without_match_is_kept() {
        assert_eq!(words("*.zzz"), vec!["*.zzz"]);
    }

    #[test]
    fn unquoted_star_globs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        let env = Environment::new(dir.path());
        assert_eq!(resolve(&env, "*.txt").unwrap(), vec!["a.txt", "b.txt"]);
        assert_eq!(resolve(&env, "'*'.txt").unwrap(), vec!["*.txt"]);
    }

    #[test]
    fn substituted_star_is_not_globbed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();
        let env = Environment::new(dir.path());
        assert_eq!(resolve(&env, "`echo *.txt`").unwrap(), vec!["*.txt"]);
    }

    #[test]
    fn substitution_errors_propagate() {
        let err = resolve(&Environment::new("/"), "`nope`").unwrap_err();
        assert!(matches!(err, ShellError::CommandNotFound(_)));
    }

    #[test]
    fn trailing_newline_only_stripped_once() {
        let env = Environment::new("/");
        let substitute: &Substitute = &|_: &str| -> Result<String, ShellError> {
            Ok("a\nb\n\n".to_string())
        };
        let resolver = Resolver::new(&env, substitute);
        assert_eq!(resolver.resolve("\"`x`\"").unwrap(), vec!["a b "]);
    }

    #[test]
    fn resolve_all_keeps_order() {
        let env = Environment::new("/");
        let substitute: &Substitute = &fake_echo;
        let resolver = Resolver::new(&env, substitute);
        let tokens: Vec<String> = ["a", "`echo b c`", "'d'"].iter().map(|s| s.to_string()).collect();
        assert_eq!(resolver.resolve_all(&tokens).unwrap(), vec!["a", "b", "c", "d"]);
    }
}
