//! `*` expansion against the session directory.

use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::environment::Environment;

/// One piece of an unquoted word: literal text or a bare `*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Piece {
    Literal(String),
    Star,
}

/// Whether `pieces` contain a wildcard and so need expansion.
pub fn has_star(pieces: &[Piece]) -> bool {
    pieces.iter().any(|p| *p == Piece::Star)
}

/// The word with every `*` written back literally.
pub fn literal(pieces: &[Piece]) -> String {
    pieces
        .iter()
        .map(|p| match p {
            Piece::Literal(s) => s.as_str(),
            Piece::Star => "*",
        })
        .collect()
}

/// Expand a word against the filesystem.
///
/// Only `*` is a wildcard; `?`, `[` and `]` in literal pieces match
/// themselves. `*` never crosses a `/`. Matches are returned sorted, relative
/// when the word was relative. With no match the word itself comes back
/// unchanged.
pub fn expand(env: &Environment, pieces: &[Piece]) -> Vec<String> {
    let word = literal(pieces);
    let relative = !Path::new(&word).is_absolute();

    let mut pattern = String::new();
    let base = env.current_dir();
    if relative {
        pattern.push_str(&Pattern::escape(&base.to_string_lossy()));
        if !pattern.ends_with('/') {
            pattern.push('/');
        }
    }
    for piece in pieces {
        match piece {
            Piece::Literal(s) => pattern.push_str(&Pattern::escape(s)),
            Piece::Star => pattern.push('*'),
        }
    }

    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    let paths = match glob::glob_with(&pattern, options) {
        Ok(paths) => paths,
        Err(e) => {
            log::debug!("glob pattern {pattern:?} rejected: {e}");
            return vec![word];
        }
    };

    let mut matches: Vec<String> = paths
        .filter_map(Result::ok)
        .map(|path| {
            let shown = if relative {
                path.strip_prefix(&base).map(Path::to_path_buf).unwrap_or(path)
            } else {
                path
            };
            shown.to_string_lossy().into_owned()
        })
        .collect();

    if matches.is_empty() {
        return vec![word];
    }
    matches.sort();
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces(word: &str) -> Vec<Piece> {
        let mut out = Vec::new();
        for (i, part) in word.split('*').enumerate() {
            if i > 0 {
                out.push(Piece::Star);
            }
            if !part.is_empty() {
                out.push(Piece::Literal(part.to_string()));
            }
        }
        out
    }

    fn fixture() -> (tempfile::TempDir, Environment) {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.txt", "a.txt", "c.md", "[x].txt"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("d.txt"), "").unwrap();
        let env = Environment::new(dir.path());
        (dir, env)
    }

    #[test]
    fn expands_sorted_relative_names() {
        let (_dir, env) = fixture();
        assert_eq!(expand(&env, &pieces("*.txt")), vec!["[x].txt", "a.txt", "b.txt"]);
    }

    #[test]
    fn keeps_literal_when_nothing_matches() {
        let (_dir, env) = fixture();
        assert_eq!(expand(&env, &pieces("*.zzz")), vec!["*.zzz"]);
    }

    #[test]
    fn brackets_are_literal() {
        let (_dir, env) = fixture();
        assert_eq!(expand(&env, &pieces("[x]*")), vec!["[x].txt"]);
    }

    #[test]
    fn star_stays_within_one_directory() {
        let (_dir, env) = fixture();
        assert_eq!(expand(&env, &pieces("sub/*")), vec!["sub/d.txt"]);
        assert!(!expand(&env, &pieces("*d.txt")).contains(&"sub/d.txt".to_string()));
    }

    #[test]
    fn absolute_patterns_stay_absolute() {
        let (dir, env) = fixture();
        let abs = format!("{}/*.md", dir.path().display());
        let expected = dir.path().join("c.md").to_string_lossy().into_owned();
        assert_eq!(expand(&env, &pieces(&abs)), vec![expected]);
    }

    #[test]
    fn literal_round_trips_star() {
        assert_eq!(literal(&pieces("a*b*")), "a*b*");
        assert!(has_star(&pieces("x*")));
        assert!(!has_star(&pieces("plain")));
    }
}
