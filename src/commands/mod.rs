//! Builtin applications and the contract they implement.
//!
//! The evaluator only ever talks to [`Application`]; it never looks inside a
//! particular utility. [`builtin`] maps a configured name to its
//! implementation so the [`Registry`](crate::eval::Registry) can be built from
//! configuration.

/// Flag/operand splitting shared by every builtin.
pub mod args;
/// File opening, line reading and output helpers.
pub mod util;

pub mod cat;
pub mod cd;
pub mod cp;
pub mod cut;
pub mod echo;
pub mod exit;
pub mod grep;
pub mod ls;
pub mod mv;
pub mod paste;
pub mod rm;
pub mod sort;
pub mod tee;
pub mod uniq;
pub mod wc;

use std::io::{Read, Write};

use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

/// Uniform contract for a builtin utility.
///
/// Implementations read from `stdin`, write to `stdout`, and must not close
/// either: the caller owns them. Paths are resolved through `env`.
pub trait Application: Send + Sync {
    fn run(
        &self,
        args: &[String],
        env: &Environment,
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError>;
}

/// Every builtin name this crate implements.
pub const BUILTIN_NAMES: &[&str] = &[
    "cat", "cd", "cp", "cut", "echo", "exit", "grep", "ls", "mv", "paste", "rm", "sort", "tee",
    "uniq", "wc",
];

/// Construct the builtin registered under `name`.
pub fn builtin(name: &str) -> Option<Box<dyn Application>> {
    let app: Box<dyn Application> = match name {
        "cat" => Box::new(cat::Cat),
        "cd" => Box::new(cd::Cd),
        "cp" => Box::new(cp::Cp),
        "cut" => Box::new(cut::Cut),
        "echo" => Box::new(echo::Echo),
        "exit" => Box::new(exit::Exit),
        "grep" => Box::new(grep::Grep),
        "ls" => Box::new(ls::Ls),
        "mv" => Box::new(mv::Mv),
        "paste" => Box::new(paste::Paste),
        "rm" => Box::new(rm::Rm),
        "sort" => Box::new(sort::Sort),
        "tee" => Box::new(tee::Tee),
        "uniq" => Box::new(uniq::Uniq),
        "wc" => Box::new(wc::Wc),
        _ => return None,
    };
    Some(app)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_has_a_builtin() {
        for name in BUILTIN_NAMES {
            assert!(builtin(name).is_some(), "missing builtin {name}");
        }
    }

    #[test]
    fn unknown_name_has_no_builtin() {
        assert!(builtin("frobnicate").is_none());
    }
}
