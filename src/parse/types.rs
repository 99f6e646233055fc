//! Types produced by the parser and consumed by the eval layer.

use std::fmt;

/// Shell operator separating consecutive parts of a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// `;`: run the next command unconditionally
    Semi,
    /// `|`: pipe stdout into the next stage
    Pipe,
}

impl Operator {
    /// The operator's shell syntax.
    pub fn as_char(self) -> char {
        match self {
            Operator::Semi => ';',
            Operator::Pipe => '|',
        }
    }
}

/// A parsed command line. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Call(Call),
    Pipe(Pipe),
    Sequence(Sequence),
}

impl Command {
    /// Evaluation has no cancellation points, so there is nothing to stop.
    pub fn terminate(&self) {}
}

/// A single application invocation, still in raw (unresolved) token form.
///
/// Raw tokens keep their quotes and backticks; redirection operators are
/// standalone `<`, `>` or `>>` tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub tokens: Vec<String>,
}

impl Call {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }
}

/// One or more calls whose stdout/stdin are chained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipe {
    pub calls: Vec<Call>,
}

impl Pipe {
    pub fn new(calls: Vec<Call>) -> Self {
        Self { calls }
    }
}

/// `;`-separated commands, each evaluated even if an earlier one failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    pub commands: Vec<Command>,
}

impl Sequence {
    pub fn new(commands: Vec<Command>) -> Self {
        Self { commands }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Call(call) => write!(f, "{call}"),
            Command::Pipe(pipe) => write!(f, "{pipe}"),
            Command::Sequence(seq) => write!(f, "{seq}"),
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens.join(" "))
    }
}

impl fmt::Display for Pipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, call) in self.calls.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", Operator::Pipe.as_char())?;
            }
            write!(f, "{call}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, command) in self.commands.iter().enumerate() {
            if i > 0 {
                write!(f, "{} ", Operator::Semi.as_char())?;
            }
            write!(f, "{command}")?;
        }
        Ok(())
    }
}
