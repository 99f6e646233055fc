//! Concurrent execution of `|`-connected stages.

use std::io::{self, Read, Write};
use std::thread;

use os_pipe::{PipeReader, PipeWriter};

use super::{Evaluator, Outcome};
use crate::error::ShellError;
use crate::parse::Call;

/// Run `calls` as one pipeline.
///
/// A single stage runs on the caller's thread. Otherwise every stage gets a
/// scoped thread and adjacent stages share an OS pipe, so a full pipe blocks
/// the writer and an empty one blocks the reader. A stage drops its pipe ends
/// when it finishes: readers downstream see EOF and writers upstream get a
/// broken pipe, which unblocks them.
///
/// All stages are joined before returning. A broken pipe in any stage but
/// the last only means its reader finished early and is dropped. An `exit`
/// in any stage wins; otherwise the first remaining error in stage order is
/// returned.
pub(super) fn run<'a>(
    eval: Evaluator<'_>,
    calls: &[Call],
    stdin: &'a mut (dyn Read + Send),
    stdout: &'a mut (dyn Write + Send),
) -> Result<Outcome, ShellError> {
    let [first, rest @ ..] = calls else {
        return Ok(Outcome::Continue);
    };
    if rest.is_empty() {
        return eval.call(first, stdin, stdout);
    }

    let mut pipes = Vec::with_capacity(calls.len() - 1);
    for _ in 1..calls.len() {
        pipes.push(os_pipe::pipe()?);
    }

    let results: Vec<Result<Outcome, ShellError>> = thread::scope(|scope| {
        let last = calls.len() - 1;
        let mut ambient_in = Some(stdin);
        let mut ambient_out = Some(stdout);
        let mut upstream: Option<PipeReader> = None;
        let mut pipes = pipes.into_iter();
        let mut handles = Vec::with_capacity(calls.len());

        for (i, call) in calls.iter().enumerate() {
            let (next_reader, writer): (Option<PipeReader>, Option<PipeWriter>) = if i < last {
                match pipes.next() {
                    Some((r, w)) => (Some(r), Some(w)),
                    None => (None, None),
                }
            } else {
                (None, None)
            };
            let stage = Stage {
                pipe_in: upstream.take(),
                ambient_in: if i == 0 { ambient_in.take() } else { None },
                pipe_out: writer,
                ambient_out: if i == last { ambient_out.take() } else { None },
            };
            upstream = next_reader;
            handles.push(scope.spawn(move || stage.run(eval, call)));
        }

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("pipeline stage panicked").into()))
            })
            .collect()
    });

    settle(eval, results)
}

/// The streams one stage reads and writes.
struct Stage<'s> {
    pipe_in: Option<PipeReader>,
    ambient_in: Option<&'s mut (dyn Read + Send)>,
    pipe_out: Option<PipeWriter>,
    ambient_out: Option<&'s mut (dyn Write + Send)>,
}

impl Stage<'_> {
    fn run(mut self, eval: Evaluator<'_>, call: &Call) -> Result<Outcome, ShellError> {
        let mut empty = io::empty();
        let mut sink = io::sink();

        let stdin: &mut (dyn Read + Send) = match (&mut self.pipe_in, self.ambient_in) {
            (Some(pipe), _) => pipe,
            (None, Some(ambient)) => ambient,
            (None, None) => &mut empty,
        };
        let stdout: &mut (dyn Write + Send) = match (&mut self.pipe_out, self.ambient_out) {
            (Some(pipe), _) => pipe,
            (None, Some(ambient)) => ambient,
            (None, None) => &mut sink,
        };

        let result = eval.call(call, stdin, stdout);
        if let Err(e) = stdout.flush() {
            if result.is_ok() && e.kind() != io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }
        result
    }
}

fn settle(eval: Evaluator<'_>, results: Vec<Result<Outcome, ShellError>>) -> Result<Outcome, ShellError> {
    let last = results.len().saturating_sub(1);
    let mut exit = None;
    let mut errors = Vec::new();
    for (i, result) in results.into_iter().enumerate() {
        match result {
            Ok(Outcome::Exit(code)) => {
                exit.get_or_insert(code);
            }
            Ok(Outcome::Continue) => {}
            Err(e) if i < last && e.is_broken_pipe() => {
                log::debug!("stage {i} stopped early: {e}");
            }
            Err(e) => errors.push(e),
        }
    }

    if let Some(code) = exit {
        for err in &errors {
            eval.ctx.errors.report(err);
        }
        return Ok(Outcome::Exit(code));
    }
    match errors.into_iter().next() {
        Some(e) => Err(e),
        None => Ok(Outcome::Continue),
    }
}
