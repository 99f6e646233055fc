/// How evaluation of a command ended when it did not fail.
///
/// `exit` is control flow, not an error: it is returned as `Exit` and every
/// level (call, pipe, sequence, REPL) hands it upward unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Exit(i32),
}
