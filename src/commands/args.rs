use crate::error::AppError;

/// Arguments split into single-letter flags and operands.
#[derive(Debug, Default)]
pub struct ParsedArgs {
    flags: Vec<char>,
    pub operands: Vec<String>,
}

impl ParsedArgs {
    pub fn has(&self, flag: char) -> bool {
        self.flags.contains(&flag)
    }
}

/// Split `args` into flags and operands.
///
/// Flags may be grouped (`-nr`) and appear anywhere. A lone `-` is an
/// operand (stdin) and `--` ends flag parsing. Any letter outside `legal`
/// fails with `illegal option -- <c>`.
pub fn parse_args(app: &'static str, args: &[String], legal: &str) -> Result<ParsedArgs, AppError> {
    let mut parsed = ParsedArgs::default();
    let mut only_operands = false;

    for arg in args {
        if only_operands || arg == "-" || !arg.starts_with('-') {
            parsed.operands.push(arg.clone());
            continue;
        }
        if arg == "--" {
            only_operands = true;
            continue;
        }
        for flag in arg.chars().skip(1) {
            if !legal.contains(flag) {
                return Err(AppError::new(app, format!("illegal option -- {flag}")));
            }
            if !parsed.flags.contains(&flag) {
                parsed.flags.push(flag);
            }
        }
    }
    Ok(parsed)
}
