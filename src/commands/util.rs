use std::fs::File;
use std::io::{self, Read, Write};

use crate::environment::Environment;
use crate::error::AppError;

pub const E_FILE_NOT_FOUND: &str = "No such file or directory";
pub const E_IS_DIR: &str = "This is a directory";
pub const E_NO_PERM: &str = "Permission denied";
pub const E_NO_ARGS: &str = "Insufficient arguments";
pub const E_TOO_MANY_ARGS: &str = "Too many arguments";

/// Operand that stands for stdin.
pub const STDIN_OPERAND: &str = "-";

/// Open `name` (relative to the session directory) for reading.
pub fn open_file(app: &'static str, env: &Environment, name: &str) -> Result<File, AppError> {
    let path = env.resolve(name);
    if !path.exists() {
        return Err(AppError::new(app, format!("{name}: {E_FILE_NOT_FOUND}")));
    }
    if path.is_dir() {
        return Err(AppError::new(app, format!("{name}: {E_IS_DIR}")));
    }
    File::open(&path).map_err(|e| match e.kind() {
        io::ErrorKind::PermissionDenied => AppError::new(app, format!("{name}: {E_NO_PERM}")),
        _ => AppError::io(app, e),
    })
}

pub fn read_all(app: &'static str, reader: &mut dyn Read) -> Result<Vec<u8>, AppError> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).map_err(|e| AppError::io(app, e))?;
    Ok(buf)
}

/// Contents of a file operand, or of stdin for `-`.
pub fn read_operand(
    app: &'static str,
    env: &Environment,
    name: &str,
    stdin: &mut dyn Read,
) -> Result<Vec<u8>, AppError> {
    if name == STDIN_OPERAND {
        return read_all(app, stdin);
    }
    let mut file = open_file(app, env, name)?;
    read_all(app, &mut file)
}

/// Split text into lines; a final newline does not produce an empty line.
pub fn lines(bytes: &[u8]) -> Vec<String> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.strip_suffix('\n').unwrap_or(&text);
    if text.is_empty() && bytes.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(|l| l.strip_suffix('\r').unwrap_or(l).to_string()).collect()
}

pub fn write_all(app: &'static str, stdout: &mut dyn Write, bytes: &[u8]) -> Result<(), AppError> {
    stdout.write_all(bytes).map_err(|e| AppError::io(app, e))
}

/// Write each line followed by a newline, then flush.
pub fn write_lines<S: AsRef<str>>(
    app: &'static str,
    stdout: &mut dyn Write,
    lines: &[S],
) -> Result<(), AppError> {
    for line in lines {
        write_all(app, stdout, line.as_ref().as_bytes())?;
        write_all(app, stdout, b"\n")?;
    }
    stdout.flush().map_err(|e| AppError::io(app, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_drop_final_newline() {
        assert_eq!(lines(b"a\nb\n"), vec!["a", "b"]);
        assert_eq!(lines(b"a\nb"), vec!["a", "b"]);
        assert!(lines(b"").is_empty());
        assert_eq!(lines(b"\n"), vec![""]);
    }

    #[test]
    fn open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let env = Environment::new(dir.path());
        let err = open_file("cat", &env, "nope.txt").unwrap_err();
        assert_eq!(err.to_string(), "cat: nope.txt: No such file or directory");
    }

    #[test]
    fn open_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("d")).unwrap();
        let env = Environment::new(dir.path());
        let err = open_file("cat", &env, "d").unwrap_err();
        assert_eq!(err.to_string(), "cat: d: This is a directory");
    }

    #[test]
    fn dash_reads_stdin() {
        let env = Environment::new("/");
        let mut stdin: &[u8] = b"from stdin";
        assert_eq!(read_operand("cat", &env, "-", &mut stdin).unwrap(), b"from stdin");
    }
}
