use std::fs::{File, OpenOptions};
use std::io::{Read, Write};

use super::args::parse_args;
use super::util::{write_all, E_IS_DIR, E_NO_PERM};
use super::Application;
use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

const APP: &str = "tee";

/// `tee [-a] [FILE]...`: copy stdin to stdout and to every FILE.
pub struct Tee;

impl Application for Tee {
    fn run(
        &self,
        args: &[String],
        env: &Environment,
        stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError> {
        let parsed = parse_args(APP, args, "a")?;
        let append = parsed.has('a');

        let mut first_err = None;
        let mut files: Vec<File> = Vec::new();
        for name in &parsed.operands {
            match open(env, name, append) {
                Ok(file) => files.push(file),
                Err(e) => {
                    first_err.get_or_insert(e);
                }
            }
        }

        let mut buf = [0u8; 8192];
        loop {
            let n = match stdin.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(AppError::io(APP, e)),
            };
            write_all(APP, stdout, &buf[..n])?;
            for file in &mut files {
                write_all(APP, file, &buf[..n])?;
            }
        }
        stdout.flush().map_err(|e| AppError::io(APP, e))?;

        match first_err {
            Some(e) => Err(e),
            None => Ok(Outcome::Continue),
        }
    }
}

fn open(env: &Environment, name: &str, append: bool) -> Result<File, AppError> {
    let path = env.resolve(name);
    if path.is_dir() {
        return Err(AppError::new(APP, format!("{name}: {E_IS_DIR}")));
    }
    OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(&path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => {
                AppError::new(APP, format!("{name}: {E_NO_PERM}"))
            }
            _ => AppError::io(APP, e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tee(env: &Environment, args: &[&str], input: &str) -> Result<String, String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut stdin = input.as_bytes();
        let mut out: Vec<u8> = Vec::new();
        Tee.run(&args, env, &mut stdin, &mut out)
            .map(|_| String::from_utf8(out).unwrap())
            .map_err(|e| e.to_string())
    }

    #[test]
    fn copies_to_stdout_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let env = Environment::new(dir.path());

        assert_eq!(tee(&env, &["a.txt", "b.txt"], "hi\n").unwrap(), "hi\n");
        for name in ["a.txt", "b.txt"] {
            assert_eq!(std::fs::read_to_string(dir.path().join(name)).unwrap(), "hi\n");
        }
    }

    #[test]
    fn append_mode() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("log.txt"), "old\n").unwrap();
        let env = Environment::new(dir.path());

        tee(&env, &["-a", "log.txt"], "new\n").unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.path().join("log.txt")).unwrap(),
            "old\nnew\n"
        );
    }

    #[test]
    fn directory_target_still_copies_to_stdout() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("d")).unwrap();
        let env = Environment::new(dir.path());

        let args = vec!["d".to_string()];
        let mut stdin: &[u8] = b"x\n";
        let mut out: Vec<u8> = Vec::new();
        let err = Tee.run(&args, &env, &mut stdin, &mut out).unwrap_err();
        assert_eq!(err.to_string(), "tee: d: This is a directory");
        assert_eq!(out, b"x\n");
    }
}
