use std::fs;
use std::io::{self, Read, Write};

use super::args::parse_args;
use super::util::{E_FILE_NOT_FOUND, E_IS_DIR, E_NO_ARGS, E_NO_PERM};
use super::Application;
use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

const APP: &str = "rm";

/// `rm [-rd] PATH...`
///
/// Plain files are always removed; `-d` also removes empty directories and
/// `-r` removes directories with their contents.
pub struct Rm;

impl Application for Rm {
    fn run(
        &self,
        args: &[String],
        env: &Environment,
        _stdin: &mut dyn Read,
        _stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError> {
        let parsed = parse_args(APP, args, "rd")?;
        if parsed.operands.is_empty() {
            return Err(AppError::new(APP, E_NO_ARGS));
        }

        let mut first_err = None;
        for name in &parsed.operands {
            if let Err(e) = remove(env, name, parsed.has('r'), parsed.has('d')) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(Outcome::Continue),
        }
    }
}

fn remove(env: &Environment, name: &str, recursive: bool, empty_dirs: bool) -> Result<(), AppError> {
    let path = env.resolve(name);
    let meta = match fs::symlink_metadata(&path) {
        Ok(meta) => meta,
        Err(_) => return Err(AppError::new(APP, format!("{name}: {E_FILE_NOT_FOUND}"))),
    };
    if meta.is_dir() && env.current_dir().starts_with(&path) {
        return Err(AppError::new(APP, format!("{name}: refusing to remove the current directory")));
    }

    let result = if !meta.is_dir() {
        fs::remove_file(&path)
    } else if recursive {
        fs::remove_dir_all(&path)
    } else if empty_dirs {
        fs::remove_dir(&path)
    } else {
        return Err(AppError::new(APP, format!("{name}: {E_IS_DIR}")));
    };

    result.map_err(|e| match e.kind() {
        io::ErrorKind::PermissionDenied => AppError::new(APP, format!("{name}: {E_NO_PERM}")),
        io::ErrorKind::DirectoryNotEmpty => AppError::new(APP, format!("{name}: Directory not empty")),
        _ => AppError::io(APP, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rm(env: &Environment, args: &[&str]) -> Result<(), String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        Rm.run(&args, env, &mut io::empty(), &mut io::sink())
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    #[test]
    fn removes_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a"), "").unwrap();
        fs::write(dir.path().join("b"), "").unwrap();
        let env = Environment::new(dir.path());

        rm(&env, &["a", "b"]).unwrap();
        assert!(!dir.path().join("a").exists());
        assert!(!dir.path().join("b").exists());
    }

    #[test]
    fn directories_need_flags() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("empty")).unwrap();
        fs::create_dir(dir.path().join("full")).unwrap();
        fs::write(dir.path().join("full/f"), "").unwrap();
        let env = Environment::new(dir.path());

        assert_eq!(rm(&env, &["empty"]).unwrap_err(), "rm: empty: This is a directory");
        rm(&env, &["-d", "empty"]).unwrap();
        assert!(!dir.path().join("empty").exists());

        assert!(rm(&env, &["-d", "full"]).is_err());
        rm(&env, &["-r", "full"]).unwrap();
        assert!(!dir.path().join("full").exists());
    }

    #[test]
    fn continues_past_missing_operand() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("real"), "").unwrap();
        let env = Environment::new(dir.path());

        assert_eq!(
            rm(&env, &["ghost", "real"]).unwrap_err(),
            "rm: ghost: No such file or directory"
        );
        assert!(!dir.path().join("real").exists());
    }

    #[test]
    fn no_operands() {
        let env = Environment::new("/");
        assert_eq!(rm(&env, &[]).unwrap_err(), "rm: Insufficient arguments");
    }
}
