use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use super::args::parse_args;
use super::util::{E_FILE_NOT_FOUND, E_NO_ARGS};
use super::Application;
use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

const APP: &str = "mv";

/// `mv [-n] SOURCE... DEST`; `-n` leaves existing targets untouched.
pub struct Mv;

impl Application for Mv {
    fn run(
        &self,
        args: &[String],
        env: &Environment,
        _stdin: &mut dyn Read,
        _stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError> {
        let parsed = parse_args(APP, args, "n")?;
        let no_clobber = parsed.has('n');
        let Some((dest, sources)) = parsed.operands.split_last() else {
            return Err(AppError::new(APP, E_NO_ARGS));
        };
        if sources.is_empty() {
            return Err(AppError::new(APP, E_NO_ARGS));
        }

        let dest_path = env.resolve(dest);
        let into_dir = dest_path.is_dir();
        if sources.len() > 1 && !into_dir {
            return Err(AppError::new(APP, format!("{dest}: Not a directory")));
        }

        let mut first_err = None;
        for src in sources {
            if let Err(e) = move_one(env, src, &dest_path, into_dir, no_clobber) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(Outcome::Continue),
        }
    }
}

fn move_one(
    env: &Environment,
    src: &str,
    dest: &Path,
    into_dir: bool,
    no_clobber: bool,
) -> Result<(), AppError> {
    let src_path = env.resolve(src);
    if !src_path.exists() {
        return Err(AppError::new(APP, format!("{src}: {E_FILE_NOT_FOUND}")));
    }
    let target = match (into_dir, src_path.file_name()) {
        (true, Some(name)) => dest.join(name),
        (true, None) => return Err(AppError::new(APP, format!("{src}: cannot move"))),
        (false, _) => dest.to_path_buf(),
    };
    if target == src_path {
        return Ok(());
    }
    if src_path.is_dir() && target.starts_with(&src_path) {
        return Err(AppError::new(APP, format!("{src}: cannot move a directory into itself")));
    }
    if no_clobber && target.exists() {
        return Ok(());
    }

    match fs::rename(&src_path, &target) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            copy_then_remove(&src_path, &target).map_err(|e| AppError::io(APP, e))
        }
        Err(e) => Err(AppError::io(APP, e)),
    }
}

fn copy_then_remove(src: &Path, target: &Path) -> io::Result<()> {
    if src.is_dir() {
        super::cp::copy_tree(src, target)?;
        fs::remove_dir_all(src)
    } else {
        fs::copy(src, target)?;
        fs::remove_file(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(env: &Environment, args: &[&str]) -> Result<(), String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        Mv.run(&args, env, &mut io::empty(), &mut io::sink())
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    #[test]
    fn renames_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "A").unwrap();
        let env = Environment::new(dir.path());

        mv(&env, &["a.txt", "b.txt"]).unwrap();
        assert!(!dir.path().join("a.txt").exists());
        assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "A");
    }

    #[test]
    fn moves_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "A").unwrap();
        fs::write(dir.path().join("b.txt"), "B").unwrap();
        fs::create_dir(dir.path().join("d")).unwrap();
        let env = Environment::new(dir.path());

        mv(&env, &["a.txt", "b.txt", "d"]).unwrap();
        assert!(dir.path().join("d/a.txt").exists());
        assert!(dir.path().join("d/b.txt").exists());
    }

    #[test]
    fn no_clobber_keeps_target() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "new").unwrap();
        fs::write(dir.path().join("b.txt"), "old").unwrap();
        let env = Environment::new(dir.path());

        mv(&env, &["-n", "a.txt", "b.txt"]).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "old");
        assert!(dir.path().join("a.txt").exists());

        mv(&env, &["a.txt", "b.txt"]).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "new");
    }

    #[test]
    fn missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let env = Environment::new(dir.path());
        assert_eq!(
            mv(&env, &["ghost", "x"]).unwrap_err(),
            "mv: ghost: No such file or directory"
        );
        assert_eq!(mv(&env, &["x"]).unwrap_err(), "mv: Insufficient arguments");
    }
}
