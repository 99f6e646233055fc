use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use super::args::parse_args;
use super::util::{E_FILE_NOT_FOUND, E_IS_DIR, E_NO_ARGS};
use super::Application;
use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

const APP: &str = "cp";

/// `cp [-rR] SOURCE... DEST`
///
/// With several sources DEST must be an existing directory. Directories are
/// only copied with `-r`/`-R`. Each source is attempted; the first failure is
/// returned at the end.
pub struct Cp;

impl Application for Cp {
    fn run(
        &self,
        args: &[String],
        env: &Environment,
        _stdin: &mut dyn Read,
        _stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError> {
        let parsed = parse_args(APP, args, "rR")?;
        let recursive = parsed.has('r') || parsed.has('R');
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
            if let Err(e) = copy_one(env, src, &dest_path, into_dir, recursive) {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(Outcome::Continue),
        }
    }
}

fn copy_one(
    env: &Environment,
    src: &str,
    dest: &Path,
    into_dir: bool,
    recursive: bool,
) -> Result<(), AppError> {
    let src_path = env.resolve(src);
    if !src_path.exists() {
        return Err(AppError::new(APP, format!("{src}: {E_FILE_NOT_FOUND}")));
    }
    let target = if into_dir {
        match src_path.file_name() {
            Some(name) => dest.join(name),
            None => return Err(AppError::new(APP, format!("{src}: cannot copy"))),
        }
    } else {
        dest.to_path_buf()
    };
    if target == src_path {
        return Err(AppError::new(APP, format!("{src}: source and destination are the same")));
    }

    if src_path.is_dir() {
        if !recursive {
            return Err(AppError::new(APP, format!("{src}: {E_IS_DIR}")));
        }
        if target.starts_with(&src_path) {
            return Err(AppError::new(APP, format!("{src}: cannot copy a directory into itself")));
        }
        copy_tree(&src_path, &target).map_err(|e| AppError::io(APP, e))
    } else {
        fs::copy(&src_path, &target)
            .map(|_| ())
            .map_err(|e| AppError::io(APP, e))
    }
}

pub(crate) fn copy_tree(src: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let to: PathBuf = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &to)?;
        } else {
            fs::copy(entry.path(), &to)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cp(env: &Environment, args: &[&str]) -> Result<(), String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        Cp.run(&args, env, &mut io::empty(), &mut io::sink())
            .map(|_| ())
            .map_err(|e| e.to_string())
    }

    #[test]
    fn copies_file_to_new_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "data").unwrap();
        let env = Environment::new(dir.path());

        cp(&env, &["a.txt", "b.txt"]).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("b.txt")).unwrap(), "data");
        assert!(dir.path().join("a.txt").exists());
    }

    #[test]
    fn copies_several_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "A").unwrap();
        fs::write(dir.path().join("b.txt"), "B").unwrap();
        fs::create_dir(dir.path().join("out")).unwrap();
        let env = Environment::new(dir.path());

        cp(&env, &["a.txt", "b.txt", "out"]).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("out/a.txt")).unwrap(), "A");
        assert_eq!(fs::read_to_string(dir.path().join("out/b.txt")).unwrap(), "B");
    }

    #[test]
    fn directory_needs_recursive_flag() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/nested")).unwrap();
        fs::write(dir.path().join("src/nested/f"), "x").unwrap();
        let env = Environment::new(dir.path());

        assert_eq!(cp(&env, &["src", "dst"]).unwrap_err(), "cp: src: This is a directory");
        cp(&env, &["-r", "src", "dst"]).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("dst/nested/f")).unwrap(), "x");
    }

    #[test]
    fn argument_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "A").unwrap();
        let env = Environment::new(dir.path());

        assert_eq!(cp(&env, &["a.txt"]).unwrap_err(), "cp: Insufficient arguments");
        assert_eq!(
            cp(&env, &["a.txt", "a.txt", "nodir"]).unwrap_err(),
            "cp: nodir: Not a directory"
        );
        assert_eq!(
            cp(&env, &["ghost", "x"]).unwrap_err(),
            "cp: ghost: No such file or directory"
        );
    }
}
