use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use super::args::parse_args;
use super::util::{write_all, E_FILE_NOT_FOUND, E_NO_PERM};
use super::Application;
use crate::environment::Environment;
use crate::error::AppError;
use crate::eval::Outcome;

const APP: &str = "ls";

/// `ls [-RX] [PATH]...`
///
/// Hidden entries (leading `.`) are never shown. File operands are listed
/// first, then each directory under a `name:` header. A lone directory
/// without `-R` is listed without a header.
pub struct Ls;

impl Application for Ls {
    fn run(
        &self,
        args: &[String],
        env: &Environment,
        _stdin: &mut dyn Read,
        stdout: &mut dyn Write,
    ) -> Result<Outcome, AppError> {
        let parsed = parse_args(APP, args, "RX")?;
        let opts = Options {
            recursive: parsed.has('R'),
            by_ext: parsed.has('X'),
        };

        let mut operands = parsed.operands.clone();
        if operands.is_empty() {
            operands.push(".".to_string());
        }

        let mut files = Vec::new();
        let mut dirs = Vec::new();
        for name in &operands {
            let path = env.resolve(name);
            if path.is_dir() {
                dirs.push(name.clone());
            } else if path.exists() {
                files.push(name.clone());
            } else {
                return Err(AppError::new(APP, format!("{name}: {E_FILE_NOT_FOUND}")));
            }
        }

        let mut blocks = Vec::new();
        if !files.is_empty() {
            opts.sort(&mut files);
            blocks.push(files.join("\n"));
        }
        let headers = opts.recursive || operands.len() > 1;
        for name in &dirs {
            opts.list(env, name, headers, &mut blocks)?;
        }

        let mut out = blocks.join("\n\n");
        if !out.is_empty() {
            out.push('\n');
        }
        write_all(APP, stdout, out.as_bytes())?;
        Ok(Outcome::Continue)
    }
}

#[derive(Debug, Clone, Copy)]
struct Options {
    recursive: bool,
    by_ext: bool,
}

impl Options {
    fn list(
        self,
        env: &Environment,
        name: &str,
        header: bool,
        blocks: &mut Vec<String>,
    ) -> Result<(), AppError> {
        let mut entries = visible_entries(&env.resolve(name), name)?;
        self.sort(&mut entries);

        let body = entries.join("\n");
        blocks.push(if header { format!("{name}:\n{body}") } else { body });

        if self.recursive {
            for entry in &entries {
                let child = if name == "." {
                    entry.clone()
                } else {
                    format!("{}/{entry}", name.trim_end_matches('/'))
                };
                if env.resolve(&child).is_dir() {
                    self.list(env, &child, true, blocks)?;
                }
            }
        }
        Ok(())
    }

    fn sort(self, names: &mut [String]) {
        if self.by_ext {
            names.sort_by(|a, b| extension(a).cmp(&extension(b)).then_with(|| a.cmp(b)));
        } else {
            names.sort();
        }
    }
}

/// Extension after the last `.`; names without one sort first.
fn extension(name: &str) -> Option<&str> {
    let base = Path::new(name).file_name()?.to_str()?;
    base.rsplit_once('.').map(|(_, ext)| ext)
}

fn visible_entries(dir: &Path, name: &str) -> Result<Vec<String>, AppError> {
    let read = fs::read_dir(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => AppError::new(APP, format!("{name}: {E_NO_PERM}")),
        _ => AppError::io(APP, e),
    })?;
    let mut names = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| AppError::io(APP, e))?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !file_name.starts_with('.') {
            names.push(file_name);
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (tempfile::TempDir, Environment) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("b.txt"), "").unwrap();
        fs::write(root.join("a.rs"), "").unwrap();
        fs::write(root.join("Makefile"), "").unwrap();
        fs::write(root.join(".hidden"), "").unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        fs::write(root.join("sub").join("inner.txt"), "").unwrap();
        let env = Environment::new(root);
        (dir, env)
    }

    fn ls(env: &Environment, args: &[&str]) -> Result<String, String> {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut out: Vec<u8> = Vec::new();
        Ls.run(&args, env, &mut std::io::empty(), &mut out)
            .map(|_| String::from_utf8(out).unwrap())
            .map_err(|e| e.to_string())
    }

    #[test]
    fn lists_current_directory_sorted() {
        let (_dir, env) = fixture();
        assert_eq!(ls(&env, &[]).unwrap(), "Makefile\na.rs\nb.txt\nsub\n");
    }

    #[test]
    fn sort_by_extension() {
        let (_dir, env) = fixture();
        assert_eq!(ls(&env, &["-X"]).unwrap(), "Makefile\nsub\na.rs\nb.txt\n");
    }

    #[test]
    fn recursive_headers() {
        let (_dir, env) = fixture();
        assert_eq!(
            ls(&env, &["-R", "sub"]).unwrap(),
            "sub:\ninner.txt\n"
        );
        assert_eq!(
            ls(&env, &["-R"]).unwrap(),
            ".:\nMakefile\na.rs\nb.txt\nsub\n\nsub:\ninner.txt\n"
        );
    }

    #[test]
    fn files_before_directories() {
        let (_dir, env) = fixture();
        assert_eq!(
            ls(&env, &["sub", "b.txt", "a.rs"]).unwrap(),
            "a.rs\nb.txt\n\nsub:\ninner.txt\n"
        );
    }

    #[test]
    fn missing_operand() {
        let (_dir, env) = fixture();
        assert_eq!(ls(&env, &["ghost"]).unwrap_err(), "ls: ghost: No such file or directory");
    }
}
