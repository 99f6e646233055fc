//! tinysh: interactive shell entry point.
//!
//! Usage:
//!   tinysh                  run the REPL on stdin
//!   tinysh -c LINE          evaluate one line and exit
//!   tinysh --dump-config    print the merged configuration as TOML

use std::io::{self, BufReader};

use tinysh::config::Config;
use tinysh::eval::Outcome;
use tinysh::shell::Shell;

const USAGE: &str = "usage: tinysh [-c LINE | --dump-config]";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = Config::load();

    if args.iter().any(|a| a == "--dump-config") {
        match config.to_toml() {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("tinysh: failed to serialize config: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    tinysh::logging::init(&config.settings);

    let shell = match Shell::from_config(&config) {
        Ok(shell) => shell,
        Err(e) => {
            eprintln!("tinysh: cannot determine working directory: {e}");
            std::process::exit(1);
        }
    };

    let code = match args.as_slice() {
        [] => shell.run_repl(&mut BufReader::new(io::stdin()), &mut io::stdout()),
        [flag, line] if flag == "-c" => {
            match shell.evaluate_with_input(line, &mut io::stdin(), &mut io::stdout()) {
                Ok(Outcome::Exit(code)) => code,
                Ok(Outcome::Continue) => 0,
                Err(e) => {
                    shell.context().errors.report(&e);
                    1
                }
            }
        }
        _ => {
            eprintln!("{USAGE}");
            2
        }
    };
    std::process::exit(code);
}
