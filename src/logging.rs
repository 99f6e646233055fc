use std::fs::{self, OpenOptions};

use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::Settings;

/// Route `log` records to the file named by `settings.log_file`.
///
/// Best-effort: if the file cannot be opened, or a logger is already
/// installed, logging stays off. The shell's own stdout/stderr are never
/// used for log output.
pub fn init(settings: &Settings) {
    let level = settings.level_filter();
    if level == LevelFilter::Off {
        return;
    }
    let Some(path) = settings.log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        let _ = fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Off)
        .set_thread_level(LevelFilter::Off)
        .build();
    let _ = WriteLogger::init(level, config, file);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_logging_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/shell.log");
        let settings = Settings {
            log_level: "off".into(),
            log_file: path.to_string_lossy().into_owned(),
            ..Settings::default()
        };
        init(&settings);
        assert!(!path.exists());
    }
}
