use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Environment variable naming an alternative overlay file.
pub const CONFIG_ENV_VAR: &str = "TINYSH_CONFIG";

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub applications: Applications,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_prompt")]
    pub prompt: String,
    /// Deepest allowed nesting of backtick substitutions.
    #[serde(default = "default_depth")]
    pub max_substitution_depth: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log destination; `~` is expanded. Empty disables logging.
    #[serde(default)]
    pub log_file: String,
}

fn default_prompt() -> String {
    "> ".into()
}

fn default_depth() -> usize {
    8
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            max_substitution_depth: default_depth(),
            log_level: default_log_level(),
            log_file: String::new(),
        }
    }
}

impl Settings {
    /// `log_file` with `~` expanded, or `None` when logging is disabled.
    pub fn log_path(&self) -> Option<PathBuf> {
        if self.log_file.trim().is_empty() {
            return None;
        }
        Some(PathBuf::from(shellexpand::tilde(&self.log_file).into_owned()))
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Warn)
    }
}

/// Which builtins the registry exposes.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Applications {
    #[serde(default)]
    pub enabled: Vec<String>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    applications: ApplicationsOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    prompt: Option<String>,
    max_substitution_depth: Option<usize>,
    log_level: Option<String>,
    log_file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ApplicationsOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    enabled: Vec<String>,
    #[serde(default)]
    remove_enabled: Vec<String>,
}

// ── Merge logic ──

/// Fold an overlay list into `base`: `replace` swaps it out wholesale,
/// otherwise `remove` is subtracted and new names are appended once each.
fn merge_list(base: &mut Vec<String>, add: Vec<String>, remove: &[String], replace: bool) {
    if replace {
        *base = add;
    } else {
        base.retain(|item| !remove.contains(item));
        for item in add {
            if !base.contains(&item) {
                base.push(item);
            }
        }
    }
}

impl Config {
    /// The configuration compiled into the binary.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Embedded defaults with the user overlay (`$TINYSH_CONFIG`, else
    /// `~/.config/tinysh/config.toml`) merged on top when it exists.
    ///
    /// A malformed overlay is reported on stderr and ignored.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    fn overlay_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        let home = std::env::var_os("HOME")?;
        Some(PathBuf::from(home).join(".config/tinysh/config.toml"))
    }

    fn load_overlay() -> Option<ConfigOverlay> {
        let path = Self::overlay_path()?;
        let content = std::fs::read_to_string(&path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("tinysh: config parse error in {}: {e}", path.display());
                None
            }
        }
    }

    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        if let Some(v) = s.prompt {
            self.settings.prompt = v;
        }
        if let Some(v) = s.max_substitution_depth {
            self.settings.max_substitution_depth = v;
        }
        if let Some(v) = s.log_level {
            self.settings.log_level = v;
        }
        if let Some(v) = s.log_file {
            self.settings.log_file = v;
        }

        let a = overlay.applications;
        merge_list(
            &mut self.applications.enabled,
            a.enabled,
            &a.remove_enabled,
            a.replace,
        );
    }

    /// Render the merged configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
