// Configuration and logging setup
// Board dimensions and display preferences come from a TOML file plus environment overrides

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;

const APP_NAME: &str = "gridsweep";

/// User configuration, read from `gridsweep.toml`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    // Board shape
    pub rows: usize,
    pub cols: usize,
    pub mines: usize,

    pub ascii_icons: bool,          // Use ASCII fallback glyphs
    pub log_file: Option<PathBuf>,  // Tracing output; logging is off when unset
    pub log_level: String,          // "error", "warn", "info", "debug" or "trace"
}

impl Default for Config {
    fn default() -> Self {
        Config {
            rows: 10,
            cols: 10,
            mines: 10,
            ascii_icons: false,
            log_file: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Parse a config from TOML text; missing keys keep their defaults
    pub fn from_toml(s: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(s)
    }

    /// Apply `GRIDSWEEP_ROWS`, `GRIDSWEEP_COLS` and `GRIDSWEEP_MINES`
    /// Unparsable values are ignored
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, current: usize| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(current)
        };
        self.rows = read("GRIDSWEEP_ROWS", self.rows);
        self.cols = read("GRIDSWEEP_COLS", self.cols);
        self.mines = read("GRIDSWEEP_MINES", self.mines);
    }

    /// Configured tracing level, falling back to INFO
    pub fn level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::INFO)
    }
}

/// Failure to read or parse the config file
#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, .. } => write!(f, "cannot read config {}", path.display()),
            ConfigError::Parse { path, .. } => write!(f, "invalid config {}", path.display()),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
        }
    }
}

/// Get the configuration file path
/// `GRIDSWEEP_CONFIG` wins; otherwise the platform config directory
/// (e.g. ~/.config/gridsweep/gridsweep.toml on Linux), falling back to the current directory
pub fn config_path() -> Option<PathBuf> {
    if let Ok(p) = env::var("GRIDSWEEP_CONFIG") {
        return Some(PathBuf::from(p));
    }
    let file = format!("{}.toml", APP_NAME);
    if let Some(proj) = ProjectDirs::from("org", "tweakyllama", APP_NAME) {
        return Some(proj.config_dir().join(file));
    }
    env::current_dir().ok().map(|dir| dir.join(file))
}

/// Load the config at `path`; a missing file yields the defaults
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    Config::from_toml(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the config from the default location and apply environment overrides
/// The file is never written; the game keeps no state between sessions
pub fn load_config() -> Result<Config, ConfigError> {
    let mut cfg = match config_path() {
        Some(path) => load_config_from(&path)?,
        None => Config::default(),
    };
    cfg.apply_env();
    Ok(cfg)
}

/// Install a file-backed tracing subscriber when `log_file` is configured
/// The terminal UI owns stdout, so nothing is logged there
pub fn init_logging(cfg: &Config) -> io::Result<()> {
    let Some(path) = &cfg.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(cfg.level())
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_reference_board() {
        let cfg = Config::default();
        assert_eq!((cfg.rows, cfg.cols, cfg.mines), (10, 10, 10));
        assert!(cfg.log_file.is_none());
        assert_eq!(cfg.level(), Level::INFO);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let cfg = Config::from_toml("rows = 16\nmines = 40\nascii_icons = true\n").unwrap();
        assert_eq!(cfg.rows, 16);
        assert_eq!(cfg.cols, 10);
        assert_eq!(cfg.mines, 40);
        assert!(cfg.ascii_icons);
    }

    #[test]
    fn test_log_settings_parse() {
        let cfg = Config::from_toml("log_file = \"/tmp/gridsweep.log\"\nlog_level = \"debug\"\n")
            .unwrap();
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/gridsweep.log")));
        assert_eq!(cfg.level(), Level::DEBUG);

        let cfg = Config::from_toml("log_level = \"chatty\"\n").unwrap();
        assert_eq!(cfg.level(), Level::INFO);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(Config::from_toml("rows = \"ten\"").is_err());
        assert!(Config::from_toml("rows = ").is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GRIDSWEEP_ROWS", "16"),
            ("GRIDSWEEP_COLS", " 30 "),
            ("GRIDSWEEP_MINES", "lots"),
        ]
        .into_iter()
        .collect();
        let mut cfg = Config::default();
        cfg.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!((cfg.rows, cfg.cols, cfg.mines), (16, 30, 10));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let path = env::temp_dir().join("gridsweep-test-does-not-exist.toml");
        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let path = env::temp_dir().join(format!("gridsweep-test-{}.toml", std::process::id()));
        fs::write(&path, "cols = 12\n").unwrap();
        let cfg = load_config_from(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(cfg.cols, 12);
        assert_eq!(cfg.rows, 10);

        fs::write(&path, "cols = [").unwrap();
        let err = load_config_from(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
