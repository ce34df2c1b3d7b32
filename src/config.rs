//! # Configuration Module
//!
//! Configuration for a rewrite run, loaded from a `.reheader.toml` file (or
//! the file named by `REHEADER_CONFIG`) and overridden by command-line flags.
//!
//! ```toml
//! root = "../src"
//! header-file = "HEADER.txt"
//! ignore = [".json", ".pb.go"]
//! window = "header-lines"   # or "comment-end", or a line count such as 9
//! atomic = true
//! year = "2023"
//! ```
//!
//! Relative `root` and `header-file` paths are resolved against the directory
//! containing the config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::header::HeaderWindow;
use crate::verbose_log;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".reheader.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "REHEADER_CONFIG";

/// Window setting as written in TOML: a mode name or a bare line count.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum WindowSetting {
  Lines(usize),
  Mode(String),
}

impl WindowSetting {
  fn resolve(&self) -> Result<HeaderWindow, ConfigError> {
    match self {
      WindowSetting::Lines(n) => Ok(HeaderWindow::Fixed(*n)),
      WindowSetting::Mode(mode) => mode.parse::<HeaderWindow>().map_err(|e| ConfigError::Invalid {
        field: "window",
        message: e.to_string(),
      }),
    }
  }
}

/// Contents of a `.reheader.toml` file.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
  /// Directory to walk
  #[serde(default)]
  pub root: Option<PathBuf>,

  /// Inline header text
  #[serde(default)]
  pub header: Option<String>,

  /// File containing the header text
  #[serde(default)]
  pub header_file: Option<PathBuf>,

  /// Path suffixes to leave untouched
  #[serde(default)]
  pub ignore: Vec<String>,

  /// Header window policy
  #[serde(default)]
  pub window: Option<WindowSetting>,

  /// Write through a temporary file and rename (default `true`)
  #[serde(default)]
  pub atomic: Option<bool>,

  /// Value substituted for `{{year}}` in the header
  #[serde(default)]
  pub year: Option<String>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A field holds an unusable value.
  #[error("Invalid value for '{field}': {message}")]
  Invalid { field: &'static str, message: String },
}

impl Config {
  /// Load configuration from a file.
  ///
  /// Relative paths inside the file are resolved against its directory.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
      path: path.to_path_buf(),
      source: e,
    })?;

    config.validate()?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    Ok(config.resolve_paths(base_dir))
  }

  /// Checks that:
  /// - At most one header source is given
  /// - The window setting parses
  fn validate(&self) -> Result<(), ConfigError> {
    if self.header.is_some() && self.header_file.is_some() {
      return Err(ConfigError::Invalid {
        field: "header",
        message: "'header' and 'header-file' are mutually exclusive".to_string(),
      });
    }

    self.header_window()?;
    Ok(())
  }

  /// The configured header window, if any.
  pub fn header_window(&self) -> Result<Option<HeaderWindow>, ConfigError> {
    self.window.as_ref().map(WindowSetting::resolve).transpose()
  }

  fn resolve_paths(self, base_dir: &Path) -> Self {
    let resolve = |p: PathBuf| if p.is_absolute() { p } else { base_dir.join(p) };
    Self {
      root: self.root.map(resolve),
      header_file: self.header_file.map(resolve),
      ..self
    }
  }
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `REHEADER_CONFIG` environment variable
/// 3. `.reheader.toml` in `search_dir`
pub fn discover_config_path(explicit_path: Option<&Path>, search_dir: &Path) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    verbose_log!("Using explicit config path: {}", path.display());
    return Some(path.to_path_buf());
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(&env_path);
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, env_path);
  }

  let local_config = search_dir.join(DEFAULT_CONFIG_FILENAME);
  if local_config.exists() {
    verbose_log!("Using config: {}", local_config.display());
    return Some(local_config);
  }

  verbose_log!("No config file found");
  None
}

/// Load configuration from the discovered path.
///
/// An explicit path that does not exist is an error; a missing discovered
/// file is not.
pub fn load_config(explicit_path: Option<&Path>, search_dir: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    verbose_log!("Config file discovery disabled (--no-config)");
    return Ok(None);
  }

  match discover_config_path(explicit_path, search_dir) {
    Some(path) => {
      let config = Config::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;
      Ok(Some(config))
    }
    None => Ok(None),
  }
}

#[cfg(test)]
mod tests {
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn test_parse_full_config() {
    let config: Config = toml::from_str(concat!(
      "root = \"../src\"\n",
      "header = \"/*\\n * H\\n */\\n\"\n",
      "ignore = [\".json\", \".pb.go\"]\n",
      "window = 9\n",
      "atomic = false\n",
      "year = \"2023\"\n",
    ))
    .expect("valid config should parse");

    assert_eq!(config.root, Some(PathBuf::from("../src")));
    assert_eq!(config.header.as_deref(), Some("/*\n * H\n */\n"));
    assert_eq!(config.ignore, vec![".json".to_string(), ".pb.go".to_string()]);
    assert_eq!(config.header_window().expect("window"), Some(HeaderWindow::Fixed(9)));
    assert_eq!(config.atomic, Some(false));
    assert_eq!(config.year.as_deref(), Some("2023"));
  }

  #[test]
  fn test_parse_empty_config() {
    let config: Config = toml::from_str("").expect("empty config should parse");
    assert_eq!(config, Config::default());
    assert_eq!(config.header_window().expect("window"), None);
  }

  #[test]
  fn test_window_mode_names() {
    let config: Config = toml::from_str("window = \"comment-end\"\n").expect("parse");
    assert_eq!(config.header_window().expect("window"), Some(HeaderWindow::CommentEnd));
  }

  #[test]
  fn test_unknown_field_is_rejected() {
    assert!(toml::from_str::<Config>("ignored = [\".json\"]\n").is_err());
  }

  #[test]
  fn test_validate_both_header_sources() {
    let config = Config {
      header: Some("x".to_string()),
      header_file: Some(PathBuf::from("HEADER.txt")),
      ..Config::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "header", .. })));
  }

  #[test]
  fn test_validate_bad_window() {
    let config = Config {
      window: Some(WindowSetting::Mode("sideways".to_string())),
      ..Config::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "window", .. })));
  }

  #[test]
  fn test_load_resolves_relative_paths() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(&config_path, "root = \"src\"\nheader-file = \"HEADER.txt\"\n").expect("write config");

    let config = Config::load(&config_path).expect("load should succeed");

    assert_eq!(config.root, Some(temp_dir.path().join("src")));
    assert_eq!(config.header_file, Some(temp_dir.path().join("HEADER.txt")));
  }

  #[test]
  fn test_load_config_file_not_found() {
    let result = Config::load(Path::new("/nonexistent/path/.reheader.toml"));
    assert!(matches!(result, Err(ConfigError::ReadError { .. })));
  }

  #[test]
  fn test_load_config_invalid_toml() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(&config_path, "root = [").expect("write config");

    assert!(matches!(Config::load(&config_path), Err(ConfigError::ParseError { .. })));
  }

  #[test]
  fn test_discover_config_explicit_path() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join("custom.toml");

    assert_eq!(
      discover_config_path(Some(&config_path), temp_dir.path()),
      Some(config_path)
    );
  }

  #[test]
  fn test_discover_config_in_search_dir() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let config_path = temp_dir.path().join(DEFAULT_CONFIG_FILENAME);
    std::fs::write(&config_path, "").expect("write config");

    assert_eq!(discover_config_path(None, temp_dir.path()), Some(config_path));
  }

  #[test]
  fn test_load_config_disabled() {
    let temp_dir = TempDir::new().expect("create temp dir");
    std::fs::write(temp_dir.path().join(DEFAULT_CONFIG_FILENAME), "root = [").expect("write config");

    assert!(load_config(None, temp_dir.path(), true).expect("no-config").is_none());
  }

  #[test]
  fn test_load_config_missing_explicit_path_fails() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let missing = temp_dir.path().join("missing.toml");

    assert!(load_config(Some(&missing), temp_dir.path(), false).is_err());
  }
}
