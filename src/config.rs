//! Configuration loader and validator for the forum store.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::db::DEFAULT_DATABASE_URL;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Where the store lives and how to open it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    /// Create the file when it does not exist yet.
    pub create_if_missing: bool,
    /// Apply the bundled schema after connecting.
    pub bootstrap_schema: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            create_if_missing: false,
            bootstrap_schema: false,
        }
    }
}

impl Config {
    /// Replace `database.url` when `DATABASE_URL` is set and non-empty.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            if !url.trim().is_empty() {
                self.database.url = url;
            }
        }
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, returns the defaults.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let cfg = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            serde_yaml::from_str(&content)?
        }
        None => Config::default(),
    };
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let url = cfg.database.url.trim();
    if url.is_empty() {
        return Err(ConfigError::Invalid("database.url must be non-empty"));
    }
    if !url.starts_with("sqlite:") {
        return Err(ConfigError::Invalid("database.url must use the sqlite: scheme"));
    }
    Ok(())
}

pub fn example() -> &'static str {
    r#"database:
  url: "sqlite://questions.db"
  create_if_missing: false
  bootstrap_schema: false
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_example_ok() {
        let cfg: Config = serde_yaml::from_str(example()).unwrap();
        validate(&cfg).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn missing_section_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.database.url, DEFAULT_DATABASE_URL);
        assert!(!cfg.database.bootstrap_schema);
    }

    #[test]
    fn invalid_url() {
        let mut cfg = Config::default();
        cfg.database.url = "  ".into();
        let err = validate(&cfg).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("non-empty")),
            _ => panic!("wrong error"),
        }

        cfg.database.url = "postgres://localhost/forum".into();
        let err = validate(&cfg).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("sqlite:")),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn load_from_file_ok() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        fs::write(
            &p,
            "database:\n  url: \"sqlite::memory:\"\n  bootstrap_schema: true\n",
        )
        .unwrap();
        let cfg = load(Some(&p)).unwrap();
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert!(cfg.database.bootstrap_schema);
        assert!(!cfg.database.create_if_missing);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let td = tempdir().unwrap();
        let err = load(Some(&td.path().join("nope.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
