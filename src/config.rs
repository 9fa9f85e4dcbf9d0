//! Database configuration.
//!
//! Applications load settings from `config/config.toml` or environment
//! variables using `DatabaseConfig::load()`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "config/config.toml";
const ENV_PREFIX: &str = "ROWKEEPER";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// SQLite database file, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl DatabaseConfig {
    /// Load the database configuration from `config/config.toml`, falling back to env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from an explicit TOML file (optional) layered under `ROWKEEPER__*` env vars.
    pub fn load_from<P: AsRef<Path>>(file: P) -> Result<Self, ConfigError> {
        let file = file.as_ref();
        let builder = Config::builder()
            .add_source(File::from(file).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // Unreadable file: warn and retry with env only
                if file.exists() {
                    log::warn!(
                        "failed to load {}, falling back to env: {}",
                        file.display(),
                        err
                    );
                }
                Config::builder()
                    .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {}, then env-only error: {}",
                            err, env_err
                        ))
                    })?
            }
        };

        // A missing [database] section means defaults everywhere
        match settings.get::<DatabaseConfig>("database") {
            Ok(section) => Ok(section),
            Err(ConfigError::NotFound(_)) => Ok(DatabaseConfig::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Database configuration could not be loaded from file or environment: {}",
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = DatabaseConfig::load_from(dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, DatabaseConfig::default());
        assert_eq!(cfg.path, ":memory:");
        assert_eq!(cfg.busy_timeout_ms, 5_000);
    }

    #[test]
    fn test_values_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[database]\npath = \"blog.sqlite3\"\nbusy_timeout_ms = 250").unwrap();

        let cfg = DatabaseConfig::load_from(&path).unwrap();
        assert_eq!(cfg.path, "blog.sqlite3");
        assert_eq!(cfg.busy_timeout_ms, 250);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database]\npath = \"only-path.db\"\n").unwrap();

        let cfg = DatabaseConfig::load_from(&path).unwrap();
        assert_eq!(cfg.path, "only-path.db");
        assert_eq!(cfg.busy_timeout_ms, 5_000);
    }
}
