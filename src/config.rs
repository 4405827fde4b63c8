use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const APP_DIR: &str = "lanes";
const CONFIG_FILE: &str = "config.toml";
const DEFAULT_DB_FILE: &str = "tasks.csv";
pub const LOG_FILE: &str = "lanes.log";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("toml deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("could not determine the user config directory")]
    NoConfigDir,
}

/// Contents of `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Task file used when `--db` is not given.
    pub db_path: PathBuf,
}

impl Config {
    fn default_in(dir: &Path) -> Self {
        Self { db_path: dir.join(DEFAULT_DB_FILE) }
    }
}

/// `<user config dir>/lanes`.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .ok_or(ConfigError::NoConfigDir)
}

/// Read `config.toml` from `dir`, writing a default one on first run.
pub fn load_or_init(dir: &Path) -> Result<Config, ConfigError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        let config = Config::default_in(dir);
        fs::write(&path, toml::to_string_pretty(&config)?)?;
        tracing::info!(path = %path.display(), "wrote default config");
        return Ok(config);
    }
    let config_str = fs::read_to_string(&path)?;
    let config: PartialConfig = toml::from_str(&config_str)?;
    Ok(Config {
        db_path: config
            .db_path
            .unwrap_or_else(|| Config::default_in(dir).db_path),
    })
}

/// On-disk shape; every key may be missing.
#[derive(Debug, Deserialize)]
struct PartialConfig {
    db_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_run_writes_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_init(dir.path()).unwrap();
        assert_eq!(config.db_path, dir.path().join("tasks.csv"));
        let written = fs::read_to_string(dir.path().join("config.toml")).unwrap();
        assert!(written.contains("db_path"));
        assert_eq!(load_or_init(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_existing_config_is_respected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "db_path = \"/srv/board.csv\"\n").unwrap();
        let config = load_or_init(dir.path()).unwrap();
        assert_eq!(config.db_path, PathBuf::from("/srv/board.csv"));
    }

    #[test]
    fn test_missing_key_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "").unwrap();
        let config = load_or_init(dir.path()).unwrap();
        assert_eq!(config.db_path, dir.path().join("tasks.csv"));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("config.toml"), "db_path = [").unwrap();
        assert!(matches!(load_or_init(dir.path()), Err(ConfigError::TomlDe(_))));
    }
}
