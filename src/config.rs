use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::error::ConfigError;
use crate::round::DEFAULT_ANSWER_TIMEOUT;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds a player gets for each answer
    pub answer_timeout_secs: u64,
    /// Embedded word list to play with
    pub vocabulary: String,
    pub default_language: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            answer_timeout_secs: DEFAULT_ANSWER_TIMEOUT.as_secs(),
            vocabulary: "easy".to_string(),
            default_language: "fr".to_string(),
        }
    }
}

/// Shortest answer window a config file can ask for
pub const MIN_ANSWER_TIMEOUT_SECS: u64 = 1;

impl GameConfig {
    pub fn answer_timeout(&self) -> Duration {
        Duration::from_secs(self.answer_timeout_secs.max(MIN_ANSWER_TIMEOUT_SECS))
    }
}

pub trait ConfigStore {
    fn try_load(&self) -> Result<GameConfig, ConfigError>;
    fn save(&self, cfg: &GameConfig) -> Result<(), ConfigError>;

    /// Stored config, or defaults when it is missing or unreadable
    fn load(&self) -> GameConfig {
        self.try_load().unwrap_or_else(|err| {
            warn!(error = %err, "falling back to default config");
            GameConfig::default()
        })
    }
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("lingo_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn try_load(&self) -> Result<GameConfig, ConfigError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(GameConfig::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, cfg: &GameConfig) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let cfg = GameConfig::default();
        store.save(&cfg).unwrap();
        assert_eq!(store.try_load().unwrap(), cfg);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("nested").join("config.json"));
        let cfg = GameConfig {
            answer_timeout_secs: 10,
            vocabulary: "easy".into(),
            default_language: "es".into(),
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
        assert_eq!(store.load().answer_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("absent.json"));
        assert_eq!(store.try_load().unwrap(), GameConfig::default());
    }

    #[test]
    fn corrupt_file_is_an_error_but_load_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        let store = FileConfigStore::with_path(&path);

        assert!(matches!(store.try_load(), Err(ConfigError::Parse(_))));
        assert_eq!(store.load(), GameConfig::default());
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "answer_timeout_secs": 0 }"#).unwrap();
        let store = FileConfigStore::with_path(&path);

        let cfg = store.load();
        assert_eq!(cfg.answer_timeout_secs, 0);
        assert_eq!(cfg.answer_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, br#"{ "default_language": "es" }"#).unwrap();
        let store = FileConfigStore::with_path(&path);

        let cfg = store.try_load().unwrap();
        assert_eq!(cfg.default_language, "es");
        assert_eq!(cfg.answer_timeout_secs, 30);
    }
}
