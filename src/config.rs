//! User configuration, stored as TOML in the platform config directory.

use crate::error::ConfigError;
use crate::planner::STORAGE_KEY;
use crate::timetable::CycleType;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "lesson-planner";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Json,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Empty means the default location in the user's data directory.
    #[serde(default)]
    pub path: String,
    #[serde(default = "default_storage_key")]
    pub key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: String::new(),
            key: default_storage_key(),
        }
    }
}

fn default_storage_key() -> String {
    STORAGE_KEY.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// A tracing filter directive such as `info` or `lesson_planner=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Values used when a new planner document is set up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub school_year: String,
    pub group: String,
    #[serde(default)]
    pub cycle_type: CycleType,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            school_year: "2024-2025".to_string(),
            group: "Groep 4".to_string(),
            cycle_type: CycleType::Weekly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

impl PlannerConfig {
    /// `~/.config/lesson-planner` on Linux, the platform equivalent elsewhere.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// Loads the default config file, or the built-in defaults when there is none.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(path)
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Where the planner document lives for the configured backend.
    pub fn resolved_storage_path(&self) -> PathBuf {
        if !self.storage.path.trim().is_empty() {
            return PathBuf::from(self.storage.path.trim());
        }
        let file = match self.storage.backend {
            StorageBackend::Json => "planner.json",
            StorageBackend::Sqlite => "planner.db",
        };
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let config: PlannerConfig = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.storage.key, STORAGE_KEY);
        assert_eq!(config.storage.backend, StorageBackend::Json);
        assert_eq!(config.defaults.group, "Groep 4");
    }

    #[test]
    fn explicit_storage_path_wins() {
        let mut config = PlannerConfig::default();
        config.storage.path = "/tmp/plan.json".to_string();
        assert_eq!(config.resolved_storage_path(), PathBuf::from("/tmp/plan.json"));
    }

    #[test]
    fn biweekly_cycle_parses() {
        let config: PlannerConfig = toml::from_str(
            "[defaults]\nschool_year = \"2025-2026\"\ngroup = \"Groep 5\"\ncycle_type = \"biweekly\"\n",
        )
        .unwrap();
        assert_eq!(config.defaults.cycle_type, CycleType::Biweekly);
    }

    #[test]
    fn saved_config_loads_back_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = PlannerConfig::default();
        config.storage.backend = StorageBackend::Sqlite;
        config.storage.key = "klas-4b".to_string();
        config.logging.level = "debug".to_string();
        config.defaults.cycle_type = CycleType::Biweekly;

        config.save_to(&path).unwrap();
        let loaded = PlannerConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }
}
