//! Configuration management for cmod

use crate::error::{ModerationError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the data directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Placeholder shown to non-moderators in place of a hidden comment
pub const DEFAULT_PLACEHOLDER: &str = "This comment has been deleted";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Moderation settings
    pub moderation: ModerationConfig,
    /// Storage settings
    pub storage: StorageConfig,
    /// Web server settings
    pub web: WebConfig,
    /// UI settings
    pub ui: UiConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ModerationError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(ModerationError::FileNotFound(_)) => {
                tracing::debug!("No config at {:?}, using defaults", path);
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Write configuration as pretty TOML
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.moderation.per_page == 0 {
            return Err(ModerationError::Config(
                "moderation.per_page must be at least 1".to_string(),
            ));
        }
        if self.moderation.max_body_length == 0 {
            return Err(ModerationError::Config(
                "moderation.max_body_length must be at least 1".to_string(),
            ));
        }
        if self.moderation.placeholder.trim().is_empty() {
            return Err(ModerationError::Config(
                "moderation.placeholder cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Moderation-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModerationConfig {
    /// Queue page size
    pub per_page: usize,
    /// Maximum comment body length in characters
    pub max_body_length: usize,
    /// Text rendered in place of hidden comments
    pub placeholder: String,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            per_page: 25,
            max_body_length: 2000,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding board.json
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".cmod"),
        }
    }
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Address to bind
    pub bind: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// UI-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Color theme
    pub theme: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "default".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.moderation.per_page, 25);
        assert_eq!(config.moderation.placeholder, DEFAULT_PLACEHOLDER);
        assert_eq!(config.web.port, 3000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[moderation]"));
        assert!(toml.contains("[web]"));

        let config2: Config = toml::from_str(&toml).unwrap();
        assert_eq!(config.moderation.per_page, config2.moderation.per_page);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[moderation]\nper_page = 2\n").unwrap();
        assert_eq!(config.moderation.per_page, 2);
        assert_eq!(config.moderation.max_body_length, 2000);
        assert_eq!(config.web.bind, "127.0.0.1");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[moderation]\nper_page = 0\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ModerationError::Config(_)));
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join(CONFIG_FILE_NAME);

        let mut config = Config::default();
        config.moderation.per_page = 10;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.moderation.per_page, 10);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_or_default(&temp.path().join("absent.toml")).unwrap();
        assert_eq!(config.moderation.per_page, 25);
    }
}
