//! Configuration system for conreg
//!
//! The console itself is configured from a TOML file:
//!
//! ```toml
//! cache_path = "convars.json"
//! cache_category = "convars"
//! cheats_variable = "sv_cheats"
//! register_builtins = true
//! log_level = "info"
//! ```
//!
//! Missing keys take their defaults, a missing file can be generated with
//! [`ConsoleConfig::load_or_default`].

mod loader;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::convars::{DEFAULT_CACHE_CATEGORY, DEFAULT_CHEATS_VARIABLE};

pub use loader::{base_dir, default_config_path, resolve_relative, CONFIG_FILE_NAME};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// Could not determine config directory from the executable location
    #[error("Config directory not available - could not resolve executable path")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Settings file backing CACHE variables
    pub cache_path: PathBuf,

    /// Settings category holding cached variables
    pub cache_category: String,

    /// Boolean variable that unlocks CHEAT entries
    pub cheats_variable: String,

    /// Register the cheats variable and the `find`/`help`/`reset` commands
    pub register_builtins: bool,

    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from("convars.json"),
            cache_category: DEFAULT_CACHE_CATEGORY.to_string(),
            cheats_variable: DEFAULT_CHEATS_VARIABLE.to_string(),
            register_builtins: true,
            log_level: "info".to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Load config from file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!("Loaded console config from {:?}", path);
        Ok(config)
    }

    /// Load config from file, creating default if missing.
    pub fn load_or_default(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            let default = Self::default();
            default.save(path)?;
            tracing::info!("Created default console config at {:?}", path);
            Ok(default)
        }
    }

    /// Save config to file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!("Saved console config to {:?}", path);
        Ok(())
    }

    /// Reload config from file.
    ///
    /// Updates self with the current file contents.
    pub fn reload(&mut self, path: &Path) -> ConfigResult<()> {
        *self = Self::load(path)?;
        tracing::debug!("Reloaded console config from {:?}", path);
        Ok(())
    }

    /// Make `cache_path` relative to the config file location.
    pub fn resolve_paths(mut self, config_path: &Path) -> Self {
        self.cache_path = resolve_relative(config_path, &self.cache_path);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_config_default() {
        let config = ConsoleConfig::default();
        assert_eq!(config.cache_category, "convars");
        assert_eq!(config.cheats_variable, "sv_cheats");
        assert!(config.register_builtins);
    }

    #[test]
    fn test_console_config_partial_toml() {
        let config: ConsoleConfig = toml::from_str("cheats_variable = \"cheats\"").unwrap();
        assert_eq!(config.cheats_variable, "cheats");
        assert_eq!(config.cache_path, PathBuf::from("convars.json"));
    }

    #[test]
    fn test_console_config_serialize() {
        let config = ConsoleConfig {
            register_builtins: false,
            ..Default::default()
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("register_builtins = false"));
        assert!(toml_str.contains("cache_category = \"convars\""));
    }

    #[test]
    fn test_load_or_default_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf").join("conreg.toml");

        let config = ConsoleConfig::load_or_default(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config, ConsoleConfig::default());

        let mut edited = config.clone();
        edited.log_level = "debug".to_string();
        edited.save(&path).unwrap();

        let mut reloaded = config;
        reloaded.reload(&path).unwrap();
        assert_eq!(reloaded.log_level, "debug");

        let resolved = reloaded.resolve_paths(&path);
        assert_eq!(resolved.cache_path, dir.path().join("conf").join("convars.json"));
    }
}
