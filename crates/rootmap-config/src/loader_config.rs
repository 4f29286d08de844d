//! Loader configuration file (`rootmap.toml`)

use crate::library_paths::{SHARED_LIBRARY_PREFIX, SHARED_LIBRARY_SUFFIX};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that points at an explicit config file
pub const CONFIG_ENV: &str = "ROOTMAP_CONFIG";

/// Module name the reflection layer stamps on the entities it creates
pub const DEFAULT_UMBRELLA_MODULE: &str = "cppyy.gbl";

/// Keys accepted by [`LoaderConfig::get`] and [`LoaderConfig::set`]
pub const CONFIG_KEYS: &[&str] = &[
    "umbrella-module",
    "library-prefix",
    "library-suffix",
    "package",
];

/// Error type for loading and saving the config file
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
    UnknownKey(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Serialize(e) => write!(f, "Failed to serialize config: {}", e),
            ConfigError::UnknownKey(key) => write!(
                f,
                "Unknown config key '{}' (expected one of: {})",
                key,
                CONFIG_KEYS.join(", ")
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        ConfigError::Serialize(e)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct LoaderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub umbrella_module: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_suffix: Option<String>,
    /// Default destination package name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl LoaderConfig {
    pub fn path() -> PathBuf {
        // Honor explicit override via ROOTMAP_CONFIG for tests / isolated runs.
        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }

        #[cfg(not(target_os = "windows"))]
        {
            dirs::home_dir().map_or_else(
                || PathBuf::from(".config/rootmap/rootmap.toml"),
                |h| h.join(".config").join("rootmap").join("rootmap.toml"),
            )
        }

        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map_or_else(
                || PathBuf::from("config\\rootmap\\rootmap.toml"),
                |c| c.join("rootmap").join("rootmap.toml"),
            )
        }
    }

    /// Directory holding the config file, which also receives the log file
    pub fn dir() -> PathBuf {
        Self::path()
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }

    /// Load from the default location, returning defaults if the file doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&Self::path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(LoaderConfig::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn umbrella_module(&self) -> &str {
        self.umbrella_module
            .as_deref()
            .unwrap_or(DEFAULT_UMBRELLA_MODULE)
    }

    pub fn library_prefix(&self) -> &str {
        self.library_prefix.as_deref().unwrap_or(SHARED_LIBRARY_PREFIX)
    }

    pub fn library_suffix(&self) -> &str {
        self.library_suffix.as_deref().unwrap_or(SHARED_LIBRARY_SUFFIX)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "umbrella-module" => self.umbrella_module.clone(),
            "library-prefix" => self.library_prefix.clone(),
            "library-suffix" => self.library_suffix.clone(),
            "package" => self.package.clone(),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        match key {
            "umbrella-module" => self.umbrella_module = Some(value),
            "library-prefix" => self.library_prefix = Some(value),
            "library-suffix" => self.library_suffix = Some(value),
            "package" => self.package = Some(value),
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    /// Effective values, defaults filled in, in `CONFIG_KEYS` order
    pub fn values_iter(&self) -> Vec<(&'static str, String)> {
        let mut values = vec![
            ("umbrella-module", self.umbrella_module().to_string()),
            ("library-prefix", self.library_prefix().to_string()),
            ("library-suffix", self.library_suffix().to_string()),
        ];
        if let Some(ref package) = self.package {
            values.push(("package", package.clone()));
        }
        values
    }
}
