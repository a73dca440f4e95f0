//! User configuration for ipsbuild
//!
//! Settings are stored as TOML. The file location is taken from the
//! `IPSBUILD_CONFIG` environment variable when set, otherwise
//! `~/.config/ipsbuild/ipsbuild.toml` (the platform config dir on Windows).
//! Command-line flags always take precedence over values stored here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the config file location
pub const CONFIG_ENV_VAR: &str = "IPSBUILD_CONFIG";

/// Keys accepted by [`Config::get`] and [`Config::set`]
pub const CONFIG_KEYS: &[&str] = &["website", "output-dir", "verbosity"];

/// Error type for loading and saving configuration
#[derive(Debug)]
pub enum ConfigError {
    /// No home/config directory could be determined for the default path
    NoConfigDir,
    /// Reading or writing the config file failed
    Io { path: PathBuf, source: std::io::Error },
    /// The config file is not valid TOML for [`Config`]
    Parse(toml::de::Error),
    /// The config could not be serialised
    Serialize(toml::ser::Error),
    /// The key is not one of [`CONFIG_KEYS`]
    UnknownKey(String),
    /// The value cannot be stored under the key
    InvalidValue { key: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::NoConfigDir => write!(f, "Could not determine config directory"),
            ConfigError::Io { path, source } => {
                write!(f, "Failed to access {}: {}", path.display(), source)
            }
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Serialize(e) => write!(f, "Failed to serialize config: {}", e),
            ConfigError::UnknownKey(key) => write!(
                f,
                "Unknown config key: {}. Currently supported keys: {}",
                key,
                CONFIG_KEYS.join(", ")
            ),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "Invalid value for {}: {}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Serialize(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Website written to the manifest when `--website` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Directory for `<name>.xml` when `--output` is not given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    /// Verbosity used when neither `-q` nor `-v` is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbosity: Option<u8>,
}

impl Config {
    /// Resolve the config file location
    pub fn path() -> Result<PathBuf, ConfigError> {
        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        #[cfg(not(target_os = "windows"))]
        let base = dirs::home_dir().map(|home| home.join(".config"));

        #[cfg(target_os = "windows")]
        let base = dirs::config_dir();

        base.map(|dir| dir.join("ipsbuild").join("ipsbuild.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the resolved location; a missing file yields defaults
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(ConfigError::Parse)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        fs::write(path, content).map_err(io_error)
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "website" => self.website.clone(),
            "output-dir" => self.output_dir.clone(),
            "verbosity" => self.verbosity.map(|v| v.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        match key {
            "website" => self.website = Some(value),
            "output-dir" => self.output_dir = Some(value),
            "verbosity" => {
                let level = value.parse::<u8>().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value,
                })?;
                self.verbosity = Some(level);
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.website.is_none() && self.output_dir.is_none() && self.verbosity.is_none()
    }

    /// Set values as `(key, value)` pairs, in [`CONFIG_KEYS`] order
    pub fn values_iter(&self) -> Vec<(&'static str, String)> {
        CONFIG_KEYS
            .iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }
}
