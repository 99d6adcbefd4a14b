//! Configuration file handling
//!
//! Settings live in `config.toml` under the platform config directory
//! (`~/.config/clubh2h/config.toml` on Linux) or at a path given with
//! `--config`. Every field has a default except the API key, which can also
//! come from the `CLUBH2H_API_KEY` environment variable.
//!
//! ```toml
//! [api]
//! key = "..."
//! credential = "apisports"
//!
//! [cache]
//! max_bytes = 5242880
//!
//! [catalog]
//! season = 2023
//! ```

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::cache::DEFAULT_MAX_BYTES;
use crate::data::gateway::{DEFAULT_BASE_URL, DEFAULT_RAPIDAPI_HOST};
use crate::data::{Credential, ALLOWED_COUNTRIES, DEFAULT_SEASON};

/// Environment variable that overrides `api.key`
pub const API_KEY_ENV: &str = "CLUBH2H_API_KEY";

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unknown values
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// No key in the file or the environment
    #[error("No API key configured. Set CLUBH2H_API_KEY or api.key in the config file")]
    MissingApiKey,
}

/// Header style used to send the API key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStyle {
    /// `x-rapidapi-key` plus `x-rapidapi-host`
    #[default]
    RapidApi,
    /// `x-apisports-key`
    ApiSports,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub key: Option<String>,
    pub credential: CredentialStyle,
    /// Host header for the RapidAPI style
    pub host: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Overrides the platform cache directory
    pub dir: Option<PathBuf>,
    pub max_bytes: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Season used for league team lists
    pub season: u16,
    pub allowed_countries: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            key: None,
            credential: CredentialStyle::default(),
            host: DEFAULT_RAPIDAPI_HOST.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            season: DEFAULT_SEASON,
            allowed_countries: ALLOWED_COUNTRIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Config {
    /// Parses configuration from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads and parses a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads from `path` if given, else from the default location
    ///
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::info!(path = %path.display(), "loaded config");
                Self::load(&path)
            }
            _ => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// XDG-compliant location of `config.toml`
    pub fn default_path() -> Option<PathBuf> {
        let project_dirs = ProjectDirs::from("", "", "clubh2h")?;
        Some(project_dirs.config_dir().join("config.toml"))
    }

    /// Applies the API key override from the environment
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Applies the API key override using a custom variable lookup
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.api.key = Some(key);
        }
        self
    }

    /// Builds the request credential from the configured key and style
    pub fn credential(&self) -> Result<Credential, ConfigError> {
        let key = self
            .api
            .key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(match self.api.credential {
            CredentialStyle::RapidApi => Credential::RapidApi {
                key,
                host: self.api.host.clone(),
            },
            CredentialStyle::ApiSports => Credential::ApiSports { key },
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }
}
