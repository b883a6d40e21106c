//! Process configuration: an optional file overlaid by environment variables.
//!
//! Recognised keys (environment names in parentheses):
//! `merriam_key` (`MERRIAM_KEY`), `allow_startup_without_key`
//! (`ALLOW_STARTUP_WITHOUT_KEY`), `cache_url` (`CACHE_URL`), `cache_ttl`
//! (`CACHE_TTL`, seconds), `wordnet_dir` (`WORDNET_DIR`) and `log_level`
//! (`LOG_LEVEL`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),
    #[error("MERRIAM_KEY missing; set it in the environment or config file, or set ALLOW_STARTUP_WITHOUT_KEY=true")]
    MissingApiKey,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub merriam_key: Option<String>,
    #[serde(default)]
    pub allow_startup_without_key: bool,
    #[serde(default)]
    pub cache_url: Option<String>,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u64,
    #[serde(default = "default_wordnet_dir")]
    pub wordnet_dir: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_cache_ttl() -> u64 {
    dictionary::DEFAULT_CACHE_TTL.as_secs()
}
fn default_wordnet_dir() -> PathBuf {
    PathBuf::from("wordnet")
}
fn default_log_level() -> String {
    "info".into()
}

impl AppConfig {
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_from(file, None)
    }

    fn load_from(
        file: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(true));
        }
        let config = builder
            .add_source(
                Environment::default()
                    .try_parsing(true)
                    .ignore_empty(true)
                    .source(env),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Refuse to start without a provider key unless explicitly allowed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key().is_none() && !self.allow_startup_without_key {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }

    pub fn api_key(&self) -> Option<&str> {
        self.merriam_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}
