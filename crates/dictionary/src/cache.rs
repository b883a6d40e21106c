use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
    #[error("cached value could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key/value store with per-entry expiry. Optional everywhere it is used.
#[async_trait]
pub trait LookupCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

pub fn cache_key(word: &str) -> String {
    format!("define:{}", word.to_lowercase())
}
