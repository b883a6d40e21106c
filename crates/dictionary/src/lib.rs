use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

mod cache;
mod dictionary;
mod easton;
pub mod extract;
mod pronunciation;
mod wordnet;

pub use cache::{cache_key, CacheError, LookupCache, DEFAULT_CACHE_TTL};
pub use dictionary::{DefinitionSet, LookupResult, PartOfSpeech, PhoneticEntry, PronunciationInfo};
pub use easton::{capitalize, EASTON_URL};
pub use pronunciation::{audio_url, parse_pronunciations, AUDIO_CDN_URL, COLLEGIATE_API_URL};
pub use wordnet::{
    fetch_wordnet_definitions, LexicalDatabase, LexiconError, Sense, UnavailableLexicon, WordNet,
};

use easton::EastonClient;
use pronunciation::PronunciationClient;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Why one source contributed nothing. Never surfaced by [`Dictionary`].
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("upstream returned {0}")]
    Status(StatusCode),
    #[error("malformed upstream data: {0}")]
    Malformed(String),
    #[error("source unavailable: {0}")]
    Unavailable(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("word must not be empty")]
    InvalidWord,
    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("invalid url {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone)]
pub struct DictionaryOptions {
    pub api_key: Option<String>,
    pub pronunciation_url: String,
    pub audio_url: String,
    pub easton_url: String,
    pub user_agent: String,
    /// Ceiling for each source fetch, on top of the per-call timeouts.
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
}

impl Default for DictionaryOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            pronunciation_url: COLLEGIATE_API_URL.to_owned(),
            audio_url: AUDIO_CDN_URL.to_owned(),
            easton_url: EASTON_URL.to_owned(),
            user_agent: concat!("dictionary/", env!("CARGO_PKG_VERSION")).to_owned(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
        }
    }
}

pub struct Dictionary {
    pronunciation: PronunciationClient,
    easton: EastonClient,
    lexicon: Arc<dyn LexicalDatabase>,
    cache: Option<Arc<dyn LookupCache>>,
    api_key: Option<String>,
    request_timeout: Duration,
    cache_ttl: Duration,
}

impl Dictionary {
    pub fn new(
        options: DictionaryOptions,
        lexicon: Arc<dyn LexicalDatabase>,
    ) -> Result<Self, DictionaryError> {
        let client = reqwest::Client::builder()
            .user_agent(&options.user_agent)
            .build()?;
        Ok(Self {
            pronunciation: PronunciationClient::new(
                client.clone(),
                &options.pronunciation_url,
                &options.audio_url,
            )?,
            easton: EastonClient::new(client, &options.easton_url)?,
            lexicon,
            cache: None,
            api_key: options.api_key,
            request_timeout: options.request_timeout,
            cache_ttl: options.cache_ttl,
        })
    }

    pub fn with_cache(mut self, cache: Arc<dyn LookupCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Cached lookup with the configured provider key.
    pub async fn lookup(&self, word: &str) -> Result<LookupResult, DictionaryError> {
        let word = validate(word)?;
        let Some(cache) = &self.cache else {
            return self.aggregate(word, self.api_key.as_deref()).await;
        };

        let key = cache_key(word);
        match cache.get(&key).await {
            Ok(Some(raw)) => match serde_json::from_str::<LookupResult>(&raw) {
                Ok(result) => {
                    tracing::debug!(word, "cache hit");
                    return Ok(result);
                }
                Err(error) => tracing::warn!(word, %error, "ignoring unreadable cache entry"),
            },
            Ok(None) => tracing::debug!(word, "cache miss"),
            Err(error) => tracing::warn!(word, %error, "cache read failed"),
        }

        let result = self.aggregate(word, self.api_key.as_deref()).await?;
        if let Err(error) = self.store(cache.as_ref(), &key, &result).await {
            tracing::warn!(word, %error, "cache write failed");
        }
        Ok(result)
    }

    /// Query every source once and merge whatever came back. Source failures
    /// only leave their part of the result empty.
    pub async fn aggregate(
        &self,
        word: &str,
        api_key: Option<&str>,
    ) -> Result<LookupResult, DictionaryError> {
        let word = validate(word)?;
        tracing::info!(word, "fetching definitions");

        let (pronunciation, wordnet, easton) = futures::join!(
            self.bounded(self.pronunciation.fetch(word, api_key)),
            self.bounded(async { fetch_wordnet_definitions(self.lexicon.as_ref(), word) }),
            self.bounded(self.easton.fetch(word)),
        );

        let mut result = LookupResult::empty(word);
        match pronunciation {
            Ok(info) if !info.is_empty() => result.pronunciation = info,
            Ok(_) => tracing::info!(word, "no pronunciation found"),
            Err(error) => tracing::warn!(word, %error, "pronunciation source failed"),
        }
        match wordnet {
            Ok(definitions) if !definitions.is_empty() => result.definitions.wordnet = definitions,
            Ok(_) => tracing::info!(word, "no definitions found in WordNet"),
            Err(error) => tracing::warn!(word, %error, "WordNet lookup failed"),
        }
        match easton {
            Ok(Some(text)) => result.definitions.easton = Some(text),
            Ok(None) => tracing::info!(word, "no definition found in Easton's"),
            Err(error) => tracing::warn!(word, %error, "Easton's fetch failed"),
        }
        Ok(result)
    }

    async fn bounded<T>(
        &self,
        fetch: impl Future<Output = Result<T, SourceError>>,
    ) -> Result<T, SourceError> {
        tokio::time::timeout(self.request_timeout, fetch)
            .await
            .map_err(|_| SourceError::Timeout(self.request_timeout))?
    }

    async fn store(
        &self,
        cache: &dyn LookupCache,
        key: &str,
        result: &LookupResult,
    ) -> Result<(), CacheError> {
        let raw = serde_json::to_string(result)?;
        cache.set(key, &raw, self.cache_ttl).await
    }
}

fn validate(word: &str) -> Result<&str, DictionaryError> {
    let word = word.trim();
    if word.is_empty() {
        return Err(DictionaryError::InvalidWord);
    }
    Ok(word)
}
