use std::time::Duration;

use reqwest::{StatusCode, Url};

use crate::extract::extract;
use crate::pronunciation::parse_base;
use crate::{DictionaryError, SourceError};

pub const EASTON_URL: &str = "https://www.biblegateway.com/resources/eastons-bible-dictionary/";
pub const EASTON_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub(crate) struct EastonClient {
    client: reqwest::Client,
    base: Url,
}

impl EastonClient {
    pub(crate) fn new(client: reqwest::Client, base: &str) -> Result<Self, DictionaryError> {
        Ok(Self {
            client,
            base: parse_base(base)?,
        })
    }

    pub(crate) fn entry_url(&self, word: &str) -> Result<Url, SourceError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::Malformed("base url cannot be a base".into()))?
            .pop_if_empty()
            .push(&capitalize(word));
        Ok(url)
    }

    /// Entry text for `word`, or `None` when the page had nothing usable.
    pub(crate) async fn fetch(&self, word: &str) -> Result<Option<String>, SourceError> {
        let url = self.entry_url(word)?;
        let res = self
            .client
            .get(url)
            .timeout(EASTON_TIMEOUT)
            .send()
            .await?;
        let status = res.status();
        if status != StatusCode::OK {
            return Err(SourceError::Status(status));
        }
        let html = res.text().await?;
        let text = extract(&html, word);
        tracing::debug!(word, found = text.is_some(), "extracted easton entry");
        Ok(text)
    }
}

/// First character upper case, the rest lower case.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
