use std::time::Duration;

use reqwest::Url;
use serde_json::Value;

use crate::{DictionaryError, PhoneticEntry, PronunciationInfo, SourceError};

pub const COLLEGIATE_API_URL: &str =
    "https://www.dictionaryapi.com/api/v3/references/collegiate/json/";
pub const AUDIO_CDN_URL: &str = "https://media.merriam-webster.com/audio/prons/en/us/mp3";
pub const PRONUNCIATION_TIMEOUT: Duration = Duration::from_secs(8);

#[derive(Debug, Clone)]
pub(crate) struct PronunciationClient {
    client: reqwest::Client,
    endpoint: Url,
    audio_base: String,
}

impl PronunciationClient {
    pub(crate) fn new(
        client: reqwest::Client,
        endpoint: &str,
        audio_base: &str,
    ) -> Result<Self, DictionaryError> {
        Ok(Self {
            client,
            endpoint: parse_base(endpoint)?,
            audio_base: audio_base.trim_end_matches('/').to_owned(),
        })
    }

    /// Phonetic spellings and audio for `word`. Without an API key this is
    /// an empty result, not an error.
    pub(crate) async fn fetch(
        &self,
        word: &str,
        api_key: Option<&str>,
    ) -> Result<PronunciationInfo, SourceError> {
        let Some(key) = api_key else {
            tracing::debug!(word, "no provider key, skipping pronunciation");
            return Ok(PronunciationInfo::default());
        };
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::Malformed("endpoint cannot be a base".into()))?
            .pop_if_empty()
            .push(word);
        let res = self
            .client
            .get(url)
            .query(&[("key", key)])
            .timeout(PRONUNCIATION_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        let body: Value = res.json().await?;
        Ok(parse_pronunciations(&body, &self.audio_base))
    }
}

pub(crate) fn parse_base(raw: &str) -> Result<Url, DictionaryError> {
    Url::parse(raw).map_err(|e| DictionaryError::InvalidUrl(format!("{raw}: {e}")))
}

/// Reads `[{"hwi": {"prs": [{"mw": .., "sound": {"audio": ..}}]}}, ..]`.
/// Anything else yields an empty result.
pub fn parse_pronunciations(body: &Value, audio_base: &str) -> PronunciationInfo {
    let entry = body
        .as_array()
        .and_then(|entries| entries.iter().find(|entry| entry.is_object()));
    let Some(entry) = entry else {
        return PronunciationInfo::default();
    };
    let prs = entry
        .pointer("/hwi/prs")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let phonetics = prs
        .iter()
        .filter_map(|pr| {
            let text = pr
                .get("mw")
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
                .map(str::to_owned);
            let audio = pr
                .pointer("/sound/audio")
                .and_then(Value::as_str)
                .and_then(|file| audio_url(audio_base, file));
            PhoneticEntry::new(text, audio)
        })
        .collect();
    PronunciationInfo { phonetics }
}

/// `{base}/{first char of file}/{file}.mp3`
pub fn audio_url(base: &str, file: &str) -> Option<String> {
    let subdir = file.chars().next()?;
    Some(format!("{base}/{subdir}/{file}.mp3"))
}
