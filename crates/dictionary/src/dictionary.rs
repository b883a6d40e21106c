use serde::{Deserialize, Serialize};

/// Aggregated answer for a single word. Every field is always present when
/// serialized, no matter how many sources contributed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub word: String,
    pub pronunciation: PronunciationInfo,
    pub definitions: DefinitionSet,
}

impl LookupResult {
    pub fn empty(word: &str) -> Self {
        Self {
            word: word.to_owned(),
            ..Default::default()
        }
    }

    pub fn total_definitions(&self) -> usize {
        self.definitions.wordnet.len() + usize::from(self.definitions.easton.is_some())
    }
}


#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PronunciationInfo {
    pub phonetics: Vec<PhoneticEntry>,
}

impl PronunciationInfo {
    pub fn is_empty(&self) -> bool {
        self.phonetics.is_empty()
    }
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneticEntry {
    pub text: Option<String>,
    pub audio: Option<String>,
}

impl PhoneticEntry {
    /// Returns `None` when there is neither a respelling nor an audio URL.
    pub fn new(text: Option<String>, audio: Option<String>) -> Option<Self> {
        if text.is_none() && audio.is_none() {
            return None;
        }
        Some(Self { text, audio })
    }
}


#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionSet {
    pub wordnet: Vec<String>,
    pub easton: Option<String>,
}


/// Synset part of speech as encoded in the lexical database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartOfSpeech {
    Noun,
    Verb,
    Adjective,
    AdjectiveSatellite,
    Adverb,
    Other(String),
}

impl PartOfSpeech {
    pub fn from_code(code: &str) -> Self {
        match code {
            "n" => PartOfSpeech::Noun,
            "v" => PartOfSpeech::Verb,
            "a" => PartOfSpeech::Adjective,
            "s" => PartOfSpeech::AdjectiveSatellite,
            "r" => PartOfSpeech::Adverb,
            other => PartOfSpeech::Other(other.to_owned()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Adjective => "adjective",
            PartOfSpeech::AdjectiveSatellite => "adjective satellite",
            PartOfSpeech::Adverb => "adverb",
            PartOfSpeech::Other(code) => code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_labels() {
        assert_eq!(PartOfSpeech::from_code("n").label(), "noun");
        assert_eq!(PartOfSpeech::from_code("v").label(), "verb");
        assert_eq!(PartOfSpeech::from_code("a").label(), "adjective");
        assert_eq!(PartOfSpeech::from_code("s").label(), "adjective satellite");
        assert_eq!(PartOfSpeech::from_code("r").label(), "adverb");
    }

    #[test]
    fn unknown_codes_pass_through() {
        assert_eq!(PartOfSpeech::from_code("x").label(), "x");
    }

    #[test]
    fn empty_result_serializes_every_field() {
        let json = serde_json::to_value(LookupResult::empty("grace")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "word": "grace",
                "pronunciation": { "phonetics": [] },
                "definitions": { "wordnet": [], "easton": null }
            })
        );
    }

    #[test]
    fn phonetic_entry_requires_text_or_audio() {
        assert!(PhoneticEntry::new(None, None).is_none());
        assert!(PhoneticEntry::new(Some("ˈgrās".into()), None).is_some());
        assert!(PhoneticEntry::new(None, Some("https://x/a.mp3".into())).is_some());
    }
}
