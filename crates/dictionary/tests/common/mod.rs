#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use dictionary::{
    CacheError, Dictionary, DictionaryOptions, LexicalDatabase, LookupCache, UnavailableLexicon,
    WordNet,
};
use tempfile::TempDir;
use wiremock::MockServer;

pub const AUDIO_BASE: &str = "https://cdn.test/mp3";

pub fn options(server: &MockServer, api_key: Option<&str>) -> DictionaryOptions {
    DictionaryOptions {
        api_key: api_key.map(str::to_owned),
        pronunciation_url: format!("{}/collegiate/", server.uri()),
        audio_url: AUDIO_BASE.to_owned(),
        easton_url: format!("{}/easton/", server.uri()),
        request_timeout: Duration::from_secs(5),
        ..DictionaryOptions::default()
    }
}

pub fn dictionary(options: DictionaryOptions, lexicon: Arc<dyn LexicalDatabase>) -> Dictionary {
    Dictionary::new(options, lexicon).expect("dictionary should build")
}

pub fn no_lexicon() -> Arc<dyn LexicalDatabase> {
    Arc::new(UnavailableLexicon::new("not loaded in this test"))
}

struct Synset<'a> {
    offset: u64,
    ss_type: &'a str,
    lemma: &'a str,
    gloss: &'a str,
}

const NOUNS: &[Synset] = &[
    Synset { offset: 100, ss_type: "n", lemma: "grace", gloss: "elegance and beauty of movement or expression" },
    Synset { offset: 200, ss_type: "n", lemma: "grace", gloss: "a short prayer of thanks before a meal; \"they always said grace\"" },
    Synset { offset: 300, ss_type: "n", lemma: "ice_cream", gloss: "frozen dessert containing cream and sugar and flavoring" },
];
const VERBS: &[Synset] = &[
    Synset { offset: 400, ss_type: "v", lemma: "grace", gloss: "make more attractive by adding ornament, colour, etc.; \"Beautiful paintings graced the halls\"" },
];
const ADJECTIVES: &[Synset] = &[
    Synset { offset: 500, ss_type: "s", lemma: "fast", gloss: "acting or moving or capable of acting or moving quickly; \"fast film\"" },
];
const ADVERBS: &[Synset] = &[
    Synset { offset: 600, ss_type: "r", lemma: "fast", gloss: "quickly or rapidly; \"run fast\"" },
];

/// A miniature WordNet `dict/` directory.
pub fn wordnet_fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    write_pos(dir.path(), "noun", "n", NOUNS);
    write_pos(dir.path(), "verb", "v", VERBS);
    write_pos(dir.path(), "adj", "a", ADJECTIVES);
    write_pos(dir.path(), "adv", "r", ADVERBS);
    dir
}

pub fn wordnet() -> (TempDir, Arc<dyn LexicalDatabase>) {
    let dir = wordnet_fixture();
    let db: Arc<dyn LexicalDatabase> =
        Arc::new(WordNet::load(dir.path()).expect("fixture should load"));
    (dir, db)
}

fn write_pos(dir: &Path, suffix: &str, pos: &str, synsets: &[Synset]) {
    let header = "  1 This software and database is being provided to you, the LICENSEE\n";

    let mut data = String::from(header);
    let mut lemmas: Vec<&str> = Vec::new();
    let mut offsets: HashMap<&str, Vec<u64>> = HashMap::new();
    for synset in synsets {
        data.push_str(&format!(
            "{:08} 00 {} 01 {} 0 000 | {}  \n",
            synset.offset, synset.ss_type, synset.lemma, synset.gloss
        ));
        if !offsets.contains_key(synset.lemma) {
            lemmas.push(synset.lemma);
        }
        offsets.entry(synset.lemma).or_default().push(synset.offset);
    }

    let mut index = String::from(header);
    for lemma in lemmas {
        let list = &offsets[lemma];
        let rendered: Vec<String> = list.iter().map(|o| format!("{o:08}")).collect();
        index.push_str(&format!(
            "{lemma} {pos} {n} 1 @ {n} 0 {}  \n",
            rendered.join(" "),
            n = list.len()
        ));
    }

    fs::write(dir.join(format!("data.{suffix}")), data).expect("write data file");
    fs::write(dir.join(format!("index.{suffix}")), index).expect("write index file");
}

#[derive(Default)]
pub struct MemoryCache {
    pub entries: Mutex<HashMap<String, String>>,
    pub ttls: Mutex<Vec<Duration>>,
}

#[async_trait]
impl LookupCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        self.ttls.lock().unwrap().push(ttl);
        Ok(())
    }
}

pub struct BrokenCache;

#[async_trait]
impl LookupCache for BrokenCache {
    async fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
        Err(CacheError::Backend("connection refused".into()))
    }

    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection refused".into()))
    }
}

pub const EASTON_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Grace - Easton's Bible Dictionary</title></head>
<body>
  <header><p>Bible Gateway navigation header with plenty of links and text</p></header>
  <div class="resource-content">
    <h1>Grace</h1>
    <p>Grace (1.) Of form or person (Prov. 1:9; 3:22; Ps. 45:2). (2.) Favour, kindness, friendship (Gen. 6:8; 18:3; 19:19).</p>
    <p>Second paragraph that should never be returned by the extractor.</p>
  </div>
  <footer><p>BibleGateway.com Copyright 2024 All rights reserved.</p></footer>
</body>
</html>"#;

pub const EASTON_TEXT: &str =
    "(1.) Of form or person (Prov. 1:9; 3:22; Ps. 45:2). (2.) Favour, kindness, friendship (Gen. 6:8; 18:3; 19:19).";
