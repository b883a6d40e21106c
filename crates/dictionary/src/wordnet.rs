//! WordNet dict-file reader and the definition normalizer built on top of it.
//!
//! [`WordNet::load`] parses the `index.*` and `data.*` files of a WordNet
//! `dict/` directory once, at startup. Lookups afterwards are pure in-memory
//! map reads.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::{PartOfSpeech, SourceError};

/// Index/data file suffixes in lookup order.
const POS_FILES: &[(&str, &str)] = &[("n", "noun"), ("v", "verb"), ("a", "adj"), ("r", "adv")];

static QUOTED_EXAMPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"]*""#).expect("example pattern must compile"));

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed line {line} in {path}")]
    Parse { path: PathBuf, line: usize },
}

/// One sense of a word: its part-of-speech code and gloss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sense {
    pub pos: String,
    pub gloss: String,
}

/// Anything that can answer "which senses does this word have".
pub trait LexicalDatabase: Send + Sync {
    fn senses(&self, word: &str) -> Result<Vec<Sense>, SourceError>;
}

/// Stand-in used when the database files could not be loaded at startup.
#[derive(Debug, Clone)]
pub struct UnavailableLexicon {
    reason: String,
}

impl UnavailableLexicon {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl LexicalDatabase for UnavailableLexicon {
    fn senses(&self, _word: &str) -> Result<Vec<Sense>, SourceError> {
        Err(SourceError::Unavailable(self.reason.clone()))
    }
}

#[derive(Debug, Default)]
struct PosTable {
    index: HashMap<String, Vec<u64>>,
    data: HashMap<u64, Sense>,
}

#[derive(Debug)]
pub struct WordNet {
    tables: Vec<PosTable>,
}

impl WordNet {
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let dir = dir.as_ref();
        let mut tables = Vec::with_capacity(POS_FILES.len());
        for (_, suffix) in POS_FILES {
            let index_path = dir.join(format!("index.{suffix}"));
            let data_path = dir.join(format!("data.{suffix}"));
            let index = parse_index(&read(&index_path)?, &index_path)?;
            let data = parse_data(&read(&data_path)?, &data_path)?;
            tables.push(PosTable { index, data });
        }
        let lemmas: usize = tables.iter().map(|t| t.index.len()).sum();
        tracing::info!(dir = %dir.display(), lemmas, "loaded WordNet");
        Ok(Self { tables })
    }
}

impl LexicalDatabase for WordNet {
    fn senses(&self, word: &str) -> Result<Vec<Sense>, SourceError> {
        let lemma = word.trim().to_lowercase().replace(' ', "_");
        let mut senses = Vec::new();
        for table in &self.tables {
            let Some(offsets) = table.index.get(&lemma) else {
                continue;
            };
            for offset in offsets {
                let sense = table.data.get(offset).ok_or_else(|| {
                    SourceError::Malformed(format!("synset {offset:08} missing for {lemma}"))
                })?;
                senses.push(sense.clone());
            }
        }
        Ok(senses)
    }
}

fn read(path: &Path) -> Result<String, LexiconError> {
    fs::read_to_string(path).map_err(|source| LexiconError::Io {
        path: path.to_owned(),
        source,
    })
}

// Lines starting with a space are the license header.
fn content_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.is_empty() && !line.starts_with(' '))
        .map(|(n, line)| (n + 1, line))
}

// lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt tagsense_cnt synset_offset...
fn parse_index(text: &str, path: &Path) -> Result<HashMap<String, Vec<u64>>, LexiconError> {
    let mut index = HashMap::new();
    for (line_no, line) in content_lines(text) {
        let malformed = || LexiconError::Parse {
            path: path.to_owned(),
            line: line_no,
        };
        let fields: Vec<&str> = line.split_whitespace().collect();
        let lemma = fields.first().ok_or_else(malformed)?;
        let synset_cnt: usize = field(&fields, 2).ok_or_else(malformed)?;
        let p_cnt: usize = field(&fields, 3).ok_or_else(malformed)?;
        let first_offset = 4 + p_cnt + 2;
        let offsets = fields
            .get(first_offset..first_offset + synset_cnt)
            .ok_or_else(malformed)?
            .iter()
            .map(|raw| raw.parse::<u64>().map_err(|_| malformed()))
            .collect::<Result<Vec<_>, _>>()?;
        index.insert((*lemma).to_owned(), offsets);
    }
    Ok(index)
}

// synset_offset lex_filenum ss_type w_cnt word lex_id ... | gloss
fn parse_data(text: &str, path: &Path) -> Result<HashMap<u64, Sense>, LexiconError> {
    let mut data = HashMap::new();
    for (line_no, line) in content_lines(text) {
        let malformed = || LexiconError::Parse {
            path: path.to_owned(),
            line: line_no,
        };
        let (columns, gloss) = line.split_once('|').ok_or_else(malformed)?;
        let fields: Vec<&str> = columns.split_whitespace().collect();
        let offset: u64 = field(&fields, 0).ok_or_else(malformed)?;
        let pos = fields.get(2).ok_or_else(malformed)?;
        data.insert(
            offset,
            Sense {
                pos: (*pos).to_owned(),
                gloss: definition_from_gloss(gloss),
            },
        );
    }
    Ok(data)
}

fn field<T: std::str::FromStr>(fields: &[&str], at: usize) -> Option<T> {
    fields.get(at)?.parse().ok()
}

/// Strips quoted usage examples, leaving only the definition.
pub(crate) fn definition_from_gloss(gloss: &str) -> String {
    QUOTED_EXAMPLE
        .replace_all(gloss, "")
        .trim()
        .trim_matches(|c| c == ';' || c == ' ')
        .to_owned()
}

/// Definitions for `word` as `"<pos label>: <gloss>"`, in database order.
pub fn fetch_wordnet_definitions(
    db: &dyn LexicalDatabase,
    word: &str,
) -> Result<Vec<String>, SourceError> {
    let senses = db.senses(&word.to_lowercase())?;
    Ok(senses
        .iter()
        .map(|sense| {
            format!(
                "{}: {}",
                PartOfSpeech::from_code(&sense.pos).label(),
                sense.gloss
            )
        })
        .collect())
}
