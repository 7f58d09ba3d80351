pub mod dictionary;
#[cfg(feature = "network")]
pub mod http;
pub mod local;

use std::fmt;

use icu_normalizer::ComposingNormalizerBorrowed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(pub u64);

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub id: WordId,
    pub text: String,
    pub definition: String,
    #[serde(default)]
    pub difficulty: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dictionary_id: Option<u64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pronunciation_url: String,
}

impl WordEntry {
    pub fn new(id: u64, text: &str, definition: &str) -> Self {
        Self {
            id: WordId(id),
            text: text.to_string(),
            definition: definition.to_string(),
            difficulty: 1,
            dictionary_id: None,
            pronunciation_url: String::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("word source unavailable: {0}")]
    Unavailable(String),
    #[error("no words available for this session")]
    Empty,
    #[error("malformed word list: {0}")]
    Malformed(String),
}

/// Supplies the ordered word list for one session.
pub trait WordSource {
    fn fetch_session_words(&mut self, dictionary: Option<u64>) -> Result<Vec<WordEntry>, SourceError>;

    fn describe(&self) -> String;
}

/// Fetch, reject empty lists, and normalize every entry.
pub fn fetch_session(
    source: &mut dyn WordSource,
    dictionary: Option<u64>,
) -> Result<Vec<WordEntry>, SourceError> {
    let words = source.fetch_session_words(dictionary)?;
    if words.is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(words.into_iter().map(normalize_entry).collect())
}

/// NFC-compose text and definition so one visible glyph maps to one slot.
pub fn normalize_entry(mut entry: WordEntry) -> WordEntry {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    entry.text = nfc.normalize(entry.text.trim()).to_string();
    entry.definition = nfc.normalize(entry.definition.trim()).to_string();
    entry
}
