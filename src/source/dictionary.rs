use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use crate::source::WordEntry;

#[derive(Embed)]
#[folder = "assets/dictionaries/"]
struct DictionaryAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Dictionary {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub words: Vec<WordEntry>,
}

fn default_true() -> bool {
    true
}

impl Dictionary {
    fn from_json(content: &str) -> Option<Self> {
        let mut dictionary: Dictionary = serde_json::from_str(content).ok()?;
        for word in &mut dictionary.words {
            word.dictionary_id = Some(dictionary.id);
        }
        Some(dictionary)
    }
}

/// Builtin dictionaries, overridden by same-id files in the user dictionary dir.
#[derive(Clone, Debug, Default)]
pub struct Library {
    dictionaries: Vec<Dictionary>,
}

impl Library {
    pub fn load() -> Self {
        Self::load_with_user_dir(user_dictionary_dir().as_deref())
    }

    pub fn load_with_user_dir(user_dir: Option<&Path>) -> Self {
        let mut by_id: BTreeMap<u64, Dictionary> = BTreeMap::new();

        for file in DictionaryAssets::iter() {
            let Some(asset) = DictionaryAssets::get(&file) else {
                continue;
            };
            match std::str::from_utf8(asset.data.as_ref())
                .ok()
                .and_then(Dictionary::from_json)
            {
                Some(dictionary) => {
                    by_id.insert(dictionary.id, dictionary);
                }
                None => tracing::warn!(file = %file, "skipping unreadable builtin dictionary"),
            }
        }

        if let Some(dir) = user_dir
            && let Ok(entries) = fs::read_dir(dir)
        {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_none_or(|ext| ext != "json") {
                    continue;
                }
                match fs::read_to_string(&path)
                    .ok()
                    .and_then(|content| Dictionary::from_json(&content))
                {
                    Some(dictionary) => {
                        tracing::debug!(id = dictionary.id, path = %path.display(), "loaded user dictionary");
                        by_id.insert(dictionary.id, dictionary);
                    }
                    None => tracing::warn!(path = %path.display(), "skipping unreadable user dictionary"),
                }
            }
        }

        Self {
            dictionaries: by_id.into_values().collect(),
        }
    }

    pub fn from_dictionaries(dictionaries: Vec<Dictionary>) -> Self {
        Self { dictionaries }
    }

    pub fn dictionaries(&self) -> &[Dictionary] {
        &self.dictionaries
    }

    pub fn get(&self, id: u64) -> Option<&Dictionary> {
        self.dictionaries.iter().find(|d| d.id == id)
    }

    /// Words of active dictionaries, optionally restricted to one dictionary.
    pub fn words(&self, filter: Option<u64>) -> impl Iterator<Item = &WordEntry> {
        self.dictionaries
            .iter()
            .filter(move |d| d.is_active && filter.is_none_or(|id| d.id == id))
            .flat_map(|d| d.words.iter())
    }
}

pub fn user_dictionary_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("wordfall").join("dictionaries"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_dictionaries_load() {
        let library = Library::load_with_user_dir(None);
        assert!(!library.dictionaries().is_empty());
        for dictionary in library.dictionaries() {
            assert!(!dictionary.words.is_empty(), "{} is empty", dictionary.name);
            assert!(
                dictionary
                    .words
                    .iter()
                    .all(|w| w.dictionary_id == Some(dictionary.id))
            );
        }
    }

    #[test]
    fn test_builtin_word_ids_are_unique() {
        let library = Library::load_with_user_dir(None);
        let mut ids: Vec<_> = library.words(None).map(|w| w.id).collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_user_dictionary_overrides_builtin() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("custom.json"),
            r#"{"id":1,"name":"Mine","words":[{"id":9001,"text":"zephyr","definition":"a gentle breeze"}]}"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let library = Library::load_with_user_dir(Some(dir.path()));
        let mine = library.get(1).unwrap();
        assert_eq!(mine.name, "Mine");
        assert_eq!(library.words(Some(1)).count(), 1);
    }

    #[test]
    fn test_inactive_dictionaries_are_skipped() {
        let library = Library::from_dictionaries(vec![Dictionary {
            id: 5,
            name: "Hidden".to_string(),
            description: String::new(),
            is_active: false,
            words: vec![WordEntry::new(1, "ghost", "a spirit")],
        }]);
        assert_eq!(library.words(None).count(), 0);
    }
}
