use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::source::WordId;

const SCHEMA_VERSION: u32 = 1;

pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Per-word learning record kept by the local word source and result sink.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WordProgress {
    pub word_id: WordId,
    pub attempts: u32,
    pub successes: u32,
    #[serde(default)]
    pub last_played_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_review_at: Option<DateTime<Utc>>,
    #[serde(default = "default_interval_days")]
    pub interval_days: f64,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    #[serde(default)]
    pub srs_stage: u32,
}

fn default_interval_days() -> f64 {
    1.0
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

impl WordProgress {
    pub fn new(word_id: WordId) -> Self {
        Self {
            word_id,
            attempts: 0,
            successes: 0,
            last_played_at: None,
            next_review_at: None,
            interval_days: default_interval_days(),
            ease_factor: default_ease_factor(),
            srs_stage: 0,
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        self.successes as f64 / self.attempts as f64
    }

    /// Mastered once seen at least three times with 80% or better.
    pub fn is_mastered(&self) -> bool {
        self.attempts >= 3 && self.success_rate() >= 0.8
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressData {
    pub schema_version: u32,
    #[serde(default)]
    pub words: BTreeMap<WordId, WordProgress>,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            words: BTreeMap::new(),
        }
    }
}

impl ProgressData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    pub fn get(&self, id: WordId) -> Option<&WordProgress> {
        self.words.get(&id)
    }

    pub fn mastered_count(&self) -> usize {
        self.words.values().filter(|p| p.is_mastered()).count()
    }

    pub fn learning_count(&self) -> usize {
        self.words.values().filter(|p| !p.is_mastered()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mastery_needs_three_attempts() {
        let mut progress = WordProgress::new(WordId(3));
        progress.attempts = 2;
        progress.successes = 2;
        assert!(!progress.is_mastered());
        progress.attempts = 5;
        progress.successes = 4;
        assert!(progress.is_mastered());
    }

    #[test]
    fn test_progress_defaults_from_sparse_json() {
        let json = r#"{"schema_version":1,"words":{"9":{"word_id":9,"attempts":1,"successes":0}}}"#;
        let data: ProgressData = serde_json::from_str(json).unwrap();
        let progress = data.get(WordId(9)).unwrap();
        assert_eq!(progress.ease_factor, DEFAULT_EASE_FACTOR);
        assert_eq!(progress.interval_days, 1.0);
        assert!(progress.next_review_at.is_none());
        assert_eq!(data.learning_count(), 1);
    }
}
