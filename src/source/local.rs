use chrono::{DateTime, Utc};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::engine::srs;
use crate::source::dictionary::Library;
use crate::source::{SourceError, WordEntry, WordSource};
use crate::store::SharedProgress;

pub const DEFAULT_SESSION_SIZE: usize = 10;

/// Offline word source. Fills a session with words due for review first,
/// then unseen words in random order, then words scheduled soonest.
pub struct LocalWordSource {
    library: Library,
    progress: SharedProgress,
    session_size: usize,
    rng: SmallRng,
}

impl LocalWordSource {
    pub fn new(library: Library, progress: SharedProgress, session_size: usize, rng: SmallRng) -> Self {
        Self {
            library,
            progress,
            session_size: session_size.max(1),
            rng,
        }
    }

    pub fn select(&mut self, dictionary: Option<u64>, now: DateTime<Utc>) -> Result<Vec<WordEntry>, SourceError> {
        let book = self
            .progress
            .lock()
            .map_err(|_| SourceError::Unavailable("progress store lock poisoned".to_string()))?;

        let mut due = Vec::new();
        let mut fresh = Vec::new();
        let mut ahead = Vec::new();
        for word in self.library.words(dictionary) {
            match book.get(word.id) {
                None => fresh.push(word.clone()),
                Some(progress) if srs::is_due(progress, now) => {
                    due.push((progress.next_review_at, word.clone()));
                }
                Some(progress) => ahead.push((progress.next_review_at, word.clone())),
            }
        }
        drop(book);

        due.sort_by_key(|(at, _)| *at);
        ahead.sort_by_key(|(at, _)| *at);
        fresh.shuffle(&mut self.rng);

        let size = self.session_size;
        let mut session: Vec<WordEntry> = due.into_iter().map(|(_, w)| w).take(size).collect();
        let remaining = size - session.len();
        session.extend(fresh.into_iter().take(remaining));
        let remaining = size - session.len();
        session.extend(ahead.into_iter().map(|(_, w)| w).take(remaining));

        tracing::debug!(dictionary = ?dictionary, words = session.len(), "selected local session");
        Ok(session)
    }
}

impl WordSource for LocalWordSource {
    fn fetch_session_words(&mut self, dictionary: Option<u64>) -> Result<Vec<WordEntry>, SourceError> {
        if let Some(id) = dictionary
            && self.library.get(id).is_none()
        {
            return Err(SourceError::Unavailable(format!("unknown dictionary {id}")));
        }
        self.select(dictionary, Utc::now())
    }

    fn describe(&self) -> String {
        format!("local library ({} dictionaries)", self.library.dictionaries().len())
    }
}
