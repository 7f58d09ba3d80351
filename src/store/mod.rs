pub mod json_store;
pub mod schema;

use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::engine::srs;
use crate::source::WordId;
use crate::store::json_store::JsonStore;
use crate::store::schema::{ProgressData, WordProgress};

/// Progress records plus the store they persist to. Without a store the book
/// keeps records in memory only.
pub struct ProgressBook {
    store: Option<JsonStore>,
    data: ProgressData,
}

pub type SharedProgress = Arc<Mutex<ProgressBook>>;

impl ProgressBook {
    pub fn open(store: Option<JsonStore>) -> Self {
        let data = store
            .as_ref()
            .map(JsonStore::load_progress)
            .unwrap_or_default();
        Self { store, data }
    }

    pub fn in_memory(data: ProgressData) -> Self {
        Self { store: None, data }
    }

    pub fn shared(self) -> SharedProgress {
        Arc::new(Mutex::new(self))
    }

    pub fn get(&self, id: WordId) -> Option<&WordProgress> {
        self.data.get(id)
    }

    pub fn record(&mut self, id: WordId, success: bool, now: DateTime<Utc>) -> Result<&WordProgress> {
        let current = self
            .data
            .words
            .get(&id)
            .cloned()
            .unwrap_or_else(|| WordProgress::new(id));
        let updated = srs::calculate_review(&current, success, now);
        self.data.words.insert(id, updated);

        if let Some(store) = &self.store {
            store.save_progress(&self.data)?;
        }
        Ok(&self.data.words[&id])
    }
}
