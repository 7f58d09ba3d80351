use std::collections::{HashSet, VecDeque};

use crate::source::WordEntry;

/// Correct answers needed before a word leaves the session.
pub const STAGES_PER_WORD: u8 = 2;

struct SessionWord {
    word: WordEntry,
    stage: u8,
}

/// A dequeued word: its slot in the session plus a copy of the entry.
#[derive(Clone, Debug)]
pub struct QueueTicket {
    pub slot: usize,
    pub word: WordEntry,
    pub stage: u8,
}

/// Round-robin work queue. Stages belong to the word, not to the queue entry,
/// so a word queued twice (once from a failure, once from a success) still
/// finishes after two correct answers. Entries for finished words are dropped
/// when they reach the front.
pub struct SessionQueue {
    words: Vec<SessionWord>,
    order: VecDeque<usize>,
    completed_ops: u32,
}

impl SessionQueue {
    /// Duplicate ids keep their first occurrence.
    pub fn new(entries: Vec<WordEntry>) -> Self {
        let mut seen = HashSet::new();
        let words: Vec<SessionWord> = entries
            .into_iter()
            .filter(|w| {
                let fresh = seen.insert(w.id);
                if !fresh {
                    tracing::warn!(id = %w.id, "dropping duplicate session word");
                }
                fresh
            })
            .map(|word| SessionWord { word, stage: 0 })
            .collect();
        let order = (0..words.len()).collect();
        Self {
            words,
            order,
            completed_ops: 0,
        }
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn total_ops(&self) -> u32 {
        self.words.len() as u32 * STAGES_PER_WORD as u32
    }

    pub fn completed_ops(&self) -> u32 {
        self.completed_ops
    }

    fn is_live(&self, slot: usize) -> bool {
        self.words[slot].stage < STAGES_PER_WORD
    }

    /// Entries still waiting to be played.
    pub fn len(&self) -> usize {
        self.order.iter().filter(|&&slot| self.is_live(slot)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dequeue(&mut self) -> Option<QueueTicket> {
        while let Some(slot) = self.order.pop_front() {
            if self.is_live(slot) {
                let entry = &self.words[slot];
                return Some(QueueTicket {
                    slot,
                    word: entry.word.clone(),
                    stage: entry.stage,
                });
            }
        }
        None
    }

    pub fn requeue(&mut self, slot: usize) {
        if self.is_live(slot) {
            self.order.push_back(slot);
        }
    }

    /// Advance the word one stage. It goes back to the tail until it has
    /// been answered correctly at every stage. Returns the new stage.
    pub fn record_success(&mut self, slot: usize) -> u8 {
        debug_assert!(self.is_live(slot), "success recorded for a finished word");
        let entry = &mut self.words[slot];
        entry.stage = (entry.stage + 1).min(STAGES_PER_WORD);
        let stage = entry.stage;
        self.completed_ops = (self.completed_ops + 1).min(self.total_ops());
        if stage < STAGES_PER_WORD {
            self.order.push_back(slot);
        }
        stage
    }

    pub fn stage_of(&self, slot: usize) -> u8 {
        self.words[slot].stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(texts: &[&str]) -> SessionQueue {
        SessionQueue::new(
            texts
                .iter()
                .enumerate()
                .map(|(i, t)| WordEntry::new(i as u64 + 1, t, "def"))
                .collect(),
        )
    }

    #[test]
    fn test_total_ops_is_twice_word_count() {
        let q = queue(&["cat", "dog", "owl"]);
        assert_eq!(q.total_ops(), 6);
        assert_eq!(q.completed_ops(), 0);
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn test_two_successes_remove_word() {
        let mut q = queue(&["cat"]);
        let first = q.dequeue().unwrap();
        assert_eq!(first.stage, 0);
        assert_eq!(q.record_success(first.slot), 1);
        assert_eq!(q.len(), 1);

        let second = q.dequeue().unwrap();
        assert_eq!(second.stage, 1);
        assert_eq!(q.record_success(second.slot), 2);
        assert!(q.is_empty());
        assert!(q.dequeue().is_none());
        assert_eq!(q.completed_ops(), 2);
    }

    #[test]
    fn test_round_robin_order() {
        let mut q = queue(&["a", "b"]);
        let a = q.dequeue().unwrap();
        q.record_success(a.slot);
        let b = q.dequeue().unwrap();
        assert_eq!(b.word.text, "b");
        q.record_success(b.slot);
        assert_eq!(q.dequeue().unwrap().word.text, "a");
    }

    #[test]
    fn test_duplicate_entries_never_overcount() {
        let mut q = queue(&["cat"]);
        let ticket = q.dequeue().unwrap();
        // failure requeues, then the retry succeeds and requeues again
        q.requeue(ticket.slot);
        q.record_success(ticket.slot);
        assert_eq!(q.len(), 2);

        let again = q.dequeue().unwrap();
        assert_eq!(again.stage, 1);
        q.record_success(again.slot);

        // the other entry belongs to a finished word
        assert!(q.is_empty());
        assert!(q.dequeue().is_none());
        assert_eq!(q.completed_ops(), q.total_ops());
    }

    #[test]
    fn test_duplicate_ids_are_dropped() {
        let q = SessionQueue::new(vec![
            WordEntry::new(1, "cat", "def"),
            WordEntry::new(1, "cat", "def"),
            WordEntry::new(2, "dog", "def"),
        ]);
        assert_eq!(q.word_count(), 2);
        assert_eq!(q.total_ops(), 4);
    }
}
