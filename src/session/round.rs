use std::collections::BTreeSet;

use crate::session::queue::QueueTicket;
use crate::source::WordEntry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    Presenting,
    Collecting,
    Evaluating,
    Success,
    RetryPending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
}

/// State of the word currently on the board. Slots outside `mask` are
/// prefilled with the target character and never change.
pub struct RoundState {
    pub word: WordEntry,
    pub slot: usize,
    pub stage: u8,
    pub target: Vec<char>,
    pub mask: BTreeSet<usize>,
    pub input: Vec<Option<char>>,
    pub busy: bool,
    pub waiting_for_retry: bool,
    pub retry_offered: bool,
    pub verdict: Option<Verdict>,
    presenting: bool,
    requeued: bool,
}

impl RoundState {
    pub fn new(ticket: QueueTicket, mask: BTreeSet<usize>) -> Self {
        let target: Vec<char> = ticket.word.text.chars().collect();
        let input = target
            .iter()
            .enumerate()
            .map(|(i, &ch)| if mask.contains(&i) { None } else { Some(ch) })
            .collect();
        Self {
            word: ticket.word,
            slot: ticket.slot,
            stage: ticket.stage,
            target,
            mask,
            input,
            busy: false,
            waiting_for_retry: false,
            retry_offered: false,
            verdict: None,
            presenting: true,
            requeued: false,
        }
    }

    pub fn begin_collecting(&mut self) {
        self.presenting = false;
    }

    pub fn phase(&self) -> RoundPhase {
        if self.presenting {
            RoundPhase::Presenting
        } else if self.verdict == Some(Verdict::Correct) {
            RoundPhase::Success
        } else if self.waiting_for_retry {
            RoundPhase::RetryPending
        } else if self.busy {
            RoundPhase::Evaluating
        } else {
            RoundPhase::Collecting
        }
    }

    pub fn accepts_input(&self) -> bool {
        !self.presenting && !self.busy && !self.waiting_for_retry
    }

    pub fn is_masked(&self, idx: usize) -> bool {
        self.mask.contains(&idx)
    }

    pub fn is_filled(&self) -> bool {
        self.mask.iter().all(|&i| self.input[i].is_some())
    }

    pub fn next_empty_slot(&self) -> Option<usize> {
        self.mask.iter().copied().find(|&i| self.input[i].is_none())
    }

    pub fn last_filled_slot(&self) -> Option<usize> {
        self.mask.iter().rev().copied().find(|&i| self.input[i].is_some())
    }

    pub fn guess(&self) -> String {
        self.input.iter().flatten().collect()
    }

    /// Compare the joined input with the target, ignoring case.
    pub fn evaluate(&mut self) -> Verdict {
        debug_assert!(self.is_filled(), "evaluated with an empty masked slot");
        self.busy = true;
        let correct = self.guess().to_lowercase() == self.word.text.to_lowercase();
        let verdict = if correct {
            Verdict::Correct
        } else {
            self.waiting_for_retry = true;
            Verdict::Incorrect
        };
        self.verdict = Some(verdict);
        verdict
    }

    /// True only for the first miss of this dequeue.
    pub fn mark_requeued(&mut self) -> bool {
        !std::mem::replace(&mut self.requeued, true)
    }

    pub fn offer_retry(&mut self) {
        if self.waiting_for_retry {
            self.retry_offered = true;
        }
    }

    /// Clear the masked slots and go back to collecting. Prefilled slots are
    /// left alone.
    pub fn reset_for_retry(&mut self) -> bool {
        if !self.retry_offered {
            return false;
        }
        for &i in &self.mask {
            self.input[i] = None;
        }
        self.busy = false;
        self.waiting_for_retry = false;
        self.retry_offered = false;
        self.verdict = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(text: &str, mask: &[usize]) -> RoundState {
        let ticket = QueueTicket {
            slot: 0,
            word: WordEntry::new(1, text, "def"),
            stage: 0,
        };
        let mut round = RoundState::new(ticket, mask.iter().copied().collect());
        round.begin_collecting();
        round
    }

    #[test]
    fn test_unmasked_slots_are_prefilled() {
        let round = round("cat", &[1]);
        assert_eq!(round.input, vec![Some('c'), None, Some('t')]);
        assert_eq!(round.phase(), RoundPhase::Collecting);
        assert!(!round.is_filled());
        assert_eq!(round.next_empty_slot(), Some(1));
        assert_eq!(round.last_filled_slot(), None);
    }

    #[test]
    fn test_new_round_is_presenting() {
        let ticket = QueueTicket {
            slot: 0,
            word: WordEntry::new(1, "cat", "def"),
            stage: 0,
        };
        let round = RoundState::new(ticket, BTreeSet::from([0]));
        assert_eq!(round.phase(), RoundPhase::Presenting);
        assert!(!round.accepts_input());
    }

    #[test]
    fn test_evaluate_ignores_case() {
        let mut round = round("Spanish", &[0, 3]);
        round.input[0] = Some('s');
        round.input[3] = Some('N');
        assert_eq!(round.evaluate(), Verdict::Correct);
        assert_eq!(round.phase(), RoundPhase::Success);
        assert!(round.busy);
    }

    #[test]
    fn test_wrong_guess_waits_for_retry() {
        let mut round = round("cat", &[1]);
        round.input[1] = Some('u');
        assert_eq!(round.evaluate(), Verdict::Incorrect);
        assert_eq!(round.phase(), RoundPhase::RetryPending);
        assert!(!round.accepts_input());

        // not offered yet
        assert!(!round.reset_for_retry());
        round.offer_retry();
        assert!(round.reset_for_retry());
        assert_eq!(round.input, vec![Some('c'), None, Some('t')]);
        assert_eq!(round.phase(), RoundPhase::Collecting);
    }

    #[test]
    fn test_mark_requeued_only_once() {
        let mut round = round("cat", &[0]);
        assert!(round.mark_requeued());
        assert!(!round.mark_requeued());
    }
}
