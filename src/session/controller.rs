use std::time::{Duration, Instant};

use chrono::Utc;
use rand::Rng;
use thiserror::Error;

use crate::engine::mask;
use crate::engine::scoring::{self, ScoreState};
use crate::session::input::{self, InputEvent, InputOutcome};
use crate::session::queue::SessionQueue;
use crate::session::result::{AttemptReport, SessionSummary};
use crate::session::round::{RoundState, Verdict};
use crate::session::view::{self, HudView, SessionView};
use crate::source::WordEntry;

#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub base_score: u64,
    pub combo_bonus: u64,
    pub easy_mask_ratio: f64,
    pub hard_mask_ratio: f64,
    pub success_delay: Duration,
    pub retry_delay: Duration,
    pub hazard_duration: Duration,
    pub reward_duration: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            base_score: scoring::BASE_SCORE,
            combo_bonus: scoring::COMBO_BONUS,
            easy_mask_ratio: 0.35,
            hard_mask_ratio: 0.70,
            success_delay: Duration::from_millis(2500),
            retry_delay: Duration::from_millis(2000),
            hazard_duration: Duration::from_secs(5),
            reward_duration: Duration::from_millis(1500),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session has no playable words")]
    NoWords,
}

/// Side effects for the host to carry out. The controller never performs
/// I/O itself.
#[derive(Clone, Debug)]
pub enum SessionEffect {
    Speak(String),
    Report(AttemptReport),
    Completed(SessionSummary),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Running,
    Complete,
    Disposed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScheduledAction {
    NextRound,
    OfferRetry,
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    due: Instant,
    action: ScheduledAction,
}

#[derive(Clone, Debug)]
struct FloatingReward {
    text: String,
    until: Instant,
}

/// One play-through: owns the queue, the live round and the score. All
/// timing goes through the `now` arguments, so callers decide the clock.
pub struct GameSession<R: Rng> {
    settings: SessionSettings,
    rng: R,
    queue: SessionQueue,
    score: ScoreState,
    round: Option<RoundState>,
    status: SessionStatus,
    pending: Option<Scheduled>,
    effects: Vec<SessionEffect>,
    reward: Option<FloatingReward>,
    hazard_started_at: Option<Instant>,
    started_at: Instant,
    attempts: u32,
    failures: u32,
    best_combo: u32,
    summary: Option<SessionSummary>,
}

impl<R: Rng> GameSession<R> {
    /// Words without a single maskable letter are skipped. An empty result
    /// refuses to start, so no round is ever created.
    pub fn new(
        words: Vec<WordEntry>,
        settings: SessionSettings,
        rng: R,
        now: Instant,
    ) -> Result<Self, SessionError> {
        let playable: Vec<WordEntry> = words
            .into_iter()
            .filter(|w| {
                let letters = mask::letter_count(&w.text.chars().collect::<Vec<_>>());
                if letters == 0 {
                    tracing::warn!(id = %w.id, text = %w.text, "skipping word without letters");
                }
                letters > 0
            })
            .collect();
        if playable.is_empty() {
            return Err(SessionError::NoWords);
        }

        let queue = SessionQueue::new(playable);
        tracing::info!(
            words = queue.word_count(),
            total_ops = queue.total_ops(),
            "session started"
        );

        let mut session = Self {
            settings,
            rng,
            queue,
            score: ScoreState::default(),
            round: None,
            status: SessionStatus::Running,
            pending: None,
            effects: Vec::new(),
            reward: None,
            hazard_started_at: None,
            started_at: now,
            attempts: 0,
            failures: 0,
            best_combo: 0,
            summary: None,
        };
        session.start_round(now);
        Ok(session)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status == SessionStatus::Running
    }

    pub fn is_complete(&self) -> bool {
        self.status == SessionStatus::Complete
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn queue(&self) -> &SessionQueue {
        &self.queue
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    fn start_round(&mut self, now: Instant) {
        self.round = None;
        let Some(ticket) = self.queue.dequeue() else {
            self.complete(now);
            return;
        };

        let target: Vec<char> = ticket.word.text.chars().collect();
        let letters = mask::letter_count(&target);
        let ratio = mask::mask_ratio_for_stage(
            ticket.stage,
            self.settings.easy_mask_ratio,
            self.settings.hard_mask_ratio,
        );
        let hide = mask::hide_count_for(letters, ratio);
        let hidden = mask::generate_mask(&target, hide, &mut self.rng);

        tracing::info!(
            word = %ticket.word.text,
            stage = ticket.stage,
            hidden = hidden.len(),
            letters,
            "round started"
        );

        let mut round = RoundState::new(ticket, hidden);
        self.hazard_started_at = Some(now);
        round.begin_collecting();
        self.round = Some(round);
    }

    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> InputOutcome {
        if !self.is_running() {
            return InputOutcome::Ignored;
        }
        let Some(round) = self.round.as_mut() else {
            return InputOutcome::Ignored;
        };
        let outcome = input::route(round, event);
        if outcome == InputOutcome::Filled {
            self.evaluate(now);
        }
        outcome
    }

    fn evaluate(&mut self, now: Instant) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let verdict = round.evaluate();
        let requeue = verdict == Verdict::Incorrect && round.mark_requeued();
        let slot = round.slot;
        let word_id = round.word.id;
        let text = round.word.text.clone();

        self.attempts += 1;
        self.hazard_started_at = None;

        match verdict {
            Verdict::Correct => {
                let gained = self
                    .score
                    .record_success(self.settings.base_score, self.settings.combo_bonus);
                self.best_combo = self.best_combo.max(self.score.combo);
                let stage = self.queue.record_success(slot);
                tracing::info!(
                    word = %text,
                    stage,
                    gained,
                    combo = self.score.combo,
                    completed = self.queue.completed_ops(),
                    "answer correct"
                );

                self.reward = Some(FloatingReward {
                    text: scoring::reward_label(self.score.combo),
                    until: now + self.settings.reward_duration,
                });
                self.effects.push(SessionEffect::Speak(text));
                self.effects.push(SessionEffect::Report(AttemptReport {
                    word_id,
                    success: true,
                }));
                self.pending = Some(Scheduled {
                    due: now + self.settings.success_delay,
                    action: ScheduledAction::NextRound,
                });
            }
            Verdict::Incorrect => {
                self.score.record_failure();
                self.failures += 1;
                if requeue {
                    self.queue.requeue(slot);
                }
                tracing::info!(word = %text, requeued = requeue, "answer wrong");

                self.effects.push(SessionEffect::Speak(text));
                self.effects.push(SessionEffect::Report(AttemptReport {
                    word_id,
                    success: false,
                }));
                self.pending = Some(Scheduled {
                    due: now + self.settings.retry_delay,
                    action: ScheduledAction::OfferRetry,
                });
            }
        }
    }

    /// Player asked to try the current word again. Only valid once the retry
    /// affordance is showing.
    pub fn acknowledge_retry(&mut self, now: Instant) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(round) = self.round.as_mut() else {
            return false;
        };
        if !round.reset_for_retry() {
            return false;
        }
        self.hazard_started_at = Some(now);
        true
    }

    /// Fire any scheduled callback that is due.
    pub fn tick(&mut self, now: Instant) {
        if !self.is_running() {
            return;
        }
        if self.reward.as_ref().is_some_and(|r| r.until <= now) {
            self.reward = None;
        }
        let Some(scheduled) = self.pending else {
            return;
        };
        if now < scheduled.due {
            return;
        }
        self.pending = None;
        match scheduled.action {
            ScheduledAction::NextRound => self.start_round(now),
            ScheduledAction::OfferRetry => {
                if let Some(round) = self.round.as_mut() {
                    round.offer_retry();
                }
            }
        }
    }

    fn complete(&mut self, now: Instant) {
        self.status = SessionStatus::Complete;
        self.round = None;
        self.pending = None;
        self.hazard_started_at = None;

        let summary = SessionSummary {
            score: self.score.score,
            best_combo: self.best_combo,
            words: self.queue.word_count(),
            completed_ops: self.queue.completed_ops(),
            total_ops: self.queue.total_ops(),
            attempts: self.attempts,
            failures: self.failures,
            elapsed_secs: now.duration_since(self.started_at).as_secs_f64(),
            finished_at: Utc::now(),
        };
        tracing::info!(score = summary.score, attempts = summary.attempts, "session complete");
        self.summary = Some(summary.clone());
        self.effects.push(SessionEffect::Completed(summary));
    }

    /// Tear down: pending callbacks and undelivered effects are dropped and
    /// every later call is a no-op.
    pub fn dispose(&mut self) {
        if self.status == SessionStatus::Disposed {
            return;
        }
        tracing::debug!("session disposed");
        self.status = SessionStatus::Disposed;
        self.pending = None;
        self.effects.clear();
        self.reward = None;
        self.hazard_started_at = None;
    }

    pub fn drain_effects(&mut self) -> Vec<SessionEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn hud(&self) -> HudView {
        HudView {
            completed_ops: self.queue.completed_ops(),
            total_ops: self.queue.total_ops(),
            score: self.score.score,
            combo: self.score.combo,
        }
    }

    /// Snapshot for the renderer. `None` once the session is over or
    /// disposed.
    pub fn view(&self, now: Instant) -> Option<SessionView> {
        if !self.is_running() {
            return None;
        }
        let round = self.round.as_ref()?;
        let hazard_progress = self.hazard_started_at.map(|start| {
            let total = self.settings.hazard_duration.as_secs_f64().max(f64::EPSILON);
            (now.saturating_duration_since(start).as_secs_f64() / total).clamp(0.0, 1.0)
        });
        Some(SessionView {
            definition: round.word.definition.clone(),
            slots: view::slot_views(round),
            hud: self.hud(),
            phase: round.phase(),
            retry_visible: round.retry_offered,
            revealed: (round.verdict == Some(Verdict::Incorrect)).then(|| round.word.text.clone()),
            hazard_progress,
            reward: self.reward.as_ref().map(|r| r.text.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::session::round::RoundPhase;
    use crate::source::WordId;

    fn words(texts: &[&str]) -> Vec<WordEntry> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| WordEntry::new(i as u64 + 1, t, &format!("meaning of {t}")))
            .collect()
    }

    fn session(texts: &[&str], now: Instant) -> GameSession<SmallRng> {
        GameSession::new(
            words(texts),
            SessionSettings::default(),
            SmallRng::seed_from_u64(42),
            now,
        )
        .unwrap()
    }

    /// Type the right letters for every masked slot of the live round.
    fn answer(session: &mut GameSession<SmallRng>, now: Instant) {
        let round = session.round().unwrap();
        let letters: Vec<char> = round.mask.iter().map(|&i| round.target[i]).collect();
        for ch in letters {
            session.handle_input(InputEvent::Letter(ch), now);
        }
    }

    fn answer_wrong(session: &mut GameSession<SmallRng>, now: Instant) {
        let round = session.round().unwrap();
        let letters: Vec<char> = round
            .mask
            .iter()
            .map(|&i| if round.target[i].eq_ignore_ascii_case(&'q') { 'z' } else { 'q' })
            .collect();
        for ch in letters {
            session.handle_input(InputEvent::Letter(ch), now);
        }
    }

    #[test]
    fn test_empty_word_list_refuses_to_start() {
        let result = GameSession::new(
            Vec::new(),
            SessionSettings::default(),
            SmallRng::seed_from_u64(1),
            Instant::now(),
        );
        assert!(matches!(result, Err(SessionError::NoWords)));
    }

    #[test]
    fn test_letterless_words_are_skipped() {
        let result = GameSession::new(
            words(&["123", "--"]),
            SessionSettings::default(),
            SmallRng::seed_from_u64(1),
            Instant::now(),
        );
        assert!(matches!(result, Err(SessionError::NoWords)));

        let session = session(&["42", "cat"], Instant::now());
        assert_eq!(session.queue().total_ops(), 2);
        assert_eq!(session.round().unwrap().word.text, "cat");
    }

    #[test]
    fn test_first_round_starts_collecting() {
        let now = Instant::now();
        let session = session(&["cat"], now);
        let round = session.round().unwrap();
        assert_eq!(round.phase(), RoundPhase::Collecting);
        assert_eq!(round.mask.len(), 1);
        assert_eq!(session.queue().total_ops(), 2);

        let view = session.view(now).unwrap();
        assert_eq!(view.definition, "meaning of cat");
        assert_eq!(view.hazard_progress, Some(0.0));
        assert!(!view.retry_visible);
    }

    #[test]
    fn test_correct_answer_scores_and_requeues() {
        let now = Instant::now();
        let mut session = session(&["cat", "dog"], now);
        answer(&mut session, now);

        assert_eq!(session.score().score, 100);
        assert_eq!(session.score().combo, 1);
        assert_eq!(session.queue().completed_ops(), 1);
        assert_eq!(session.queue().stage_of(0), 1);
        assert_eq!(session.round().unwrap().phase(), RoundPhase::Success);
        // dog plus cat's second pass
        assert_eq!(session.queue().len(), 2);

        let effects = session.drain_effects();
        assert!(matches!(&effects[0], SessionEffect::Speak(text) if text == "cat"));
        assert!(matches!(
            &effects[1],
            SessionEffect::Report(AttemptReport { word_id: WordId(1), success: true })
        ));
        assert_eq!(session.view(now).unwrap().reward.as_deref(), Some("PERFECT"));
    }

    #[test]
    fn test_input_rejected_during_success_delay() {
        let now = Instant::now();
        let mut session = session(&["cat", "dog"], now);
        answer(&mut session, now);

        let later = now + Duration::from_millis(1000);
        session.tick(later);
        assert_eq!(session.round().unwrap().word.text, "cat");
        assert_eq!(
            session.handle_input(InputEvent::Backspace, later),
            InputOutcome::Ignored
        );

        session.tick(now + Duration::from_millis(2500));
        assert_eq!(session.round().unwrap().word.text, "dog");
        assert!(session.round().unwrap().accepts_input());
    }

    #[test]
    fn test_wrong_answer_requeues_once_and_offers_retry() {
        let now = Instant::now();
        let mut session = session(&["cat", "dog"], now);
        session.score.combo = 3;
        answer_wrong(&mut session, now);

        assert_eq!(session.score().combo, 0);
        assert_eq!(session.score().score, 0);
        assert_eq!(session.queue().completed_ops(), 0);
        // dog, then cat again
        assert_eq!(session.queue().len(), 2);
        let view = session.view(now).unwrap();
        assert_eq!(view.revealed.as_deref(), Some("cat"));
        assert_eq!(view.phase, RoundPhase::RetryPending);
        assert!(!view.retry_visible);

        // retry is not available before the delay
        assert!(!session.acknowledge_retry(now));
        session.tick(now + Duration::from_millis(1999));
        assert!(!session.view(now).unwrap().retry_visible);
        let shown = now + Duration::from_millis(2000);
        session.tick(shown);
        assert!(session.view(shown).unwrap().retry_visible);

        assert!(session.acknowledge_retry(shown));
        let round = session.round().unwrap();
        assert_eq!(round.phase(), RoundPhase::Collecting);
        for (i, slot) in round.input.iter().enumerate() {
            if round.mask.contains(&i) {
                assert_eq!(*slot, None);
            } else {
                assert_eq!(*slot, Some(round.target[i]));
            }
        }

        // a second miss on the same dequeue does not enqueue again
        answer_wrong(&mut session, shown);
        assert_eq!(session.queue().len(), 2);
    }

    #[test]
    fn test_failure_reports_and_speaks() {
        let now = Instant::now();
        let mut session = session(&["owl"], now);
        answer_wrong(&mut session, now);
        let effects = session.drain_effects();
        assert_eq!(effects.len(), 2);
        assert!(matches!(&effects[0], SessionEffect::Speak(text) if text == "owl"));
        assert!(matches!(
            &effects[1],
            SessionEffect::Report(AttemptReport { success: false, .. })
        ));
    }

    #[test]
    fn test_full_session_reaches_completion() {
        let mut now = Instant::now();
        let mut session = session(&["cat", "elephant"], now);
        let mut successes = 0;

        while session.is_running() {
            let before = session.queue().completed_ops();
            answer(&mut session, now);
            successes += 1;
            assert_eq!(session.queue().completed_ops(), before + 1);
            now += Duration::from_millis(2500);
            session.tick(now);
        }

        assert!(session.is_complete());
        assert_eq!(successes, 4);
        assert!(session.round().is_none());
        assert!(session.view(now).is_none());

        // 100 + 110 + 120 + 130
        let summary = session.summary().unwrap();
        assert_eq!(summary.score, 460);
        assert_eq!(summary.completed_ops, 4);
        assert_eq!(summary.total_ops, 4);
        assert_eq!(summary.best_combo, 4);

        let completed = session
            .drain_effects()
            .into_iter()
            .filter(|e| matches!(e, SessionEffect::Completed(_)))
            .count();
        assert_eq!(completed, 1);
    }

    #[test]
    fn test_second_pass_uses_hard_ratio() {
        let mut now = Instant::now();
        let mut session = session(&["elephant"], now);
        assert_eq!(session.round().unwrap().mask.len(), 2);
        answer(&mut session, now);
        now += Duration::from_secs(3);
        session.tick(now);
        let round = session.round().unwrap();
        assert_eq!(round.stage, 1);
        assert_eq!(round.mask.len(), 5);
    }

    #[test]
    fn test_failed_then_passed_word_never_overcounts() {
        let mut now = Instant::now();
        let mut session = session(&["cat"], now);

        answer_wrong(&mut session, now);
        now += Duration::from_secs(2);
        session.tick(now);
        session.acknowledge_retry(now);
        answer(&mut session, now);

        let mut successes = 1;
        while session.is_running() {
            now += Duration::from_secs(3);
            session.tick(now);
            if session.is_running() {
                answer(&mut session, now);
                successes += 1;
            }
        }
        assert_eq!(successes, 2);
        assert_eq!(session.summary().unwrap().completed_ops, 2);
        assert_eq!(session.summary().unwrap().failures, 1);
    }

    #[test]
    fn test_disposed_session_ignores_everything() {
        let now = Instant::now();
        let mut session = session(&["cat", "dog"], now);
        answer(&mut session, now);
        session.dispose();

        assert!(session.drain_effects().is_empty());
        assert!(session.view(now).is_none());
        session.tick(now + Duration::from_secs(10));
        assert_eq!(session.round().unwrap().word.text, "cat");
        assert_eq!(
            session.handle_input(InputEvent::Letter('a'), now),
            InputOutcome::Ignored
        );
        assert!(!session.acknowledge_retry(now));
        assert_eq!(session.status(), SessionStatus::Disposed);
    }

    #[test]
    fn test_reward_fades_after_display_time() {
        let now = Instant::now();
        let mut session = session(&["cat", "dog"], now);
        answer(&mut session, now);
        assert_first_success_hud(&session);
        session.tick(now + Duration::from_millis(1500));
        assert!(session.view(now).unwrap().reward.is_none());
    }

    fn assert_first_success_hud(session: &GameSession<SmallRng>) {
        assert_eq!(session.hud().combo, 1);
        assert_eq!(session.hud().progress_label(), "1/4");
    }
}
