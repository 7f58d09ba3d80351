use crate::session::round::{RoundPhase, RoundState, Verdict};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    Empty,
    Filled,
    Prefilled,
    Correct,
    Wrong,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotView {
    pub ch: Option<char>,
    pub state: SlotState,
    pub active: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HudView {
    pub completed_ops: u32,
    pub total_ops: u32,
    pub score: u64,
    pub combo: u32,
}

impl HudView {
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.completed_ops, self.total_ops)
    }

    pub fn combo_label(&self) -> Option<String> {
        (self.combo > 1).then(|| format!("HYPER-FLUX x{}", self.combo))
    }

    pub fn ratio(&self) -> f64 {
        if self.total_ops == 0 {
            return 0.0;
        }
        self.completed_ops as f64 / self.total_ops as f64
    }
}

/// Everything the renderer needs for one frame of a running session.
#[derive(Clone, Debug)]
pub struct SessionView {
    pub definition: String,
    pub slots: Vec<SlotView>,
    pub hud: HudView,
    pub phase: RoundPhase,
    pub retry_visible: bool,
    pub revealed: Option<String>,
    pub hazard_progress: Option<f64>,
    pub reward: Option<String>,
}

pub fn slot_views(round: &RoundState) -> Vec<SlotView> {
    let cursor = if round.accepts_input() {
        round.next_empty_slot()
    } else {
        None
    };

    round
        .input
        .iter()
        .enumerate()
        .map(|(i, &ch)| {
            let state = match round.verdict {
                Some(Verdict::Correct) => SlotState::Correct,
                Some(Verdict::Incorrect) => SlotState::Wrong,
                None if !round.is_masked(i) => SlotState::Prefilled,
                None if ch.is_some() => SlotState::Filled,
                None => SlotState::Empty,
            };
            SlotView {
                ch,
                state,
                active: cursor == Some(i),
            }
        })
        .collect()
}
