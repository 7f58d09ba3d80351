pub const BASE_SCORE: u64 = 100;
pub const COMBO_BONUS: u64 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreState {
    pub score: u64,
    pub combo: u32,
}

impl ScoreState {
    /// Score a success with the streak from earlier successes, then extend the
    /// streak. Returns the points awarded.
    pub fn record_success(&mut self, base: u64, combo_bonus: u64) -> u64 {
        let gained = base + self.combo as u64 * combo_bonus;
        self.score += gained;
        self.combo += 1;
        gained
    }

    pub fn record_failure(&mut self) {
        self.combo = 0;
    }
}

/// Text for the floating reward shown after a success.
pub fn reward_label(combo: u32) -> String {
    if combo > 1 {
        format!("PERFECT x{combo}")
    } else {
        "PERFECT".to_string()
    }
}
