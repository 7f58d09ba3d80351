use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::source::WordId;

/// One evaluated attempt, as posted to the result sink.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptReport {
    pub word_id: WordId,
    pub success: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u64,
    pub best_combo: u32,
    pub words: usize,
    pub completed_ops: u32,
    pub total_ops: u32,
    pub attempts: u32,
    pub failures: u32,
    pub elapsed_secs: f64,
    pub finished_at: DateTime<Utc>,
}

impl SessionSummary {
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            return 100.0;
        }
        let correct = self.attempts - self.failures;
        (correct as f64 / self.attempts as f64 * 100.0).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_wire_shape() {
        let report = AttemptReport {
            word_id: WordId(17),
            success: true,
        };
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"word_id":17,"success":true}"#
        );
    }

    #[test]
    fn test_accuracy_counts_failed_attempts() {
        let summary = SessionSummary {
            score: 0,
            best_combo: 0,
            words: 2,
            completed_ops: 4,
            total_ops: 4,
            attempts: 5,
            failures: 1,
            elapsed_secs: 30.0,
            finished_at: Utc::now(),
        };
        assert!((summary.accuracy() - 80.0).abs() < 1e-9);
    }
}
