use chrono::{DateTime, Duration, Utc};

use crate::store::schema::WordProgress;

pub const MIN_EASE_FACTOR: f64 = 1.3;
const EASE_STEP_UP: f64 = 0.1;
const EASE_STEP_DOWN: f64 = 0.2;
const RELEARN_INTERVAL_DAYS: f64 = 0.5;

/// Simplified SM-2: pass/fail only, so the ease factor drifts by fixed steps
/// instead of a 0-5 quality grade.
pub fn calculate_review(current: &WordProgress, success: bool, now: DateTime<Utc>) -> WordProgress {
    let mut updated = current.clone();
    updated.last_played_at = Some(now);
    updated.attempts += 1;

    if success {
        updated.successes += 1;
        match updated.srs_stage {
            0 => {
                updated.interval_days = 1.0;
                updated.srs_stage = 1;
            }
            1 => {
                updated.interval_days = 6.0;
                updated.srs_stage = 2;
            }
            _ => {
                if updated.ease_factor < MIN_EASE_FACTOR {
                    updated.ease_factor = MIN_EASE_FACTOR;
                }
                updated.interval_days = (updated.interval_days * updated.ease_factor).ceil();
                updated.srs_stage += 1;
            }
        }
        updated.ease_factor += EASE_STEP_UP;
    } else {
        updated.srs_stage = 0;
        updated.interval_days = RELEARN_INTERVAL_DAYS;
        updated.ease_factor = (updated.ease_factor - EASE_STEP_DOWN).max(MIN_EASE_FACTOR);
    }

    let interval_secs = (updated.interval_days * 86_400.0).round() as i64;
    updated.next_review_at = Some(now + Duration::seconds(interval_secs));
    updated
}

pub fn is_due(progress: &WordProgress, now: DateTime<Utc>) -> bool {
    progress.next_review_at.is_none_or(|at| at <= now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::WordId;

    fn fresh() -> WordProgress {
        WordProgress::new(WordId(1))
    }

    #[test]
    fn test_first_success_schedules_one_day() {
        let now = Utc::now();
        let next = calculate_review(&fresh(), true, now);
        assert_eq!(next.srs_stage, 1);
        assert_eq!(next.interval_days, 1.0);
        assert_eq!(next.attempts, 1);
        assert_eq!(next.successes, 1);
        assert_eq!(next.next_review_at, Some(now + Duration::days(1)));
        assert!((next.ease_factor - 2.6).abs() < 1e-9);
    }

    #[test]
    fn test_second_success_schedules_six_days() {
        let now = Utc::now();
        let once = calculate_review(&fresh(), true, now);
        let twice = calculate_review(&once, true, now);
        assert_eq!(twice.srs_stage, 2);
        assert_eq!(twice.interval_days, 6.0);
    }

    #[test]
    fn test_later_successes_multiply_by_ease() {
        let now = Utc::now();
        let mut progress = fresh();
        for _ in 0..3 {
            progress = calculate_review(&progress, true, now);
        }
        // 6 days * 2.7 ease, rounded up
        assert_eq!(progress.interval_days, 17.0);
        assert_eq!(progress.srs_stage, 3);
    }

    #[test]
    fn test_failure_resets_stage_and_floors_ease() {
        let now = Utc::now();
        let mut progress = fresh();
        progress.srs_stage = 4;
        progress.ease_factor = 1.35;
        let next = calculate_review(&progress, false, now);
        assert_eq!(next.srs_stage, 0);
        assert_eq!(next.interval_days, 0.5);
        assert_eq!(next.ease_factor, MIN_EASE_FACTOR);
        assert_eq!(next.successes, 0);
        assert_eq!(next.next_review_at, Some(now + Duration::hours(12)));
    }

    #[test]
    fn test_unscheduled_word_is_due() {
        let now = Utc::now();
        assert!(is_due(&fresh(), now));
        let next = calculate_review(&fresh(), true, now);
        assert!(!is_due(&next, now));
        assert!(is_due(&next, now + Duration::days(2)));
    }
}
