use std::collections::BTreeSet;

use rand::Rng;
use rand::seq::index;

/// Positions that may be hidden: ASCII letters only. Spaces, hyphens,
/// apostrophes and non-ASCII characters always stay visible.
pub fn letter_positions(target: &[char]) -> Vec<usize> {
    target
        .iter()
        .enumerate()
        .filter(|(_, ch)| is_maskable(**ch))
        .map(|(i, _)| i)
        .collect()
}

pub fn is_maskable(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

pub fn letter_count(target: &[char]) -> usize {
    target.iter().filter(|&&ch| is_maskable(ch)).count()
}

/// Number of letters to hide for a given ratio: floored, then clamped to
/// `[1, letters]`. A word with no letters hides nothing.
pub fn hide_count_for(letters: usize, ratio: f64) -> usize {
    if letters == 0 {
        return 0;
    }
    let raw = (letters as f64 * ratio).floor() as usize;
    raw.clamp(1, letters)
}

pub fn mask_ratio_for_stage(stage: u8, easy_ratio: f64, hard_ratio: f64) -> f64 {
    if stage >= 1 { hard_ratio } else { easy_ratio }
}

/// Uniformly sample `hide_count` distinct letter positions without replacement.
pub fn generate_mask<R: Rng + ?Sized>(
    target: &[char],
    hide_count: usize,
    rng: &mut R,
) -> BTreeSet<usize> {
    let candidates = letter_positions(target);
    let amount = hide_count.min(candidates.len());
    index::sample(rng, candidates.len(), amount)
        .into_iter()
        .map(|i| candidates[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use rand::rngs::mock::StepRng;

    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_cat_stage_zero_hides_one_letter() {
        let target = chars("cat");
        let letters = letter_count(&target);
        assert_eq!(letters, 3);
        let hide = hide_count_for(letters, mask_ratio_for_stage(0, 0.35, 0.70));
        assert_eq!(hide, 1);

        let mut rng = SmallRng::seed_from_u64(7);
        let mask = generate_mask(&target, hide, &mut rng);
        assert_eq!(mask.len(), 1);
    }

    #[test]
    fn test_elephant_stage_one_hides_five_letters() {
        let target = chars("elephant");
        let hide = hide_count_for(letter_count(&target), mask_ratio_for_stage(1, 0.35, 0.70));
        assert_eq!(hide, 5);

        let mut rng = SmallRng::seed_from_u64(11);
        let mask = generate_mask(&target, hide, &mut rng);
        assert_eq!(mask.len(), 5);
    }

    #[test]
    fn test_mask_never_touches_punctuation_or_spaces() {
        let target = chars("go for a walk's end-run");
        let allowed: BTreeSet<usize> = letter_positions(&target).into_iter().collect();
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..200 {
            let hide = hide_count_for(allowed.len(), 0.70);
            let mask = generate_mask(&target, hide, &mut rng);
            assert_eq!(mask.len(), hide);
            assert!(mask.is_subset(&allowed));
        }
    }

    #[test]
    fn test_hide_count_clamps_to_letter_count() {
        assert_eq!(hide_count_for(2, 5.0), 2);
        assert_eq!(hide_count_for(2, 0.0), 1);
        assert_eq!(hide_count_for(0, 0.7), 0);
    }

    #[test]
    fn test_generate_mask_clamps_oversized_request() {
        let target = chars("a.m.");
        let mut rng = SmallRng::seed_from_u64(1);
        let mask = generate_mask(&target, 10, &mut rng);
        assert_eq!(mask, BTreeSet::from([0, 2]));
    }

    #[test]
    fn test_stepped_rng_is_deterministic() {
        let target = chars("vacation");
        let first = generate_mask(&target, 3, &mut StepRng::new(0, 1));
        let second = generate_mask(&target, 3, &mut StepRng::new(0, 1));
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_ascii_letters_stay_visible() {
        let target = chars("café");
        assert_eq!(letter_positions(&target), vec![0, 1, 2]);
    }
}
