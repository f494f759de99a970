//! Differentiation Scorer.
//!
//! Distance between two voices is the sum of absolute differences over four
//! metrics: vocabulary richness, average word length, average sentence length
//! and contraction ratio. Scores divide mean distance by 2 and cap at 1.

use quill_common::util::round_to;

use crate::types::{CharacterVoiceProfile, DifferentiationScore};

const DISTANCE_SCALE: f64 = 2.0;

/// Distinctiveness of a character with nobody to compare against.
pub const NEUTRAL_DISTINCTIVENESS: f64 = 0.5;

/// Multi-metric distance between two voice profiles.
pub fn distance(a: &CharacterVoiceProfile, b: &CharacterVoiceProfile) -> f64 {
    (a.vocabulary_richness - b.vocabulary_richness).abs()
        + (a.avg_word_length - b.avg_word_length).abs()
        + (a.avg_sentence_length - b.avg_sentence_length).abs()
        + (a.contraction_ratio - b.contraction_ratio).abs()
}

fn normalize(mean_distance: f64) -> f64 {
    round_to((mean_distance / DISTANCE_SCALE).min(1.0), 3)
}

/// Score how distinct a cast of characters sound from each other.
///
/// Fewer than two profiles is not comparable and scores exactly 0.0.
pub fn differentiation(profiles: &[&CharacterVoiceProfile]) -> DifferentiationScore {
    if profiles.len() < 2 {
        return DifferentiationScore::not_comparable();
    }

    let mut total = 0.0;
    let mut pairs = 0usize;
    for (i, a) in profiles.iter().enumerate() {
        for b in &profiles[i + 1..] {
            total += distance(a, b);
            pairs += 1;
        }
    }

    DifferentiationScore {
        score: normalize(total / pairs as f64),
        comparable: true,
    }
}

/// Distinctiveness of the character at `index` relative to everyone else.
pub fn distinctiveness(profiles: &[&CharacterVoiceProfile], index: usize) -> f64 {
    if profiles.len() < 2 || index >= profiles.len() {
        return NEUTRAL_DISTINCTIVENESS;
    }

    let me = profiles[index];
    let total: f64 = profiles
        .iter()
        .enumerate()
        .filter(|(j, _)| *j != index)
        .map(|(_, other)| distance(me, other))
        .sum();

    normalize(total / (profiles.len() - 1) as f64)
}
