//! Voice Profile Aggregator.
//!
//! Folds a character's per-instance speech profiles into one mean profile.

use quill_common::util::round_to;

use crate::stats::mean;
use crate::types::{CharacterVoiceProfile, SpeechProfile};

fn mean_of(
    profiles: &[SpeechProfile],
    places: i32,
    metric: impl Fn(&SpeechProfile) -> f64,
) -> f64 {
    let values: Vec<f64> = profiles.iter().map(metric).collect();
    round_to(mean(&values), places)
}

/// Aggregate one character's speech profiles.
///
/// Numeric fields are arithmetic means (ratios to 3 decimals, lengths and
/// counts to 2), slang terms are unioned, and the character is formal only if
/// every instance was formal.
///
/// # Panics
///
/// Panics if `profiles` is empty. Grouping guarantees at least one instance
/// per character.
pub fn aggregate(profiles: &[SpeechProfile]) -> CharacterVoiceProfile {
    assert!(
        !profiles.is_empty(),
        "cannot aggregate a voice profile from zero dialogue instances"
    );

    CharacterVoiceProfile {
        vocabulary_richness: mean_of(profiles, 3, |p| p.vocabulary.richness),
        avg_word_length: mean_of(profiles, 2, |p| p.vocabulary.avg_word_length),
        complex_words_avg: mean_of(profiles, 2, |p| p.vocabulary.complex_words as f64),
        common_word_ratio: mean_of(profiles, 3, |p| p.vocabulary.common_word_ratio),
        avg_sentence_length: mean_of(profiles, 2, |p| p.sentence_structure.avg_sentence_length),
        complexity: mean_of(profiles, 3, |p| p.sentence_structure.complexity),
        contraction_ratio: mean_of(profiles, 3, |p| p.rhythm.contraction_ratio),
        punctuation_density: mean_of(profiles, 3, |p| p.rhythm.punctuation_density),
        exclamation_ratio: mean_of(profiles, 3, SpeechProfile::exclamation_ratio),
        slang_terms: profiles
            .iter()
            .flat_map(|p| p.dialect_markers.slang_terms.iter().cloned())
            .collect(),
        formal_language: profiles.iter().all(|p| p.dialect_markers.formal_language),
    }
}
