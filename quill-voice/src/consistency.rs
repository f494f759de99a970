//! Consistency Tracker.
//!
//! Scores how much a character's own lines vary. Each tracked metric's
//! coefficient of variation (CV) becomes a sub-score `1 - min(CV, 1)`; the
//! sub-scores are then weighted:
//!
//! | component        | metric(s)                                   | weight |
//! |------------------|---------------------------------------------|--------|
//! | vocabulary       | vocabulary richness                         | 0.3    |
//! | word length      | average word length                         | 0.2    |
//! | sentence length  | average sentence length                     | 0.3    |
//! | rhythm           | mean of capped contraction/punctuation CVs  | 0.2    |

use quill_common::util::round_to;

use crate::stats::coefficient_of_variation;
use crate::types::{ConsistencyReport, SpeechProfile, Variations};

const VOCABULARY_WEIGHT: f64 = 0.3;
const WORD_LENGTH_WEIGHT: f64 = 0.2;
const SENTENCE_WEIGHT: f64 = 0.3;
const RHYTHM_WEIGHT: f64 = 0.2;

const VOCABULARY_CV_LIMIT: f64 = 0.3;
const SENTENCE_CV_LIMIT: f64 = 0.4;
const CONTRACTION_CV_LIMIT: f64 = 0.5;
const PUNCTUATION_CV_LIMIT: f64 = 0.5;

pub const INSUFFICIENT_DIALOGUE: &str = "Insufficient dialogue to assess consistency";

fn sub_score(cv: f64) -> f64 {
    (1.0 - cv.min(1.0)).max(0.0)
}

fn series(profiles: &[SpeechProfile], metric: impl Fn(&SpeechProfile) -> f64) -> Vec<f64> {
    profiles.iter().map(metric).collect()
}

/// Measure voice consistency across one character's dialogue instances.
///
/// Fewer than two instances is a defined outcome: a perfect score with an
/// "insufficient dialogue" issue.
pub fn calculate_consistency(profiles: &[SpeechProfile]) -> ConsistencyReport {
    if profiles.len() < 2 {
        return ConsistencyReport {
            score: 1.0,
            vocabulary_consistency: 1.0,
            word_length_consistency: 1.0,
            sentence_structure_consistency: 1.0,
            rhythm_consistency: 1.0,
            variations: Variations::default(),
            issues: vec![INSUFFICIENT_DIALOGUE.to_string()],
        };
    }

    let vocab_cv = coefficient_of_variation(&series(profiles, |p| p.vocabulary.richness));
    let word_length_cv =
        coefficient_of_variation(&series(profiles, |p| p.vocabulary.avg_word_length));
    let sentence_cv = coefficient_of_variation(&series(profiles, |p| {
        p.sentence_structure.avg_sentence_length
    }));
    let contraction_cv =
        coefficient_of_variation(&series(profiles, |p| p.rhythm.contraction_ratio));
    let punctuation_cv =
        coefficient_of_variation(&series(profiles, |p| p.rhythm.punctuation_density));

    let rhythm_cv = (contraction_cv.min(1.0) + punctuation_cv.min(1.0)) / 2.0;

    let vocabulary_consistency = sub_score(vocab_cv);
    let word_length_consistency = sub_score(word_length_cv);
    let sentence_structure_consistency = sub_score(sentence_cv);
    let rhythm_consistency = sub_score(rhythm_cv);

    let score = vocabulary_consistency * VOCABULARY_WEIGHT
        + word_length_consistency * WORD_LENGTH_WEIGHT
        + sentence_structure_consistency * SENTENCE_WEIGHT
        + rhythm_consistency * RHYTHM_WEIGHT;

    let mut issues = Vec::new();
    if vocab_cv > VOCABULARY_CV_LIMIT {
        issues.push(format!(
            "Vocabulary richness varies significantly (CV: {vocab_cv:.2})"
        ));
    }
    if sentence_cv > SENTENCE_CV_LIMIT {
        issues.push(format!(
            "Sentence length varies significantly (CV: {sentence_cv:.2})"
        ));
    }
    if contraction_cv > CONTRACTION_CV_LIMIT {
        issues.push("Contraction usage is inconsistent".to_string());
    }
    if punctuation_cv > PUNCTUATION_CV_LIMIT {
        issues.push("Punctuation patterns vary significantly".to_string());
    }

    ConsistencyReport {
        score: round_to(score, 3),
        vocabulary_consistency: round_to(vocabulary_consistency, 3),
        word_length_consistency: round_to(word_length_consistency, 3),
        sentence_structure_consistency: round_to(sentence_structure_consistency, 3),
        rhythm_consistency: round_to(rhythm_consistency, 3),
        variations: Variations {
            vocabulary_variation: round_to(vocab_cv, 3),
            word_length_variation: round_to(word_length_cv, 3),
            sentence_length_variation: round_to(sentence_cv, 3),
            rhythm_variation: round_to(rhythm_cv, 3),
        },
        issues,
    }
}
