//! Speech Pattern Analyzer.
//!
//! Turns one line of dialogue into a [`SpeechProfile`]. The function is total:
//! empty input gives the all-zero profile and every ratio guards its
//! denominator.
//!
//! Reported ratios are rounded to 3 decimals and average lengths to 2. The
//! formal-language check sees the unrounded values.

use regex::Regex;
use std::collections::{BTreeSet, HashSet};
use std::sync::LazyLock;

use quill_common::util::round_to;

use crate::lexicon::Lexicon;
use crate::types::{DialectMarkers, RhythmMetrics, SentenceMetrics, SpeechProfile, VocabularyMetrics};

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap());
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());
static CLAUSE_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,;:]").unwrap());
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.,!?;:—–-]").unwrap());
static ELLIPSIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{2,}|…").unwrap());
static CONTRACTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+'(?:t|s|d|ll|ve|re|m)\b").unwrap());

/// Words longer than this count as complex.
const COMPLEX_WORD_LEN: usize = 6;

/// Formal speech: few contractions, long sentences, varied words.
const FORMAL_MAX_CONTRACTION_RATIO: f64 = 0.1;
const FORMAL_MIN_SENTENCE_LENGTH: f64 = 10.0;
const FORMAL_MIN_RICHNESS: f64 = 0.5;

/// Number of word tokens in `text`.
pub fn count_words(text: &str) -> usize {
    WORD.find_iter(text).count()
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn mean_usize(values: impl ExactSizeIterator<Item = usize>) -> f64 {
    let n = values.len();
    ratio(values.sum(), n)
}

/// Computes per-instance speech features.
#[derive(Debug, Clone)]
pub struct SpeechPatternAnalyzer {
    lexicon: Lexicon,
    slang: Option<Regex>,
}

impl SpeechPatternAnalyzer {
    pub fn new(lexicon: Lexicon) -> Self {
        let slang = build_slang_pattern(&lexicon.slang);
        Self { lexicon, slang }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Analyze one dialogue instance.
    pub fn analyze(&self, text: &str) -> SpeechProfile {
        if text.trim().is_empty() {
            return SpeechProfile::default();
        }

        // Curly apostrophes count the same as straight ones.
        let folded = text.to_lowercase().replace('\u{2019}', "'");
        let words: Vec<&str> = WORD.find_iter(&folded).map(|m| m.as_str()).collect();
        let total_words = words.len();

        let mut vocabulary = self.vocabulary(&words);
        let mut sentence_structure = self.sentence_structure(text, &words);
        let mut rhythm = rhythm(text, &folded, total_words);

        let formal_language = rhythm.contraction_ratio < FORMAL_MAX_CONTRACTION_RATIO
            && sentence_structure.avg_sentence_length > FORMAL_MIN_SENTENCE_LENGTH
            && vocabulary.richness > FORMAL_MIN_RICHNESS;

        vocabulary.richness = round_to(vocabulary.richness, 3);
        vocabulary.avg_word_length = round_to(vocabulary.avg_word_length, 2);
        vocabulary.common_word_ratio = round_to(vocabulary.common_word_ratio, 3);
        sentence_structure.avg_sentence_length =
            round_to(sentence_structure.avg_sentence_length, 2);
        sentence_structure.complexity = round_to(sentence_structure.complexity, 3);
        rhythm.punctuation_density = round_to(rhythm.punctuation_density, 3);
        rhythm.contraction_ratio = round_to(rhythm.contraction_ratio, 3);

        SpeechProfile {
            vocabulary,
            sentence_structure,
            rhythm,
            dialect_markers: DialectMarkers {
                slang_terms: self.slang_terms(&folded),
                formal_language,
            },
        }
    }

    fn vocabulary(&self, words: &[&str]) -> VocabularyMetrics {
        let total_words = words.len();
        let unique_words = words.iter().collect::<HashSet<_>>().len();
        let common_words = words.iter().filter(|w| self.lexicon.is_stopword(w)).count();

        VocabularyMetrics {
            unique_words,
            total_words,
            richness: ratio(unique_words, total_words),
            avg_word_length: mean_usize(words.iter().map(|w| w.chars().count())),
            complex_words: words
                .iter()
                .filter(|w| w.chars().count() > COMPLEX_WORD_LEN)
                .count(),
            common_words,
            common_word_ratio: ratio(common_words, total_words),
        }
    }

    fn sentence_structure(&self, text: &str, words: &[&str]) -> SentenceMetrics {
        let sentence_lengths: Vec<usize> = SENTENCE_BREAK
            .split(text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(count_words)
            .collect();

        let clause_markers = CLAUSE_MARKER.find_iter(text).count();
        let conjunctions = words.iter().filter(|w| self.lexicon.is_conjunction(w)).count();

        SentenceMetrics {
            sentence_count: sentence_lengths.len(),
            avg_sentence_length: mean_usize(sentence_lengths.iter().copied()),
            sentence_lengths,
            complexity: ratio(clause_markers + conjunctions, words.len()),
        }
    }

    fn slang_terms(&self, folded: &str) -> BTreeSet<String> {
        match &self.slang {
            Some(pattern) => pattern
                .captures_iter(folded)
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str().to_string())
                .collect(),
            None => BTreeSet::new(),
        }
    }
}

impl Default for SpeechPatternAnalyzer {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

fn rhythm(text: &str, folded: &str, total_words: usize) -> RhythmMetrics {
    let contractions = CONTRACTION.find_iter(folded).count();

    RhythmMetrics {
        punctuation_density: ratio(PUNCTUATION.find_iter(text).count(), total_words),
        exclamation_count: text.matches('!').count(),
        question_count: text.matches('?').count(),
        ellipsis_count: ELLIPSIS.find_iter(text).count(),
        contraction_ratio: ratio(contractions, total_words),
    }
}

fn build_slang_pattern(terms: &[String]) -> Option<Regex> {
    if terms.is_empty() {
        return None;
    }

    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");

    match Regex::new(&format!(r"\b({alternation})\b")) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(error = %e, "Slang pattern rejected, slang detection disabled");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn analyze(text: &str) -> SpeechProfile {
        SpeechPatternAnalyzer::default().analyze(text)
    }

    #[test]
    fn test_simple_dialogue() {
        let p = analyze("Hello, how are you?");
        assert_eq!(p.vocabulary.total_words, 4);
        assert_eq!(p.vocabulary.unique_words, 4);
        assert_eq!(p.vocabulary.richness, 1.0);
        assert_eq!(p.vocabulary.common_words, 3);
        assert_eq!(p.sentence_structure.sentence_count, 1);
        assert_eq!(p.sentence_structure.sentence_lengths, vec![4]);
        assert_eq!(p.rhythm.question_count, 1);
        // one comma, no conjunctions
        assert_eq!(p.sentence_structure.complexity, 0.25);
        // comma and question mark
        assert_eq!(p.rhythm.punctuation_density, 0.5);
    }

    #[test]
    fn test_reported_features_are_rounded() {
        let p = analyze("Go, go, stop.");
        // 2 unique of 3 words
        assert_eq!(p.vocabulary.richness, 0.667);
        // 8 letters over 3 words
        assert_eq!(p.vocabulary.avg_word_length, 2.67);
        // two commas and a period over 3 words
        assert_eq!(p.rhythm.punctuation_density, 1.0);
        // two commas over 3 words
        assert_eq!(p.sentence_structure.complexity, 0.667);

        let p = analyze("We wait here for them.");
        // 17 letters over 5 words
        assert_eq!(p.vocabulary.avg_word_length, 3.4);
    }

    #[test]
    fn test_empty_and_whitespace_give_zero_profile() {
        assert_eq!(analyze(""), SpeechProfile::default());
        assert_eq!(analyze("   \n\t"), SpeechProfile::default());
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("  \n "), 0);
    }

    #[test]
    fn test_richness_orders_rich_above_repetitive() {
        let rich = analyze(
            "The magnificent, extraordinary, exceptional individual demonstrated remarkable capabilities.",
        );
        let simple = analyze("I am good. I am fine. I am okay.");
        assert!(rich.vocabulary.richness > simple.vocabulary.richness);
        assert_eq!(rich.vocabulary.complex_words, 7);
    }

    #[test]
    fn test_sentence_lengths() {
        let short = analyze("I see. You go. We run.");
        assert_eq!(short.sentence_structure.sentence_lengths, vec![2, 2, 2]);
        assert_eq!(short.sentence_structure.avg_sentence_length, 2.0);
    }

    #[test]
    fn test_contractions_and_slang() {
        let casual = analyze("I don't know. I can't tell. We won't go.");
        let formal = analyze("I do not know. I cannot tell. We will not go.");
        assert!(casual.rhythm.contraction_ratio > formal.rhythm.contraction_ratio);
        assert_eq!(formal.rhythm.contraction_ratio, 0.0);

        let slang: Vec<&str> = casual
            .dialect_markers
            .slang_terms
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(slang, vec!["can't", "don't", "won't"]);
    }

    #[test]
    fn test_curly_apostrophe_counts_as_contraction() {
        let p = analyze("I can’t stay.");
        assert!(p.rhythm.contraction_ratio > 0.0);
        assert!(p.dialect_markers.slang_terms.contains("can't"));
    }

    #[test]
    fn test_fillers_detected() {
        let p = analyze("Yeah, I dunno. Gonna go now.");
        let slang = &p.dialect_markers.slang_terms;
        assert!(slang.contains("yeah"));
        assert!(slang.contains("dunno"));
        assert!(slang.contains("gonna"));
        assert!(analyze("Yes, I do not know.").dialect_markers.slang_terms.is_empty());
    }

    #[test]
    fn test_rhythm_marks() {
        let p = analyze("Wait! What? No... Really?");
        assert_eq!(p.rhythm.exclamation_count, 1);
        assert_eq!(p.rhythm.question_count, 2);
        assert_eq!(p.rhythm.ellipsis_count, 1);
        let flat = analyze("This is a simple statement with minimal punctuation");
        assert!(p.rhythm.punctuation_density > flat.rhythm.punctuation_density);
    }

    #[test]
    fn test_formal_requires_all_three_conditions() {
        let formal = analyze(
            "I must confess that the committee reached its conclusion after considerable deliberation yesterday.",
        );
        assert!(formal.dialect_markers.formal_language);

        // Long and varied, but full of contractions.
        let casual = analyze(
            "I'd say we're done here and they've left because you'll never know what I'm thinking.",
        );
        assert!(!casual.dialect_markers.formal_language);

        // Short sentences.
        assert!(!analyze("Indeed. Quite so.").dialect_markers.formal_language);
    }

    #[test]
    fn test_custom_lexicon_without_slang() {
        let lexicon = Lexicon {
            slang: Vec::new(),
            ..Lexicon::builtin()
        };
        let p = SpeechPatternAnalyzer::new(lexicon).analyze("Yeah, gonna go.");
        assert!(p.dialect_markers.slang_terms.is_empty());
    }

    proptest! {
        #[test]
        fn prop_richness_in_unit_interval(text in "\\PC{0,200}") {
            let p = analyze(&text);
            prop_assert!((0.0..=1.0).contains(&p.vocabulary.richness));
            prop_assert!((0.0..=1.0).contains(&p.vocabulary.common_word_ratio));
            prop_assert!(p.vocabulary.unique_words <= p.vocabulary.total_words);
        }

        #[test]
        fn prop_distinct_words_have_full_richness(n in 1usize..40) {
            let text = (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
            prop_assert_eq!(analyze(&text).vocabulary.richness, 1.0);
        }
    }
}
