//! Character Voice Types.
//!
//! Every record produced by the analysis pipeline, from a single quoted span
//! up to the cross-stage comparison report. All types serialize with serde so
//! callers can ship them over whatever transport they use.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Bucket for dialogue whose speaker could not be inferred.
pub const UNKNOWN_SPEAKER: &str = "Unknown";

// ============================================================================
// Extraction
// ============================================================================

/// One quoted span of speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueInstance {
    /// Spoken content, trimmed
    pub text: String,
    /// Inferred speaker, if any rule matched
    pub speaker: Option<String>,
    /// Byte offset of the opening quote in the source text
    pub position: usize,
    /// Surrounding text used for speaker inference
    pub context: String,
}

impl DialogueInstance {
    /// Speaker name, or the "Unknown" bucket.
    pub fn speaker_or_unknown(&self) -> &str {
        self.speaker.as_deref().unwrap_or(UNKNOWN_SPEAKER)
    }
}

/// Optional character metadata supplied by the caller.
///
/// Carried through for context only; it never affects scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterHint {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quirks: Vec<String>,
    #[serde(default)]
    pub voice_markers: Vec<String>,
}

// ============================================================================
// Per-instance speech profile
// ============================================================================

/// Vocabulary features of one dialogue instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyMetrics {
    pub unique_words: usize,
    pub total_words: usize,
    /// unique / total, 0 when there are no words
    pub richness: f64,
    pub avg_word_length: f64,
    /// Words longer than six characters
    pub complex_words: usize,
    pub common_words: usize,
    pub common_word_ratio: f64,
}

/// Sentence structure features of one dialogue instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentenceMetrics {
    pub sentence_count: usize,
    /// Word count of each non-empty sentence fragment
    pub sentence_lengths: Vec<usize>,
    pub avg_sentence_length: f64,
    /// (clause markers + conjunctions) / words
    pub complexity: f64,
}

/// Rhythm features of one dialogue instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RhythmMetrics {
    /// Punctuation marks per word
    pub punctuation_density: f64,
    pub exclamation_count: usize,
    pub question_count: usize,
    pub ellipsis_count: usize,
    /// Contractions per word
    pub contraction_ratio: f64,
}

/// Informal or formal register markers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectMarkers {
    pub slang_terms: BTreeSet<String>,
    pub formal_language: bool,
}

/// Feature bundle for a single dialogue instance.
///
/// `SpeechProfile::default()` is the all-zero profile of empty input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechProfile {
    pub vocabulary: VocabularyMetrics,
    pub sentence_structure: SentenceMetrics,
    pub rhythm: RhythmMetrics,
    pub dialect_markers: DialectMarkers,
}

impl SpeechProfile {
    /// Exclamations per word, with the word count floored at one.
    pub fn exclamation_ratio(&self) -> f64 {
        self.rhythm.exclamation_count as f64 / self.vocabulary.total_words.max(1) as f64
    }
}

// ============================================================================
// Per-character aggregate
// ============================================================================

/// Mean speech profile of one character.
///
/// Only built through [`crate::profile::aggregate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterVoiceProfile {
    pub vocabulary_richness: f64,
    pub avg_word_length: f64,
    pub complex_words_avg: f64,
    pub common_word_ratio: f64,
    pub avg_sentence_length: f64,
    pub complexity: f64,
    pub contraction_ratio: f64,
    pub punctuation_density: f64,
    pub exclamation_ratio: f64,
    /// Union of every instance's slang terms
    pub slang_terms: BTreeSet<String>,
    /// True only if every instance was formal
    pub formal_language: bool,
}

// ============================================================================
// Consistency
// ============================================================================

/// Coefficients of variation behind a consistency report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variations {
    pub vocabulary_variation: f64,
    pub word_length_variation: f64,
    pub sentence_length_variation: f64,
    /// Mean of the contraction and punctuation CVs
    pub rhythm_variation: f64,
}

/// How stable one character's voice is across their own lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    /// Weighted score in [0, 1], 1 = perfectly consistent
    pub score: f64,
    pub vocabulary_consistency: f64,
    pub word_length_consistency: f64,
    pub sentence_structure_consistency: f64,
    pub rhythm_consistency: f64,
    pub variations: Variations,
    pub issues: Vec<String>,
}

// ============================================================================
// Differentiation
// ============================================================================

/// How distinct a cast of characters sound from each other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifferentiationScore {
    /// Score in [0, 1]; 0.0 when not comparable
    pub score: f64,
    /// False when fewer than two characters have dialogue
    pub comparable: bool,
}

impl DifferentiationScore {
    pub const fn not_comparable() -> Self {
        Self {
            score: 0.0,
            comparable: false,
        }
    }
}

// ============================================================================
// Analysis result
// ============================================================================

/// Truncated dialogue line kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialoguePreview {
    pub text: String,
    pub position: usize,
}

/// Everything known about one character's voice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterAnalysis {
    pub dialogue_count: usize,
    pub voice_profile: CharacterVoiceProfile,
    pub consistency: ConsistencyReport,
    /// Mean normalized distance to every other character, 0.5 when alone
    pub distinctiveness: f64,
    pub dialogue_instances: Vec<DialoguePreview>,
}

/// Story-wide figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallSummary {
    pub total_dialogue_instances: usize,
    pub characters_with_dialogue: usize,
    pub differentiation: DifferentiationScore,
    pub suggestions: Vec<String>,
}

/// Top-level output of [`crate::VoiceAnalyzer::analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceAnalysisResult {
    /// Lexicon version the profiles were computed with
    pub lexicon_version: String,
    pub characters: BTreeMap<String, CharacterAnalysis>,
    pub overall: OverallSummary,
}

impl VoiceAnalysisResult {
    pub fn has_dialogue(&self) -> bool {
        self.overall.total_dialogue_instances > 0
    }
}

/// Compact pass/fail verdict for pipeline gating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceValidation {
    pub has_dialogue: bool,
    /// Dialogue exists and every character meets the consistency threshold
    pub is_consistent: bool,
    pub differentiation: f64,
    pub issues: Vec<String>,
}

// ============================================================================
// Stage comparison
// ============================================================================

/// Profile metric tracked across stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceMetric {
    VocabularyRichness,
    AvgWordLength,
    AvgSentenceLength,
    ContractionRatio,
}

impl std::fmt::Display for VoiceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VocabularyRichness => write!(f, "Vocabulary richness"),
            Self::AvgWordLength => write!(f, "Average word length"),
            Self::AvgSentenceLength => write!(f, "Average sentence length"),
            Self::ContractionRatio => write!(f, "Contraction usage"),
        }
    }
}

/// One metric's value in each stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub metric: VoiceMetric,
    pub draft: f64,
    pub revised: f64,
    /// Absolute difference
    pub change: f64,
}

/// Drift report for one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterComparison {
    /// Score in [0, 1], 1 = unchanged voice
    pub score: f64,
    /// Deltas past their significance threshold
    pub significant_deltas: Vec<MetricDelta>,
    /// Noticeable but acceptable changes
    pub profile_changes: Vec<MetricDelta>,
    pub issues: Vec<String>,
    pub improvements: Vec<String>,
}

/// Overall verdict of a stage comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Consistent,
    MinorIssues,
    MajorIssues,
    NoDialogue,
    InsufficientData,
}

impl std::fmt::Display for StageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Consistent => write!(f, "consistent"),
            Self::MinorIssues => write!(f, "minor_issues"),
            Self::MajorIssues => write!(f, "major_issues"),
            Self::NoDialogue => write!(f, "no_dialogue"),
            Self::InsufficientData => write!(f, "insufficient_data"),
        }
    }
}

/// Counts accompanying a stage comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub characters_checked: usize,
    pub characters_with_issues: usize,
}

/// Voice drift between two analyses of the same story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageComparisonReport {
    /// Mean of per-character scores
    pub overall_score: f64,
    pub status: StageStatus,
    pub characters: BTreeMap<String, CharacterComparison>,
    pub summary: ComparisonSummary,
    pub suggestions: Vec<String>,
}
