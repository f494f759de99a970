//! Character Voice Analyzer.
//!
//! Runs the full pipeline over one story: extraction, per-instance speech
//! patterns, per-character aggregation, consistency, differentiation and
//! suggestions.

use std::collections::BTreeMap;

use quill_common::util::truncate_with_ellipsis;
use quill_common::VoiceConfig;

use crate::consistency::calculate_consistency;
use crate::differentiation::{differentiation, distinctiveness};
use crate::extractor::DialogueExtractor;
use crate::lexicon::Lexicon;
use crate::patterns::SpeechPatternAnalyzer;
use crate::profile::aggregate;
use crate::stages::StageComparator;
use crate::suggestions::{self, NO_DIALOGUE, NO_TEXT, WELL_DEVELOPED};
use crate::types::*;

/// Character voice analyzer.
#[derive(Debug, Clone)]
pub struct VoiceAnalyzer {
    config: VoiceConfig,
    extractor: DialogueExtractor,
    patterns: SpeechPatternAnalyzer,
}

impl VoiceAnalyzer {
    /// Create an analyzer with default thresholds and the built-in lexicon.
    pub fn new() -> Self {
        Self::with_config(VoiceConfig::default())
    }

    /// Create with custom thresholds and the built-in lexicon.
    pub fn with_config(config: VoiceConfig) -> Self {
        Self::with_lexicon(config, Lexicon::builtin())
    }

    /// Create with custom thresholds and word lists.
    pub fn with_lexicon(config: VoiceConfig, lexicon: Lexicon) -> Self {
        Self {
            extractor: DialogueExtractor::new(config.context_window),
            patterns: SpeechPatternAnalyzer::new(lexicon),
            config,
        }
    }

    /// Create from configuration, loading the lexicon file it names.
    ///
    /// An unreadable lexicon falls back to the built-in lists.
    pub fn from_config(config: VoiceConfig) -> Self {
        let lexicon = match config.resolved_lexicon_path() {
            Some(path) => match Lexicon::load_from(&path) {
                Ok(lexicon) => {
                    tracing::debug!(path = %path.display(), version = %lexicon.version, "Loaded lexicon");
                    lexicon
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to load lexicon, using built-in lists");
                    Lexicon::builtin()
                }
            },
            None => Lexicon::builtin(),
        };
        Self::with_lexicon(config, lexicon)
    }

    pub fn config(&self) -> &VoiceConfig {
        &self.config
    }

    pub fn lexicon(&self) -> &Lexicon {
        self.patterns.lexicon()
    }

    /// Analyze every character voice in a story.
    pub fn analyze(&self, text: &str, hint: Option<&CharacterHint>) -> VoiceAnalysisResult {
        let span = quill_common::analysis_span!("analyze", bytes = text.len());
        let _enter = span.enter();

        if let Some(hint) = hint {
            tracing::debug!(character = ?hint.name, quirks = hint.quirks.len(), "Character hint supplied");
        }

        if text.is_empty() {
            return self.empty_result(NO_TEXT);
        }

        let instances = self.extractor.extract(text);
        if instances.is_empty() {
            tracing::debug!("No dialogue found");
            return self.empty_result(NO_DIALOGUE);
        }

        let mut grouped: BTreeMap<String, Vec<&DialogueInstance>> = BTreeMap::new();
        for instance in &instances {
            grouped
                .entry(instance.speaker_or_unknown().to_string())
                .or_default()
                .push(instance);
        }

        tracing::debug!(
            instances = instances.len(),
            characters = grouped.len(),
            "Dialogue grouped by speaker"
        );

        let mut characters: BTreeMap<String, CharacterAnalysis> = grouped
            .into_iter()
            .map(|(name, dialogues)| {
                let analysis = self.analyze_character(&dialogues);
                (name, analysis)
            })
            .collect();

        let profiles: Vec<&CharacterVoiceProfile> =
            characters.values().map(|c| &c.voice_profile).collect();
        let differentiation = differentiation(&profiles);
        let scores: Vec<f64> = (0..profiles.len())
            .map(|i| distinctiveness(&profiles, i))
            .collect();
        for (analysis, score) in characters.values_mut().zip(scores) {
            analysis.distinctiveness = score;
        }

        let suggestions = suggestions::generate(&characters, differentiation, &self.config);

        tracing::info!(
            instances = instances.len(),
            characters = characters.len(),
            differentiation = differentiation.score,
            suggestions = suggestions.len(),
            "Voice analysis complete"
        );

        VoiceAnalysisResult {
            lexicon_version: self.lexicon().version.clone(),
            overall: OverallSummary {
                total_dialogue_instances: instances.len(),
                characters_with_dialogue: characters.len(),
                differentiation,
                suggestions,
            },
            characters,
        }
    }

    fn analyze_character(&self, dialogues: &[&DialogueInstance]) -> CharacterAnalysis {
        let profiles: Vec<SpeechProfile> = dialogues
            .iter()
            .map(|d| self.patterns.analyze(&d.text))
            .collect();

        CharacterAnalysis {
            dialogue_count: dialogues.len(),
            voice_profile: aggregate(&profiles),
            consistency: calculate_consistency(&profiles),
            distinctiveness: crate::differentiation::NEUTRAL_DISTINCTIVENESS,
            dialogue_instances: dialogues
                .iter()
                .map(|d| DialoguePreview {
                    text: truncate_with_ellipsis(&d.text, self.config.preview_length),
                    position: d.position,
                })
                .collect(),
        }
    }

    fn empty_result(&self, message: &str) -> VoiceAnalysisResult {
        VoiceAnalysisResult {
            lexicon_version: self.lexicon().version.clone(),
            characters: BTreeMap::new(),
            overall: OverallSummary {
                total_dialogue_instances: 0,
                characters_with_dialogue: 0,
                differentiation: DifferentiationScore::not_comparable(),
                suggestions: vec![message.to_string()],
            },
        }
    }

    /// Compare two analyses of the same story with this analyzer's thresholds.
    pub fn compare_stages(
        &self,
        draft: Option<&VoiceAnalysisResult>,
        revised: Option<&VoiceAnalysisResult>,
        hint: Option<&CharacterHint>,
    ) -> StageComparisonReport {
        let span = quill_common::analysis_span!("compare_stages");
        let _enter = span.enter();
        StageComparator::new(self.config.clone()).compare(draft, revised, hint)
    }

    /// Pass/fail verdict for a story's voices.
    ///
    /// Issues are the actionable suggestions of [`Self::analyze`]; the
    /// affirmative line is dropped.
    pub fn validate(&self, text: &str, hint: Option<&CharacterHint>) -> VoiceValidation {
        let result = self.analyze(text, hint);
        self.verdict(&result)
    }

    /// Verdict for an analysis that has already been run.
    pub fn verdict(&self, result: &VoiceAnalysisResult) -> VoiceValidation {
        let has_dialogue = result.has_dialogue();
        let is_consistent = has_dialogue
            && result
                .characters
                .values()
                .all(|c| c.consistency.score >= self.config.consistency_threshold);

        VoiceValidation {
            has_dialogue,
            is_consistent,
            differentiation: result.overall.differentiation.score,
            issues: result
                .overall
                .suggestions
                .iter()
                .filter(|s| s.as_str() != WELL_DEVELOPED)
                .cloned()
                .collect(),
        }
    }
}

impl Default for VoiceAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyze a story with default settings.
pub fn analyze_character_voices(text: &str, hint: Option<&CharacterHint>) -> VoiceAnalysisResult {
    VoiceAnalyzer::new().analyze(text, hint)
}

/// Validate a story's voices with default settings.
pub fn validate_voices(text: &str, hint: Option<&CharacterHint>) -> VoiceValidation {
    VoiceAnalyzer::new().validate(text, hint)
}
