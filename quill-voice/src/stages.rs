//! Stage Comparator.
//!
//! Diffs two analyses of the same story (draft and revision) character by
//! character and reports how far each voice drifted. Nothing is re-extracted:
//! only the aggregated profiles and consistency scores are compared.

use std::collections::{BTreeMap, BTreeSet};

use quill_common::util::round_to;
use quill_common::VoiceConfig;

use crate::types::{
    CharacterAnalysis, CharacterComparison, CharacterHint, ComparisonSummary, MetricDelta,
    StageComparisonReport, StageStatus, VoiceAnalysisResult, VoiceMetric,
};

/// Vocabulary-richness change recorded as a note rather than an issue.
const RICHNESS_CHANGE_FLOOR: f64 = 0.05;
/// Consistency-score movement that counts as improvement or regression.
const CONSISTENCY_SHIFT: f64 = 0.1;
/// Flat penalty for any change in the slang set.
const SLANG_PENALTY: f64 = 0.2;

pub const INSUFFICIENT_DATA: &str = "Insufficient data to check consistency across stages.";
pub const NO_DIALOGUE_EITHER: &str = "No dialogue found in either stage.";
pub const VOICES_CONSISTENT: &str = "Character voices remain consistent across draft stages.";
pub const MAJOR_DRIFT: &str = "Significant voice inconsistencies detected between draft and \
     revision. Review character dialogue to ensure voices remain consistent.";
pub const MINOR_DRIFT: &str = "Minor voice inconsistencies detected. Review character dialogue \
     to maintain consistent speech patterns across draft stages.";

impl VoiceMetric {
    /// Delta above which a change is significant.
    pub fn threshold(self) -> f64 {
        match self {
            Self::VocabularyRichness => 0.15,
            Self::AvgWordLength => 1.0,
            Self::AvgSentenceLength => 3.0,
            Self::ContractionRatio => 0.2,
        }
    }

    /// Weight of the delta in the per-character penalty.
    pub fn weight(self) -> f64 {
        match self {
            Self::VocabularyRichness | Self::ContractionRatio => 2.0,
            Self::AvgWordLength | Self::AvgSentenceLength => 0.1,
        }
    }

    fn read(self, analysis: &CharacterAnalysis) -> f64 {
        let profile = &analysis.voice_profile;
        match self {
            Self::VocabularyRichness => profile.vocabulary_richness,
            Self::AvgWordLength => profile.avg_word_length,
            Self::AvgSentenceLength => profile.avg_sentence_length,
            Self::ContractionRatio => profile.contraction_ratio,
        }
    }

    const ALL: [VoiceMetric; 4] = [
        Self::VocabularyRichness,
        Self::AvgWordLength,
        Self::AvgSentenceLength,
        Self::ContractionRatio,
    ];
}

/// Compares voice analyses across draft stages.
#[derive(Debug, Clone, Default)]
pub struct StageComparator {
    config: VoiceConfig,
}

impl StageComparator {
    pub fn new(config: VoiceConfig) -> Self {
        Self { config }
    }

    /// Compare a draft analysis against its revision.
    ///
    /// Either side missing yields `insufficient_data`; both sides without
    /// characters yields `no_dialogue` with a perfect score.
    pub fn compare(
        &self,
        draft: Option<&VoiceAnalysisResult>,
        revised: Option<&VoiceAnalysisResult>,
        hint: Option<&CharacterHint>,
    ) -> StageComparisonReport {
        if let Some(hint) = hint {
            tracing::debug!(character = ?hint.name, "Character hint supplied for stage comparison");
        }

        let (Some(draft), Some(revised)) = (draft, revised) else {
            return terminal_report(0.0, StageStatus::InsufficientData, INSUFFICIENT_DATA);
        };

        if draft.characters.is_empty() && revised.characters.is_empty() {
            return terminal_report(1.0, StageStatus::NoDialogue, NO_DIALOGUE_EITHER);
        }

        let names: BTreeSet<&String> = draft
            .characters
            .keys()
            .chain(revised.characters.keys())
            .collect();

        let mut characters = BTreeMap::new();
        for name in names {
            let comparison = match (draft.characters.get(name), revised.characters.get(name)) {
                (Some(before), Some(after)) => compare_character(before, after),
                (None, _) => missing(format!(
                    "Character {name} appears in revised draft but not in original draft."
                )),
                (_, None) => missing(format!(
                    "Character {name} appears in original draft but not in revised draft."
                )),
            };
            characters.insert(name.clone(), comparison);
        }

        let scores: Vec<f64> = characters.values().map(|c| c.score).collect();
        let overall_score = crate::stats::mean(&scores);

        let summary = ComparisonSummary {
            characters_checked: characters.len(),
            characters_with_issues: characters
                .values()
                .filter(|c| c.score < self.config.consistency_threshold || !c.issues.is_empty())
                .count(),
        };

        let status = self.status(overall_score);
        let suggestions = self.suggestions(&characters, overall_score);

        tracing::info!(
            characters = summary.characters_checked,
            with_issues = summary.characters_with_issues,
            overall_score,
            status = %status,
            "Stage comparison complete"
        );

        StageComparisonReport {
            overall_score: round_to(overall_score, 3),
            status,
            characters,
            summary,
            suggestions,
        }
    }

    fn status(&self, overall_score: f64) -> StageStatus {
        if overall_score >= self.config.good_consistency_threshold {
            StageStatus::Consistent
        } else if overall_score >= self.config.minor_issue_threshold {
            StageStatus::MinorIssues
        } else {
            StageStatus::MajorIssues
        }
    }

    fn suggestions(
        &self,
        characters: &BTreeMap<String, CharacterComparison>,
        overall_score: f64,
    ) -> Vec<String> {
        let mut suggestions = Vec::new();

        if overall_score < self.config.minor_issue_threshold {
            suggestions.push(MAJOR_DRIFT.to_string());
        } else if overall_score < self.config.good_consistency_threshold {
            suggestions.push(MINOR_DRIFT.to_string());
        }

        for (name, comparison) in characters {
            if comparison.score < self.config.consistency_threshold {
                if let Some(first) = comparison.issues.first() {
                    suggestions.push(format!("{name}: {first}"));
                }
            }
        }

        if suggestions.is_empty() {
            suggestions.push(VOICES_CONSISTENT.to_string());
        }

        suggestions
    }
}

fn terminal_report(score: f64, status: StageStatus, message: &str) -> StageComparisonReport {
    StageComparisonReport {
        overall_score: score,
        status,
        characters: BTreeMap::new(),
        summary: ComparisonSummary::default(),
        suggestions: vec![message.to_string()],
    }
}

fn missing(issue: String) -> CharacterComparison {
    CharacterComparison {
        score: 0.0,
        significant_deltas: Vec::new(),
        profile_changes: Vec::new(),
        issues: vec![issue],
        improvements: Vec::new(),
    }
}

fn compare_character(draft: &CharacterAnalysis, revised: &CharacterAnalysis) -> CharacterComparison {
    let mut significant_deltas = Vec::new();
    let mut profile_changes = Vec::new();
    let mut issues = Vec::new();
    let mut improvements = Vec::new();
    let mut penalty = 0.0;

    for metric in VoiceMetric::ALL {
        let before = metric.read(draft);
        let after = metric.read(revised);
        let delta = MetricDelta {
            metric,
            draft: before,
            revised: after,
            change: (before - after).abs(),
        };
        penalty += delta.change * metric.weight();

        if delta.change > metric.threshold() {
            issues.push(format!(
                "{metric} changed significantly (draft: {before:.2}, revised: {after:.2})"
            ));
            significant_deltas.push(delta);
        } else if metric == VoiceMetric::VocabularyRichness && delta.change > RICHNESS_CHANGE_FLOOR
        {
            profile_changes.push(delta);
        }
    }

    let draft_slang = &draft.voice_profile.slang_terms;
    let revised_slang = &revised.voice_profile.slang_terms;
    if draft_slang != revised_slang {
        penalty += SLANG_PENALTY;
        let added: Vec<&str> = revised_slang.difference(draft_slang).map(String::as_str).collect();
        let removed: Vec<&str> = draft_slang.difference(revised_slang).map(String::as_str).collect();
        if !added.is_empty() {
            issues.push(format!("New slang terms added: {}", added.join(", ")));
        }
        if !removed.is_empty() {
            issues.push(format!("Slang terms removed: {}", removed.join(", ")));
        }
    }

    let before = draft.consistency.score;
    let after = revised.consistency.score;
    if after > before + CONSISTENCY_SHIFT {
        improvements.push(format!(
            "Voice consistency improved from {before:.2} to {after:.2}"
        ));
    } else if after < before - CONSISTENCY_SHIFT {
        issues.push(format!(
            "Voice consistency decreased from {before:.2} to {after:.2}"
        ));
    }

    CharacterComparison {
        score: round_to((1.0 - penalty.min(1.0)).max(0.0), 3),
        significant_deltas,
        profile_changes,
        issues,
        improvements,
    }
}

/// Compare two analyses with the default thresholds.
pub fn compare_stages(
    draft: Option<&VoiceAnalysisResult>,
    revised: Option<&VoiceAnalysisResult>,
    hint: Option<&CharacterHint>,
) -> StageComparisonReport {
    StageComparator::default().compare(draft, revised, hint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        CharacterVoiceProfile, ConsistencyReport, DifferentiationScore, OverallSummary, Variations,
    };
    use test_case::test_case;

    fn analysis(richness: f64, sentence_len: f64, slang: &[&str], consistency: f64) -> CharacterAnalysis {
        CharacterAnalysis {
            dialogue_count: 3,
            voice_profile: CharacterVoiceProfile {
                vocabulary_richness: richness,
                avg_word_length: 4.0,
                complex_words_avg: 0.0,
                common_word_ratio: 0.5,
                avg_sentence_length: sentence_len,
                complexity: 0.1,
                contraction_ratio: 0.1,
                punctuation_density: 0.2,
                exclamation_ratio: 0.0,
                slang_terms: slang.iter().map(|s| s.to_string()).collect(),
                formal_language: false,
            },
            consistency: ConsistencyReport {
                score: consistency,
                vocabulary_consistency: 1.0,
                word_length_consistency: 1.0,
                sentence_structure_consistency: 1.0,
                rhythm_consistency: 1.0,
                variations: Variations::default(),
                issues: Vec::new(),
            },
            distinctiveness: 0.5,
            dialogue_instances: Vec::new(),
        }
    }

    fn result(characters: Vec<(&str, CharacterAnalysis)>) -> VoiceAnalysisResult {
        let characters: BTreeMap<String, CharacterAnalysis> = characters
            .into_iter()
            .map(|(n, a)| (n.to_string(), a))
            .collect();
        VoiceAnalysisResult {
            lexicon_version: "1".to_string(),
            overall: OverallSummary {
                total_dialogue_instances: characters.values().map(|c| c.dialogue_count).sum(),
                characters_with_dialogue: characters.len(),
                differentiation: DifferentiationScore::not_comparable(),
                suggestions: Vec::new(),
            },
            characters,
        }
    }

    #[test]
    fn test_missing_input_is_insufficient_data() {
        let r = result(vec![("Alice", analysis(0.8, 5.0, &[], 0.9))]);
        let report = compare_stages(Some(&r), None, None);
        assert_eq!(report.status, StageStatus::InsufficientData);
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.suggestions, vec![INSUFFICIENT_DATA.to_string()]);
        assert_eq!(compare_stages(None, None, None).status, StageStatus::InsufficientData);
    }

    #[test]
    fn test_both_empty_is_no_dialogue() {
        let empty = result(Vec::new());
        let report = compare_stages(Some(&empty), Some(&empty), None);
        assert_eq!(report.status, StageStatus::NoDialogue);
        assert_eq!(report.overall_score, 1.0);
        assert_eq!(report.summary.characters_checked, 0);
    }

    #[test]
    fn test_identical_stages_are_consistent() {
        let r = result(vec![
            ("Alice", analysis(0.8, 5.0, &["yeah"], 0.9)),
            ("Bob", analysis(0.6, 12.0, &[], 0.5)),
        ]);
        let report = compare_stages(Some(&r), Some(&r), None);
        assert_eq!(report.overall_score, 1.0);
        assert_eq!(report.status, StageStatus::Consistent);
        assert_eq!(report.summary.characters_with_issues, 0);
        assert_eq!(report.suggestions, vec![VOICES_CONSISTENT.to_string()]);
        for comparison in report.characters.values() {
            assert_eq!(comparison.score, 1.0);
            assert!(comparison.issues.is_empty());
        }
    }

    #[test]
    fn test_character_missing_from_one_stage() {
        let draft = result(vec![("Alice", analysis(0.8, 5.0, &[], 0.9))]);
        let revised = result(vec![
            ("Alice", analysis(0.8, 5.0, &[], 0.9)),
            ("Bob", analysis(0.8, 5.0, &[], 0.9)),
        ]);
        let report = compare_stages(Some(&draft), Some(&revised), None);
        let bob = &report.characters["Bob"];
        assert_eq!(bob.score, 0.0);
        assert_eq!(
            bob.issues,
            vec!["Character Bob appears in revised draft but not in original draft.".to_string()]
        );
        assert_eq!(report.overall_score, 0.5);
        assert_eq!(report.status, StageStatus::MajorIssues);
        assert_eq!(report.suggestions[0], MAJOR_DRIFT);
        assert!(report.suggestions[1].starts_with("Bob: Character Bob appears"));

        let reverse = compare_stages(Some(&revised), Some(&draft), None);
        assert!(reverse.characters["Bob"].issues[0].contains("in original draft but not in revised"));
    }

    #[test]
    fn test_slang_removed_is_penalized() {
        let draft = result(vec![("Alice", analysis(0.8, 5.0, &["gonna", "yeah"], 0.9))]);
        let revised = result(vec![("Alice", analysis(0.8, 5.0, &[], 0.9))]);
        let report = compare_stages(Some(&draft), Some(&revised), None);
        let alice = &report.characters["Alice"];
        assert_eq!(alice.issues, vec!["Slang terms removed: gonna, yeah".to_string()]);
        assert_eq!(alice.score, 0.8);
        assert_eq!(report.status, StageStatus::Consistent);
    }

    #[test]
    fn test_significant_and_minor_richness_changes() {
        let draft = result(vec![("Alice", analysis(0.8, 5.0, &[], 0.9))]);
        let big = result(vec![("Alice", analysis(0.6, 5.0, &[], 0.9))]);
        let small = result(vec![("Alice", analysis(0.72, 5.0, &[], 0.9))]);

        let report = compare_stages(Some(&draft), Some(&big), None);
        let alice = &report.characters["Alice"];
        assert_eq!(alice.significant_deltas.len(), 1);
        assert_eq!(alice.significant_deltas[0].metric, VoiceMetric::VocabularyRichness);
        assert_eq!(
            alice.issues[0],
            "Vocabulary richness changed significantly (draft: 0.80, revised: 0.60)"
        );

        let report = compare_stages(Some(&draft), Some(&small), None);
        let alice = &report.characters["Alice"];
        assert!(alice.issues.is_empty());
        assert_eq!(alice.profile_changes.len(), 1);
        assert_eq!(alice.profile_changes[0].metric, VoiceMetric::VocabularyRichness);
        // 0.08 * 2
        assert_eq!(alice.score, 0.84);
    }

    #[test]
    fn test_contraction_drift() {
        let draft = result(vec![("Alice", analysis(0.8, 5.0, &[], 0.9))]);
        let mut chatty = analysis(0.8, 5.0, &[], 0.9);
        chatty.voice_profile.contraction_ratio = 0.35;
        let revised = result(vec![("Alice", chatty)]);

        let report = compare_stages(Some(&draft), Some(&revised), None);
        let alice = &report.characters["Alice"];
        assert_eq!(
            alice.issues,
            vec!["Contraction usage changed significantly (draft: 0.10, revised: 0.35)".to_string()]
        );
        assert_eq!(alice.significant_deltas[0].metric, VoiceMetric::ContractionRatio);
        // 0.25 * 2
        assert_eq!(alice.score, 0.5);
        assert_eq!(report.status, StageStatus::MajorIssues);
    }

    #[test]
    fn test_word_length_drift() {
        let draft = result(vec![("Alice", analysis(0.8, 5.0, &[], 0.9))]);
        let mut wordy = analysis(0.8, 5.0, &[], 0.9);
        wordy.voice_profile.avg_word_length = 5.5;
        let revised = result(vec![("Alice", wordy)]);

        let alice = &compare_stages(Some(&draft), Some(&revised), None).characters["Alice"];
        assert_eq!(
            alice.issues,
            vec!["Average word length changed significantly (draft: 4.00, revised: 5.50)".to_string()]
        );
        // 1.5 * 0.1
        assert_eq!(alice.score, 0.85);
    }

    #[test]
    fn test_slang_added_is_penalized() {
        let draft = result(vec![("Alice", analysis(0.8, 5.0, &[], 0.9))]);
        let revised = result(vec![("Alice", analysis(0.8, 5.0, &["yeah", "gonna"], 0.9))]);
        let alice = &compare_stages(Some(&draft), Some(&revised), None).characters["Alice"];
        assert_eq!(alice.issues, vec!["New slang terms added: gonna, yeah".to_string()]);
        assert_eq!(alice.score, 0.8);
    }

    #[test_case(0.5, 0.9, true ; "consistency improved")]
    #[test_case(0.9, 0.5, false ; "consistency decreased")]
    fn test_consistency_shift(before: f64, after: f64, improved: bool) {
        let draft = result(vec![("Alice", analysis(0.8, 5.0, &[], before))]);
        let revised = result(vec![("Alice", analysis(0.8, 5.0, &[], after))]);
        let alice = &compare_stages(Some(&draft), Some(&revised), None).characters["Alice"];
        assert_eq!(alice.improvements.len(), usize::from(improved));
        assert_eq!(alice.issues.len(), usize::from(!improved));
        assert_eq!(alice.score, 1.0);
    }

    #[test_case(0.85, StageStatus::Consistent)]
    #[test_case(0.8, StageStatus::Consistent)]
    #[test_case(0.7, StageStatus::MinorIssues)]
    #[test_case(0.6, StageStatus::MinorIssues)]
    #[test_case(0.59, StageStatus::MajorIssues)]
    fn test_status_thresholds(score: f64, expected: StageStatus) {
        assert_eq!(StageComparator::default().status(score), expected);
    }

    #[test]
    fn test_sentence_length_drift() {
        let draft = result(vec![("Alice", analysis(0.8, 5.0, &[], 0.9))]);
        let revised = result(vec![("Alice", analysis(0.8, 12.0, &[], 0.9))]);
        let report = compare_stages(Some(&draft), Some(&revised), None);
        let alice = &report.characters["Alice"];
        assert_eq!(
            alice.issues,
            vec!["Average sentence length changed significantly (draft: 5.00, revised: 12.00)".to_string()]
        );
        // 7 * 0.1
        assert_eq!(alice.score, 0.3);
        assert_eq!(report.summary.characters_with_issues, 1);
    }
}
