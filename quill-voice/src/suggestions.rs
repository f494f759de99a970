//! Suggestion Generator.

use std::collections::BTreeMap;

use quill_common::VoiceConfig;

use crate::types::{CharacterAnalysis, DifferentiationScore};

pub const WELL_DEVELOPED: &str = "Character voices are well-developed and consistent.";
pub const TOO_SIMILAR: &str = "Character voices are too similar. Consider giving each character \
     distinctive speech patterns, vocabulary choices, or sentence rhythms.";
pub const NO_TEXT: &str = "No story text provided for analysis.";
pub const NO_DIALOGUE: &str =
    "No dialogue found in story. Consider adding character dialogue to develop voice.";

/// Instances below this count mean a character is underdeveloped.
const MIN_DIALOGUE_INSTANCES: usize = 2;

/// Build the ordered suggestion list for one analysis.
///
/// Rules fire independently. The cast-level differentiation check comes
/// first; a lone voice scores 0.0 there and so always trips it. Then come
/// per-character consistency and vocabulary checks, then the "very little
/// dialogue" check for every character. When nothing fires the list holds a
/// single affirmative line.
pub fn generate(
    characters: &BTreeMap<String, CharacterAnalysis>,
    differentiation: DifferentiationScore,
    config: &VoiceConfig,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if differentiation.score < config.differentiation_threshold {
        suggestions.push(TOO_SIMILAR.to_string());
    }

    for (name, analysis) in characters {
        if analysis.consistency.score < config.consistency_threshold {
            suggestions.push(format!(
                "{name}'s voice is inconsistent across dialogue instances. \
                 Review dialogue to maintain consistent speech patterns."
            ));
        }
        if analysis.voice_profile.vocabulary_richness < config.repetitive_vocabulary_threshold {
            suggestions.push(format!(
                "{name}'s dialogue uses repetitive vocabulary. \
                 Consider adding more varied word choices to reflect their unique voice."
            ));
        }
    }

    for (name, analysis) in characters {
        if analysis.dialogue_count < MIN_DIALOGUE_INSTANCES {
            suggestions.push(format!(
                "{name} has very little dialogue. More dialogue instances \
                 would help establish and maintain their distinctive voice."
            ));
        }
    }

    if suggestions.is_empty() {
        suggestions.push(WELL_DEVELOPED.to_string());
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consistency::calculate_consistency;
    use crate::patterns::SpeechPatternAnalyzer;
    use crate::profile::aggregate;

    fn character(lines: &[&str]) -> CharacterAnalysis {
        let analyzer = SpeechPatternAnalyzer::default();
        let profiles: Vec<_> = lines.iter().map(|l| analyzer.analyze(l)).collect();
        CharacterAnalysis {
            dialogue_count: lines.len(),
            voice_profile: aggregate(&profiles),
            consistency: calculate_consistency(&profiles),
            distinctiveness: 0.5,
            dialogue_instances: Vec::new(),
        }
    }

    fn comparable(score: f64) -> DifferentiationScore {
        DifferentiationScore {
            score,
            comparable: true,
        }
    }

    #[test]
    fn test_affirmative_when_nothing_fires() {
        let mut characters = BTreeMap::new();
        characters.insert(
            "Alice".to_string(),
            character(&["I will go now.", "I will go now."]),
        );
        let suggestions = generate(&characters, comparable(0.9), &VoiceConfig::default());
        assert_eq!(suggestions, vec![WELL_DEVELOPED.to_string()]);
    }

    #[test]
    fn test_too_similar_comes_first() {
        let mut characters = BTreeMap::new();
        characters.insert("Alice".to_string(), character(&["Hi."]));
        let suggestions = generate(&characters, comparable(0.1), &VoiceConfig::default());
        assert_eq!(suggestions[0], TOO_SIMILAR);
        assert!(suggestions[1].starts_with("Alice has very little dialogue."));
    }

    #[test]
    fn test_single_voice_counts_as_too_similar() {
        let mut characters = BTreeMap::new();
        characters.insert(
            "Mara".to_string(),
            character(&["We ride at dawn,", "Bring the horses,"]),
        );
        let suggestions = generate(
            &characters,
            DifferentiationScore::not_comparable(),
            &VoiceConfig::default(),
        );
        assert_eq!(suggestions[0], TOO_SIMILAR);
        assert!(!suggestions.iter().any(|s| s == WELL_DEVELOPED));
    }

    #[test]
    fn test_repetitive_vocabulary() {
        let mut characters = BTreeMap::new();
        characters.insert(
            "Bob".to_string(),
            character(&["No no no no no.", "No no no no no."]),
        );
        let suggestions = generate(&characters, comparable(0.9), &VoiceConfig::default());
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].starts_with("Bob's dialogue uses repetitive vocabulary."));
    }

    #[test]
    fn test_thresholds_come_from_config() {
        let mut characters = BTreeMap::new();
        characters.insert(
            "Alice".to_string(),
            character(&["I will go now.", "I will go now."]),
        );
        let config = VoiceConfig {
            differentiation_threshold: 0.95,
            ..VoiceConfig::default()
        };
        let suggestions = generate(&characters, comparable(0.9), &config);
        assert_eq!(suggestions, vec![TOO_SIMILAR.to_string()]);
    }
}
