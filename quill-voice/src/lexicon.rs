//! Word lists used by speech pattern analysis.
//!
//! The lists are data, not code: [`Lexicon::builtin`] carries version "1",
//! which reproduces the reference membership exactly, and a replacement can
//! be loaded from JSON.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

const STOPWORDS_V1: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "from", "as", "is", "was", "are", "were", "be", "been", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "must", "can", "this", "that",
    "these", "those", "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us",
    "them", "my", "your", "his", "its", "our", "their", "what", "which", "who", "whom", "whose",
    "where", "when", "why", "how", "all", "each", "every", "both", "few", "more", "most",
    "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too",
    "very", "just", "now",
];

const SLANG_V1: &[&str] = &[
    "yeah", "yep", "nah", "nope", "gonna", "wanna", "gotta", "lemme", "dunno", "ain't",
    "cain't", "don't", "can't", "won't",
];

const CONJUNCTIONS_V1: &[&str] = &[
    "and", "or", "but", "because", "since", "although", "while", "if", "when", "where",
];

/// Versioned word lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    /// Identifies the list revision a result was computed with.
    pub version: String,
    /// High-frequency function words ("common words").
    pub stopwords: BTreeSet<String>,
    /// Casual contractions and fillers reported as dialect markers.
    pub slang: Vec<String>,
    /// Conjunctions counted toward sentence complexity.
    pub conjunctions: BTreeSet<String>,
}

impl Lexicon {
    /// The built-in version "1" lists.
    pub fn builtin() -> Self {
        Self {
            version: "1".to_string(),
            stopwords: STOPWORDS_V1.iter().map(|w| w.to_string()).collect(),
            slang: SLANG_V1.iter().map(|w| w.to_string()).collect(),
            conjunctions: CONJUNCTIONS_V1.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Load a lexicon from a JSON file.
    ///
    /// Entries are lower-cased so they line up with case-folded tokens.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read lexicon from {}", path.display()))?;
        let raw: Lexicon = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse lexicon from {}", path.display()))?;
        Ok(raw.normalized())
    }

    fn normalized(self) -> Self {
        Self {
            version: self.version,
            stopwords: self.stopwords.iter().map(|w| w.to_lowercase()).collect(),
            slang: self
                .slang
                .iter()
                .map(|w| w.trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
            conjunctions: self.conjunctions.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn is_conjunction(&self, token: &str) -> bool {
        self.conjunctions.contains(token)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}
