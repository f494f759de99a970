//! Quill Voice - Character voice analysis for narrative text.
//!
//! This crate provides:
//! - Dialogue extraction with speaker inference
//! - Per-line speech pattern profiles (vocabulary, sentence structure, rhythm, dialect)
//! - Per-character voice aggregation and consistency scoring
//! - Cast-level differentiation and per-character distinctiveness
//! - Writing suggestions
//! - Draft-to-revision voice drift reports
//!
//! Every analysis operation is synchronous and total: malformed or empty text
//! degrades to empty results instead of errors.
//!
//! ```
//! use quill_voice::VoiceAnalyzer;
//!
//! let analyzer = VoiceAnalyzer::new();
//! let result = analyzer.analyze(r#""Hello," Alice said. "Hi," Bob replied."#, None);
//! assert_eq!(result.overall.characters_with_dialogue, 2);
//! ```

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod analyzer;
pub mod consistency;
pub mod differentiation;
pub mod extractor;
pub mod lexicon;
pub mod patterns;
pub mod profile;
pub mod stages;
pub mod stats;
pub mod suggestions;
pub mod types;

pub use analyzer::{analyze_character_voices, validate_voices, VoiceAnalyzer};
pub use extractor::DialogueExtractor;
pub use lexicon::Lexicon;
pub use patterns::{count_words, SpeechPatternAnalyzer};
pub use stages::{compare_stages, StageComparator};
pub use types::*;
