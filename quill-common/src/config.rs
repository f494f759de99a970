//! Configuration management for Quill tools.
//!
//! Configuration lives at `~/.quill/config.json`. Every field has a default,
//! so a missing file or a partial file is fine.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (QUILL_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `QUILL_LOG_LEVEL` → observability.log_level
//! - `QUILL_LOG_FORMAT` → observability.log_format
//! - `QUILL_CONSISTENCY_THRESHOLD` → voice.consistency_threshold
//! - `QUILL_GOOD_CONSISTENCY_THRESHOLD` → voice.good_consistency_threshold
//! - `QUILL_LEXICON_PATH` → voice.lexicon_path

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".quill"),
        |dirs| dirs.home_dir().join(".quill"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Observability
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Base log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "warn".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Voice Analysis
// ============================================================================

/// Tunable thresholds for character voice analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Minimum per-character consistency score considered acceptable.
    #[serde(default = "default_consistency_threshold")]
    pub consistency_threshold: f64,

    /// Overall cross-stage score at or above which voices are "consistent".
    #[serde(default = "default_good_consistency_threshold")]
    pub good_consistency_threshold: f64,

    /// Overall cross-stage score at or above which issues are only "minor".
    #[serde(default = "default_minor_issue_threshold")]
    pub minor_issue_threshold: f64,

    /// Differentiation below this means the cast sounds alike.
    #[serde(default = "default_differentiation_threshold")]
    pub differentiation_threshold: f64,

    /// Aggregated vocabulary richness below this is flagged as repetitive.
    #[serde(default = "default_repetitive_vocabulary_threshold")]
    pub repetitive_vocabulary_threshold: f64,

    /// Characters of surrounding text captured on each side of a quote.
    #[serde(default = "default_context_window")]
    pub context_window: usize,

    /// Maximum characters kept in a dialogue preview.
    #[serde(default = "default_preview_length")]
    pub preview_length: usize,

    /// Optional JSON lexicon replacing the built-in word lists.
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            consistency_threshold: default_consistency_threshold(),
            good_consistency_threshold: default_good_consistency_threshold(),
            minor_issue_threshold: default_minor_issue_threshold(),
            differentiation_threshold: default_differentiation_threshold(),
            repetitive_vocabulary_threshold: default_repetitive_vocabulary_threshold(),
            context_window: default_context_window(),
            preview_length: default_preview_length(),
            lexicon_path: None,
        }
    }
}

impl VoiceConfig {
    /// Lexicon path with `~` and `$VARS` expanded.
    pub fn resolved_lexicon_path(&self) -> Option<PathBuf> {
        self.lexicon_path.as_ref().map(|p| {
            let raw = p.to_string_lossy();
            PathBuf::from(shellexpand::full(&raw).map_or_else(|_| raw.to_string(), |s| s.into_owned()))
        })
    }
}

fn default_consistency_threshold() -> f64 {
    0.7
}

fn default_good_consistency_threshold() -> f64 {
    0.8
}

fn default_minor_issue_threshold() -> f64 {
    0.6
}

fn default_differentiation_threshold() -> f64 {
    0.3
}

fn default_repetitive_vocabulary_threshold() -> f64 {
    0.4
}

fn default_context_window() -> usize {
    50
}

fn default_preview_length() -> usize {
    100
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration shared by Quill binaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuillConfig {
    #[serde(default)]
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub voice: VoiceConfig,
}

impl QuillConfig {
    /// Load configuration from the default path, falling back to defaults.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Load configuration (explicit path or default) and apply environment overrides.
    pub fn load_with_env(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `QUILL_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("QUILL_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Some(format) = lookup("QUILL_LOG_FORMAT") {
            self.observability.log_format = format;
        }
        if let Some(raw) = lookup("QUILL_CONSISTENCY_THRESHOLD") {
            match raw.parse() {
                Ok(v) => self.voice.consistency_threshold = v,
                Err(_) => tracing::warn!(value = %raw, "Ignoring invalid QUILL_CONSISTENCY_THRESHOLD"),
            }
        }
        if let Some(raw) = lookup("QUILL_GOOD_CONSISTENCY_THRESHOLD") {
            match raw.parse() {
                Ok(v) => self.voice.good_consistency_threshold = v,
                Err(_) => {
                    tracing::warn!(value = %raw, "Ignoring invalid QUILL_GOOD_CONSISTENCY_THRESHOLD")
                }
            }
        }
        if let Some(path) = lookup("QUILL_LEXICON_PATH") {
            self.voice.lexicon_path = Some(PathBuf::from(path));
        }
    }
}
