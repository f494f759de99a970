//! Configuration validation for Quill tools.
//!
//! Thresholds are scores in [0, 1]; window sizes must be non-zero.

use thiserror::Error;

use crate::config::{ObservabilityConfig, QuillConfig, VoiceConfig};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Configuration conflict: {reason}")]
    Conflict { reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

fn collect(mut errors: Vec<ValidationError>) -> ValidationResult<()> {
    if errors.is_empty() {
        Ok(())
    } else if errors.len() == 1 {
        Err(errors.remove(0))
    } else {
        Err(ValidationError::Multiple(errors))
    }
}

fn check_unit_interval(field: &str, value: f64, errors: &mut Vec<ValidationError>) {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        errors.push(ValidationError::InvalidValue {
            field: field.to_string(),
            reason: format!("{value} is not within [0, 1]"),
        });
    }
}

impl Validate for VoiceConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        check_unit_interval("voice.consistency_threshold", self.consistency_threshold, &mut errors);
        check_unit_interval(
            "voice.good_consistency_threshold",
            self.good_consistency_threshold,
            &mut errors,
        );
        check_unit_interval("voice.minor_issue_threshold", self.minor_issue_threshold, &mut errors);
        check_unit_interval(
            "voice.differentiation_threshold",
            self.differentiation_threshold,
            &mut errors,
        );
        check_unit_interval(
            "voice.repetitive_vocabulary_threshold",
            self.repetitive_vocabulary_threshold,
            &mut errors,
        );

        if self.minor_issue_threshold > self.good_consistency_threshold {
            errors.push(ValidationError::Conflict {
                reason: format!(
                    "voice.minor_issue_threshold ({}) exceeds voice.good_consistency_threshold ({})",
                    self.minor_issue_threshold, self.good_consistency_threshold
                ),
            });
        }

        if self.context_window == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "voice.context_window".into(),
                reason: "must be greater than zero".into(),
            });
        }

        if self.preview_length == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "voice.preview_length".into(),
                reason: "must be greater than zero".into(),
            });
        }

        collect(errors)
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        const LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
        const FORMATS: &[&str] = &["pretty", "json"];

        let mut errors = Vec::new();
        if !LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            errors.push(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("expected one of {LEVELS:?}"),
            });
        }
        if !FORMATS.contains(&self.log_format.to_lowercase().as_str()) {
            errors.push(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("expected one of {FORMATS:?}"),
            });
        }
        collect(errors)
    }
}

impl Validate for QuillConfig {
    fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();
        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }
        if let Err(e) = self.voice.validate() {
            errors.push(e);
        }
        collect(errors)
    }
}
