//! Quill Common - Shared types, utilities, and configuration for the Quill story tools.
//!
//! This crate provides:
//! - Configuration types and loading
//! - Configuration validation
//! - Error types and handling utilities
//! - Logging setup and structured logging helpers
//! - Small text utilities shared across Quill crates

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;
pub mod util;
pub mod validation;

pub use config::{ObservabilityConfig, QuillConfig, VoiceConfig};
pub use error::{Error, Result};
pub use validation::{Validate, ValidationError, ValidationResult};

