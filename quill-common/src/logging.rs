//! Logging utilities for Quill tools.
//!
//! Log lines always go to stderr so that command output written to stdout
//! (JSON reports) stays machine-readable.
//!
//! # Filtering
//!
//! `RUST_LOG` wins when set. Otherwise the base level applies to every target
//! except the ones in [`QUIET_TARGETS`], which are pinned to `warn`.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Targets that are pinned to `warn` regardless of the base level.
pub const QUIET_TARGETS: &[&str] = &["regex", "regex_automata"];

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable, ANSI coloured
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Parse a format name. Anything other than `json` is treated as pretty.
    pub fn parse(name: &str) -> Self {
        if name.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

fn build_directives(log_level: &str, extra_quiet: &[String]) -> String {
    let mut directives = String::from(log_level);

    for target in QUIET_TARGETS {
        directives.push_str(&format!(",{}=warn", target));
    }
    for target in extra_quiet {
        directives.push_str(&format!(",{}=warn", target));
    }

    directives
}

fn build_filter(log_level: &str, extra_quiet: &[String]) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(build_directives(log_level, extra_quiet)))
}

/// Initialize logging with the given level and format.
///
/// # Arguments
///
/// * `log_level` - Base log level (trace, debug, info, warn, error)
/// * `log_format` - "json" for structured JSON, anything else for pretty output
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(log_level: &str, log_format: &str) {
    init_logging_with_exclusions(log_level, log_format, &[]);
}

/// Initialize logging, additionally pinning `excluded_targets` to `warn`.
pub fn init_logging_with_exclusions(
    log_level: &str,
    log_format: &str,
    excluded_targets: &[String],
) {
    let filter = build_filter(log_level, excluded_targets);
    let subscriber = tracing_subscriber::registry().with(filter);

    match LogFormat::parse(log_format) {
        LogFormat::Json => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_target(true)
                .with_file(true)
                .with_line_number(true);
            let _ = subscriber.with(fmt_layer).try_init();
        }
        LogFormat::Pretty => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .with_target(true)
                .with_file(false)
                .with_line_number(false);
            let _ = subscriber.with(fmt_layer).try_init();
        }
    }

    tracing::debug!(
        log_level = %log_level,
        log_format = %log_format,
        quiet_targets = QUIET_TARGETS.len() + excluded_targets.len(),
        "Logging initialized"
    );
}

/// Create a tracing span around one analysis call.
///
/// # Example
///
/// ```ignore
/// let span = analysis_span!("analyze", text_len = text.len());
/// let _enter = span.enter();
/// ```
#[macro_export]
macro_rules! analysis_span {
    ($op:expr) => {
        tracing::debug_span!("voice_analysis", op = $op)
    };
    ($op:expr, $($field:tt)*) => {
        tracing::debug_span!("voice_analysis", op = $op, $($field)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("whatever"), LogFormat::Pretty);
    }

    #[test]
    fn test_directives_pin_quiet_targets() {
        let directives = build_directives("debug", &["quill_voice::extractor".to_string()]);
        assert!(directives.starts_with("debug"));
        assert!(directives.contains("regex=warn"));
        assert!(directives.contains("quill_voice::extractor=warn"));
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        init_logging("info", "pretty");
        init_logging("debug", "json");
    }
}
