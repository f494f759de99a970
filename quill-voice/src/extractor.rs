//! Dialogue Extractor.
//!
//! Finds quoted speech in story text and infers who is talking.
//!
//! Quotes are scanned leftmost-first without overlap: `"…"`, `“…”` and `'…'`
//! (an opening single quote directly after a letter is an apostrophe, not a
//! quote). Speaker rules are tried in a fixed order and the first match wins:
//!
//! 1. `Name said: "…"` directly before the quote
//! 2. `"…," said Name` directly after the quote
//! 3. `Name: "…"` directly before the quote
//! 4. `"…," Name said` directly after the quote
//!
//! Capitalised connectives that open a sentence ("Then", "Finally", "The")
//! are dropped from a captured name, so `Then John replied:` yields `John`.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use quill_common::util::{char_ceil, char_floor};

use crate::types::DialogueInstance;

const SPEECH_VERBS: &str =
    "said|says|asked|asks|replied|replies|whispered|whispers|shouted|shouts|muttered|mutters|exclaimed|exclaims";
const NAME: &str = r"[A-Z][a-z]+(?:\s+[A-Z][a-z]+)?";

/// Sentence-initial words the name pattern picks up but that never name anyone.
const NON_NAME_WORDS: &[&str] = &[
    "a", "after", "an", "and", "as", "at", "before", "but", "finally", "here", "if", "in",
    "later", "meanwhile", "now", "on", "once", "so", "still", "suddenly", "the", "then",
    "there", "when", "while", "yet",
];

static QUOTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?P<double>[^"]+)"|“(?P<curly>[^”]+)”|(?:^|[^\w'])'(?P<single>[^'"]+)'"#)
        .unwrap()
});

static NAME_VERB_BEFORE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"\b({NAME})\s+(?:{SPEECH_VERBS})[:\s]+$")).unwrap()
});

static VERB_NAME_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^[,\s]+(?:{SPEECH_VERBS})\s+({NAME})\b")).unwrap()
});

static NAME_COLON_BEFORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"\b({NAME}):\s*$")).unwrap());

static NAME_VERB_AFTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^[,\s]+({NAME})\s+(?:{SPEECH_VERBS})\b")).unwrap()
});

/// Byte span of one quote: opening mark, content, closing mark.
struct QuoteSpan<'a> {
    open: usize,
    close_end: usize,
    content: &'a str,
}

fn quote_span<'a>(caps: &Captures<'a>) -> Option<QuoteSpan<'a>> {
    let (content, mark_len) = if let Some(m) = caps.name("double") {
        (m, '"'.len_utf8())
    } else if let Some(m) = caps.name("curly") {
        (m, '“'.len_utf8())
    } else {
        (caps.name("single")?, '\''.len_utf8())
    };

    Some(QuoteSpan {
        open: content.start() - mark_len,
        close_end: content.end() + mark_len,
        content: content.as_str(),
    })
}

/// Extracts dialogue instances from raw text.
#[derive(Debug, Clone)]
pub struct DialogueExtractor {
    /// Characters of context captured on each side of a quote
    context_window: usize,
}

impl DialogueExtractor {
    pub fn new(context_window: usize) -> Self {
        Self { context_window }
    }

    /// Extract all dialogue in order of appearance.
    ///
    /// Empty or quote-free text yields an empty vector.
    pub fn extract(&self, text: &str) -> Vec<DialogueInstance> {
        if text.is_empty() {
            return Vec::new();
        }

        QUOTE_PATTERN
            .captures_iter(text)
            .filter_map(|caps| quote_span(&caps))
            .map(|span| {
                let window_start = char_floor(text, span.open, self.context_window);
                let window_end = char_ceil(text, span.close_end, self.context_window);

                let before = &text[window_start..span.open];
                let after = &text[span.close_end..window_end];

                DialogueInstance {
                    text: span.content.trim().to_string(),
                    speaker: identify_speaker(before, after),
                    position: span.open,
                    context: text[window_start..window_end].to_string(),
                }
            })
            .collect()
    }
}

impl Default for DialogueExtractor {
    fn default() -> Self {
        Self::new(50)
    }
}

/// Apply the speaker rules in priority order.
///
/// `before` ends right at the opening quote; `after` starts right after the
/// closing quote.
pub fn identify_speaker(before: &str, after: &str) -> Option<String> {
    let rules: [(&Regex, &str); 4] = [
        (&NAME_VERB_BEFORE, before),
        (&VERB_NAME_AFTER, after),
        (&NAME_COLON_BEFORE, before),
        (&NAME_VERB_AFTER, after),
    ];

    rules.iter().find_map(|(pattern, haystack)| {
        pattern
            .captures(haystack)
            .and_then(|c| c.get(1))
            .and_then(|m| clean_name(m.as_str()))
    })
}

/// Drop connective words from a captured name; `None` if nothing is left.
fn clean_name(raw: &str) -> Option<String> {
    let words: Vec<&str> = raw
        .split_whitespace()
        .filter(|word| !NON_NAME_WORDS.contains(&word.to_ascii_lowercase().as_str()))
        .collect();
    (!words.is_empty()).then(|| words.join(" "))
}
