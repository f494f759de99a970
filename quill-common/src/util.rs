//! Small text and number helpers shared by Quill crates.

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Works on character boundaries, so multi-byte text never splits mid-character.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// Byte index of the char boundary `n` characters before `end` (clamped to 0).
pub fn char_floor(s: &str, end: usize, n: usize) -> usize {
    if n == 0 {
        return end;
    }
    s[..end]
        .char_indices()
        .rev()
        .nth(n - 1)
        .map_or(0, |(idx, _)| idx)
}

/// Byte index of the char boundary `n` characters after `start` (clamped to `s.len()`).
pub fn char_ceil(s: &str, start: usize, n: usize) -> usize {
    s[start..]
        .char_indices()
        .nth(n)
        .map_or(s.len(), |(idx, _)| start + idx)
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
