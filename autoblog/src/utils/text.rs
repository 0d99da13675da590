//! Deterministic text analysis for drafts and final content.

use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

static ATX_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ ]{0,3}#{1,6}[ \t]+(.+?)[ \t]*#*[ \t]*$").expect("heading pattern is valid")
});

/// Counts whitespace-separated words.
#[must_use]
pub fn count_words(content: &str) -> usize {
    content.split_whitespace().count()
}

/// Extracts Markdown ATX headings (`#` to `######`) in document order.
///
/// Trailing closing hashes are stripped and empty headings skipped.
#[must_use]
pub fn extract_headings(content: &str) -> Vec<String> {
    ATX_HEADING
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches('#').trim().to_string())
        .filter(|h| !h.is_empty())
        .collect()
}

/// Returns the distinct `open…close` spans in `content`, in order of first appearance.
///
/// Spans are matched non-greedily and may cross line breaks. An opening
/// delimiter without a matching close is ignored.
#[must_use]
pub fn scan_placeholders(content: &str, open: &str, close: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    if open.is_empty() || close.is_empty() {
        return found;
    }

    let mut cursor = 0;
    while let Some(start) = content[cursor..].find(open).map(|i| cursor + i) {
        let body_start = start + open.len();
        let Some(end) = content[body_start..].find(close).map(|i| body_start + i) else {
            break;
        };
        let span_end = end + close.len();
        let span = &content[start..span_end];
        if !found.iter().any(|f| f == span) {
            found.push(span.to_string());
        }
        cursor = span_end;
    }

    found
}

/// Collapses runs of whitespace into single spaces.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Bounds a meta description to `max_chars` characters.
///
/// Whitespace is collapsed first. An over-long description is cut on a char
/// boundary and backed off to the last word break, as long as that keeps at
/// least half of the bound.
#[must_use]
pub fn truncate_meta_description(text: &str, max_chars: usize) -> String {
    let normalized = normalize_whitespace(text);
    if normalized.chars().count() <= max_chars {
        return normalized;
    }

    let cut: String = normalized.chars().take(max_chars).collect();
    let cut_len = cut.chars().count();
    let next_is_break = normalized.chars().nth(max_chars).is_some_and(char::is_whitespace);
    if next_is_break {
        return cut.trim_end().to_string();
    }

    match cut.rfind(' ') {
        Some(idx) if cut[..idx].chars().count() * 2 >= cut_len => cut[..idx].trim_end().to_string(),
        _ => cut.trim_end().to_string(),
    }
}

/// Derives a meta description from the first prose paragraph of `content`.
#[must_use]
pub fn derive_meta_description(content: &str, max_chars: usize) -> String {
    let content = content.replace("\r\n", "\n").replace('\r', "\n");
    let paragraph = content
        .split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty() && !p.starts_with('#'))
        .unwrap_or("");
    truncate_meta_description(paragraph, max_chars)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Counts case-insensitive whole-word occurrences of `needle` in `haystack`.
///
/// A match must not touch a letter, digit or underscore on either side, so
/// "AI" is not found in "maintain".
#[must_use]
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    let needle = needle.trim();
    if needle.is_empty() {
        return 0;
    }
    let Ok(pattern) = RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
    else {
        return 0;
    };

    pattern
        .find_iter(haystack)
        .filter(|m| {
            let before = haystack[..m.start()].chars().next_back();
            let after = haystack[m.end()..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
        .count()
}
