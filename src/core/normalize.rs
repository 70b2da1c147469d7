//! Title normalization for duplicate detection.
//!
//! Converts a free-text event title into the canonical comparison key used to
//! group duplicates: lowercase, no parenthesized qualifiers, no year tokens,
//! no stopwords, no punctuation, single-space separated. Two titles that
//! differ only in year annotation, capitalization, or minor punctuation
//! normalize to the same key. This is a heuristic; false matches are
//! surfaced by downstream review, never auto-corrected.

use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;

/// Stopwords removed from comparison keys.
const STOPWORDS: [&str; 10] = ["the", "of", "and", "in", "at", "on", "to", "a", "an", "for"];

/// Parenthesized substrings (dates, qualifiers) contribute nothing to identity.
static PAREN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));

/// Year ranges such as "1939-1945" or "431-404 bc", after dash folding.
/// The era may be joined by spaces or a hyphen ("431-404-bc").
static YEAR_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,4}\s*-\s*\d{1,4}(?:[\s-]*(?:bce|bc|ad|ce))?\b").expect("valid regex")
});

/// Bare 1-4 digit years with an optional era suffix, joined by spaces or
/// a hyphen ("331 bc", "331-bc").
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,4}(?:[\s-]*(?:bce|bc|ad|ce))?\b").expect("valid regex"));

/// Fold every dash-like character (hyphen variants, en/em dash, minus sign)
/// to a plain ASCII hyphen. Shared with the slug generator.
pub(crate) fn fold_dashes(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
            c => c,
        })
        .collect()
}

/// Compute the canonical comparison key for a title.
///
/// Pure and deterministic; any input maps to some output, possibly the empty
/// string for titles with no alphanumeric content.
pub fn normalize(title: &str) -> String {
    let lower = title.to_lowercase();
    let no_paren = PAREN_RE.replace_all(&lower, " ");
    let dashed = fold_dashes(&no_paren);
    let no_ranges = YEAR_RANGE_RE.replace_all(&dashed, " ");
    let no_years = YEAR_RE.replace_all(&no_ranges, " ");

    // Remaining punctuation becomes whitespace, then tokens are filtered
    // against the stopword list and re-joined with single spaces.
    let cleaned: String = no_years
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| !STOPWORDS.contains(token))
        .join(" ")
}
