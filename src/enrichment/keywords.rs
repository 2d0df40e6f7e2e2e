//! Technical keyword extraction.
//!
//! Pulls error codes, error-number phrases, and known failure vocabulary
//! out of an incident's combined description text. Matches are collected
//! in pattern order and deduplicated on first occurrence, so the same
//! input always yields the same keyword sequence.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// At most this many keywords are kept per incident
pub const MAX_KEYWORDS: usize = 5;

/// Patterns for technical identifiers, tried in order against the
/// uppercased text
static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Short error codes like ERW001 or DB42
        r"\b[A-Z]{2,4}\d{2,4}\b",
        // "ERROR: 1234" style phrases
        r"\bERROR\s*[:\-]?\s*\d+\b",
        // Component plus numeric code, e.g. "SAP 1234"
        r"\b[A-Z]+\s*\d{3,4}\b",
        // HTTP-ish "503 ERROR"
        r"\b\d{3}\s*ERROR\b",
        // Runs of shouting words, often product or subsystem names
        r"\b[A-Z]{3,}(?:\s+[A-Z]{3,})*\b",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("keyword pattern must compile"))
    .collect()
});

/// Failure vocabulary checked by substring containment
const VOCABULARY: [&str; 15] = [
    "TIMEOUT",
    "CONNECTION",
    "DATABASE",
    "LOGIN",
    "AUTH",
    "PERMISSION",
    "DENIED",
    "FAILED",
    "ERROR",
    "EXCEPTION",
    "CRASH",
    "FREEZE",
    "SLOW",
    "LATENCY",
    "UNAVAILABLE",
];

/// Extract up to [`MAX_KEYWORDS`] technical keywords from `text`
pub fn extract_keywords(text: &str) -> Vec<String> {
    let upper = text.to_uppercase();
    let mut seen = HashSet::new();
    let mut keywords = Vec::new();

    for pattern in PATTERNS.iter() {
        for matched in pattern.find_iter(&upper) {
            let keyword = matched.as_str();
            if seen.insert(keyword.to_string()) {
                keywords.push(keyword.to_string());
            }
        }
    }

    for term in VOCABULARY {
        if upper.contains(term) && seen.insert(term.to_string()) {
            keywords.push(term.to_string());
        }
    }

    keywords.truncate(MAX_KEYWORDS);
    keywords
}
