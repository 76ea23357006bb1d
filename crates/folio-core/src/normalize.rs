//! Text normalization and tokenization for search indexing.
//!
//! Normalization strips diacritics and lowercases so that queries match
//! regardless of accents or case. Tokenization splits on word boundaries
//! and additionally decomposes camelCase and snake_case identifiers, which
//! makes code-heavy notes searchable by their parts.

use std::collections::HashSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::defaults::{MAX_TOKEN_LENGTH, MIN_TOKEN_LENGTH};

/// Normalize text for search: NFD decomposition, combining marks stripped,
/// lowercased. Idempotent; empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Tokenize text into a deduplicated set of searchable words.
///
/// Splits on whitespace and punctuation, filters tokens outside
/// `[MIN_TOKEN_LENGTH, MAX_TOKEN_LENGTH]`, and for each surviving word also
/// emits its snake_case parts and camelCase parts, all lowercased.
/// Deterministic: identical input always yields the identical token list
/// (insertion order).
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    let mut push = |token: String, tokens: &mut Vec<String>, seen: &mut HashSet<String>| {
        let len = token.chars().count();
        if (MIN_TOKEN_LENGTH..=MAX_TOKEN_LENGTH).contains(&len) && seen.insert(token.clone()) {
            tokens.push(token);
        }
    };

    for word in text.split(|c: char| !(c.is_alphanumeric() || c == '_')) {
        let len = word.chars().count();
        if !(MIN_TOKEN_LENGTH..=MAX_TOKEN_LENGTH).contains(&len) {
            continue;
        }

        push(word.to_lowercase(), &mut tokens, &mut seen);

        let snake_parts: Vec<&str> = word.split('_').filter(|p| !p.is_empty()).collect();
        if snake_parts.len() > 1 {
            for part in snake_parts {
                push(part.to_lowercase(), &mut tokens, &mut seen);
                for camel in split_camel_case(part) {
                    push(camel.to_lowercase(), &mut tokens, &mut seen);
                }
            }
        } else {
            for camel in split_camel_case(word) {
                push(camel.to_lowercase(), &mut tokens, &mut seen);
            }
        }
    }

    tokens
}

/// Split a camelCase word into parts.
///
/// Boundaries are lowercase→uppercase transitions and uppercase-run→Titlecase
/// transitions, so `XMLParser` splits into `XML`, `Parser`.
pub fn split_camel_case(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut parts = Vec::new();
    let mut current = String::new();

    for i in 0..chars.len() {
        let c = chars[i];
        if !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_uppercase() && c.is_uppercase() && next_is_lower);
            if boundary {
                parts.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        parts.push(current);
    }

    parts
}
