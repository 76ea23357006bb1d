//! In-memory scanning of protected notes.
//!
//! Protected note content never enters the persistent index. When a
//! protected session is unlocked, searches scan these notes by decrypting
//! each candidate in memory, matching against the decrypted text, and
//! dropping the plaintext immediately. Without a session the scan yields
//! nothing; protected notes are simply invisible.

use std::sync::Arc;

use tracing::{debug, warn};

use folio_core::defaults::PROTECTED_MATCH_SCORE;
use folio_core::{
    normalize, preprocess_content, Note, NoteSource, ProtectedSession, Result, SearchMatch,
    SearchOperator,
};
use folio_db::NoteStore;

/// Scans protected notes by decrypting them in memory.
pub struct ProtectedScanner {
    store: NoteStore,
    session: Arc<dyn ProtectedSession>,
}

impl ProtectedScanner {
    pub fn new(store: NoteStore, session: Arc<dyn ProtectedSession>) -> Self {
        Self { store, session }
    }

    /// Scan protected notes for the given tokens.
    ///
    /// Returns an empty list when no session is unlocked. Notes whose
    /// content fails to decrypt are skipped; one bad envelope must not hide
    /// the rest of the protected set.
    pub async fn search(
        &self,
        tokens: &[String],
        operator: SearchOperator,
        scope: Option<&[String]>,
    ) -> Result<Vec<SearchMatch>> {
        if !self.session.is_available() {
            debug!(
                subsystem = "search",
                component = "protected_scanner",
                "no protected session, skipping protected notes"
            );
            return Ok(Vec::new());
        }

        let normalized_tokens: Vec<String> = tokens.iter().map(|t| normalize(t)).collect();
        let candidates = self.store.fetch_protected_notes(scope).await?;

        let mut matches = Vec::new();
        let mut decrypt_failures = 0usize;
        for note in &candidates {
            let Some(plaintext) = self.decrypt_note(note) else {
                decrypt_failures += 1;
                continue;
            };

            let text = preprocess_content(&plaintext.content, note.note_type, &note.mime);
            let haystack = normalize(&format!("{} {}", plaintext.title, text));

            if matches_operator(&haystack, &normalized_tokens, operator) {
                matches.push(SearchMatch {
                    note_id: note.note_id.clone(),
                    title: plaintext.title,
                    score: PROTECTED_MATCH_SCORE,
                    snippet: Some(generate_snippet(&text)),
                });
            }
        }

        if decrypt_failures > 0 {
            warn!(
                subsystem = "search",
                component = "protected_scanner",
                batch_count = decrypt_failures,
                "skipped protected notes that failed to decrypt"
            );
        }

        debug!(
            subsystem = "search",
            component = "protected_scanner",
            result_count = matches.len(),
            "protected scan completed"
        );
        Ok(matches)
    }

    /// Decrypt a protected note's title and content.
    ///
    /// Content is required; a title that fails to decrypt falls back to the
    /// stored form so the note is still reachable by its content.
    fn decrypt_note(&self, note: &Note) -> Option<Plaintext> {
        let encrypted_content = note.content.as_deref()?;
        let content = self.session.decrypt_string(encrypted_content)?;
        let title = self
            .session
            .decrypt_string(&note.title)
            .unwrap_or_else(|| note.title.clone());
        Some(Plaintext { title, content })
    }
}

struct Plaintext {
    title: String,
    content: String,
}

/// Evaluate an operator against normalized text, mirroring the persistent
/// executor's semantics as closely as in-memory matching allows.
pub fn matches_operator(haystack: &str, tokens: &[String], operator: SearchOperator) -> bool {
    if tokens.is_empty() {
        return false;
    }
    match operator {
        SearchOperator::ExactPhrase => haystack.contains(&tokens.join(" ")),
        SearchOperator::ContainsAll => tokens.iter().all(|t| haystack.contains(t.as_str())),
        SearchOperator::NotContains => !tokens.iter().any(|t| haystack.contains(t.as_str())),
        SearchOperator::StartsWith => {
            let words: Vec<&str> = haystack.split_whitespace().collect();
            tokens
                .iter()
                .all(|t| words.iter().any(|w| w.starts_with(t.as_str())))
        }
        SearchOperator::EndsWith => {
            let words: Vec<&str> = haystack.split_whitespace().collect();
            tokens
                .iter()
                .all(|t| words.iter().any(|w| w.ends_with(t.as_str())))
        }
        SearchOperator::FuzzyAny | SearchOperator::FuzzyContains => {
            tokens.iter().any(|t| haystack.contains(t.as_str()))
        }
    }
}

/// Build a plain-text snippet from already tag-stripped content.
///
/// Protected results cannot use the engine's highlighter (their text is not
/// in the index), so the snippet is a simple truncated extract.
pub fn generate_snippet(text: &str) -> String {
    const MAX_SNIPPET_CHARS: usize = 300;

    let collapsed: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_SNIPPET_CHARS {
        return collapsed;
    }
    let truncated: String = collapsed.chars().take(MAX_SNIPPET_CHARS).collect();
    format!("{}...", truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_exact_phrase_is_substring_match() {
        assert!(matches_operator(
            "the quick brown fox",
            &toks(&["quick", "brown"]),
            SearchOperator::ExactPhrase
        ));
        assert!(!matches_operator(
            "the quick red brown fox",
            &toks(&["quick", "brown"]),
            SearchOperator::ExactPhrase
        ));
    }

    #[test]
    fn test_contains_all_needs_every_token() {
        assert!(matches_operator(
            "alpha beta gamma",
            &toks(&["alpha", "gamma"]),
            SearchOperator::ContainsAll
        ));
        assert!(!matches_operator(
            "alpha beta",
            &toks(&["alpha", "gamma"]),
            SearchOperator::ContainsAll
        ));
    }

    #[test]
    fn test_not_contains_rejects_any_hit() {
        assert!(matches_operator(
            "delta epsilon",
            &toks(&["alpha"]),
            SearchOperator::NotContains
        ));
        assert!(!matches_operator(
            "delta alpha",
            &toks(&["alpha", "zeta"]),
            SearchOperator::NotContains
        ));
    }

    #[test]
    fn test_prefix_and_suffix_match_on_word_boundaries() {
        assert!(matches_operator(
            "alphabet soup",
            &toks(&["alpha"]),
            SearchOperator::StartsWith
        ));
        assert!(!matches_operator(
            "soup alphabet",
            &toks(&["bet"]),
            SearchOperator::StartsWith
        ));
        assert!(matches_operator(
            "soup alphabet",
            &toks(&["bet"]),
            SearchOperator::EndsWith
        ));
    }

    #[test]
    fn test_fuzzy_matches_any_token() {
        assert!(matches_operator(
            "only gamma here",
            &toks(&["alpha", "gamma"]),
            SearchOperator::FuzzyAny
        ));
        assert!(!matches_operator(
            "nothing relevant",
            &toks(&["alpha", "gamma"]),
            SearchOperator::FuzzyContains
        ));
    }

    #[test]
    fn test_empty_token_list_never_matches() {
        assert!(!matches_operator("anything", &[], SearchOperator::ContainsAll));
    }

    #[test]
    fn test_snippet_collapses_whitespace_and_truncates() {
        assert_eq!(generate_snippet("a  b\n\nc"), "a b c");

        let long = "word ".repeat(100);
        let snippet = generate_snippet(&long);
        assert!(snippet.ends_with("..."));
        assert_eq!(snippet.chars().count(), 303);
    }
}
