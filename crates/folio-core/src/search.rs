//! Search result and report types shared across the folio crates.

use serde::{Deserialize, Serialize};

use crate::defaults;

/// A single ranked search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMatch {
    pub note_id: String,
    pub title: String,
    /// Normalized positive relevance (`-rank` from the engine; higher is
    /// better). Protected-path matches carry a fixed placeholder score.
    pub score: f64,
    /// Highlighted context extract, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// Pagination and snippet options for a search call.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub limit: i64,
    pub offset: i64,
    pub include_snippets: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            limit: defaults::DEFAULT_SEARCH_LIMIT,
            offset: 0,
            include_snippets: false,
        }
    }
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_snippets(mut self) -> Self {
        self.include_snippets = true;
        self
    }
}

/// Counters from an index integrity check.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrityStats {
    /// Indexable, non-deleted, non-protected notes in the note store.
    pub total_notes: i64,
    /// Notes currently present in the search index.
    pub indexed_notes: i64,
    /// Indexable notes absent from the index.
    pub missing_from_index: i64,
    /// Index entries whose source note no longer exists.
    pub orphaned_entries: i64,
    /// Index entries with no corresponding token rows.
    pub token_desynced: i64,
}

/// Structured report from an index integrity check; not an error.
///
/// Callers act on a failed report by triggering a sync or rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityReport {
    pub valid: bool,
    pub issues: Vec<String>,
    pub stats: IntegrityStats,
}

/// Basic statistics about the persistent index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_documents: i64,
    /// Best-effort byte estimate; exact when the dbstat virtual table is
    /// available, otherwise derived from average row size.
    pub index_size_estimate: i64,
}

/// Aggregate outcome of a batch indexing run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchIndexOutcome {
    pub indexed: usize,
    pub errors: usize,
    pub elapsed_ms: u64,
    /// True when the run stopped early via the cancellation flag.
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_options_builder() {
        let opts = SearchOptions::new().with_limit(10).with_offset(5).with_snippets();
        assert_eq!(opts.limit, 10);
        assert_eq!(opts.offset, 5);
        assert!(opts.include_snippets);
    }

    #[test]
    fn test_search_options_defaults() {
        let opts = SearchOptions::default();
        assert_eq!(opts.limit, 100);
        assert_eq!(opts.offset, 0);
        assert!(!opts.include_snippets);
    }

    #[test]
    fn test_search_match_serializes_without_empty_snippet() {
        let hit = SearchMatch {
            note_id: "n1".to_string(),
            title: "Title".to_string(),
            score: 2.5,
            snippet: None,
        };
        let json = serde_json::to_string(&hit).unwrap();
        assert!(!json.contains("snippet"));
    }
}
