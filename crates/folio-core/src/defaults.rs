//! Centralized default constants for the folio search subsystem.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates reference these constants instead of defining their own magic
//! numbers.
//!
//! Organized by domain area. When adding new constants, place them in the
//! appropriate section and document the rationale for the chosen value.

// =============================================================================
// TOKENIZATION
// =============================================================================

/// Minimum token length. Shorter fragments are too noisy to index.
pub const MIN_TOKEN_LENGTH: usize = 2;

/// Maximum token length. Longer "words" are almost always data blobs.
pub const MAX_TOKEN_LENGTH: usize = 100;

// =============================================================================
// INDEXING
// =============================================================================

/// Maximum characters of note content stored in the index.
/// Overflow is truncated, not rejected.
pub const MAX_CONTENT_CHARS: usize = 2 * 1024 * 1024;

/// Number of notes processed per batch transaction chunk.
/// Bounds transaction size and isolates one bad note from the rest.
pub const BATCH_SIZE: usize = 1000;

/// Sync counts above this trigger an FTS optimize pass afterwards.
pub const SYNC_OPTIMIZE_THRESHOLD: u64 = 100;

/// Note types whose content is indexed. Everything else stays out of
/// the persistent index entirely.
pub const INDEXABLE_NOTE_TYPES: [&str; 5] = ["text", "code", "mermaid", "canvas", "mindMap"];

// =============================================================================
// SEARCH
// =============================================================================

/// Default number of results returned per search.
pub const DEFAULT_SEARCH_LIMIT: i64 = 100;

/// Hard cap on the number of results a single search may return.
pub const MAX_SEARCH_LIMIT: i64 = 10_000;

/// Maximum compiled FTS query length, guards against pathological input.
pub const MAX_QUERY_LENGTH: usize = 1000;

/// Default snippet context window, in tokens.
pub const DEFAULT_SNIPPET_TOKENS: i64 = 30;

/// Snippet highlight markers.
pub const HIGHLIGHT_START: &str = "<mark>";
pub const HIGHLIGHT_END: &str = "</mark>";

/// Relevance score assigned to protected-note matches, which have no
/// engine-provided rank.
pub const PROTECTED_MATCH_SCORE: f64 = 1.0;

// =============================================================================
// MONITORING
// =============================================================================

/// Queries slower than this are logged with `slow = true`.
pub const SLOW_QUERY_THRESHOLD_MS: u64 = 100;

// =============================================================================
// CONTENT PREPROCESSING
// =============================================================================

/// Recursion depth cap for generic JSON text extraction.
pub const JSON_EXTRACT_MAX_DEPTH: usize = 10;
