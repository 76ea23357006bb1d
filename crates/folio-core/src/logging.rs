//! Structured logging schema and field name constants for folio.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events, operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data (tokens, hits) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "search", "index", "db", "crypto"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "fts", "index_writer", "maintenance", "protected_scanner"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "search", "upsert", "rebuild", "verify"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Note ID being operated on.
pub const NOTE_ID: &str = "note_id";

/// Compiled FTS query text.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a search or query.
pub const RESULT_COUNT: &str = "result_count";

/// Number of notes processed in a batch operation.
pub const BATCH_COUNT: &str = "batch_count";

/// Number of tokens emitted for a note.
pub const TOKEN_COUNT: &str = "token_count";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Slow operation threshold exceeded.
pub const SLOW: &str = "slow";
