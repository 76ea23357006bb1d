//! Index-owned schema.
//!
//! Three tables, all derived entirely from the note store and safely
//! regenerable at any time (they are a cache, never a source of truth):
//!
//! - `notes_fts` — FTS5 virtual table mirroring noteId/title/content with
//!   porter stemming and prefix indexes for starts-with queries.
//! - `note_search_content` — raw plus normalized title/content per note,
//!   used for substring fallback matching (negation path).
//! - `note_tokens` — per-note token rows with position and provenance,
//!   fully regenerated on every content update.
//!
//! Protected note content is never written to any of these.

use sqlx::SqlitePool;
use tracing::info;

use folio_core::Result;

/// Create the index-owned tables if they do not exist.
///
/// Idempotent; safe to call at every startup. The note store's own tables
/// (`notes`, `blobs`) belong to the storage collaborator and are not
/// created here.
pub async fn init_index_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE VIRTUAL TABLE IF NOT EXISTS notes_fts USING fts5(
            note_id UNINDEXED,
            title,
            content,
            tokenize = 'porter unicode61',
            prefix = '2 3 4'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS note_search_content (
            note_id TEXT PRIMARY KEY,
            title TEXT NOT NULL DEFAULT '',
            content TEXT NOT NULL DEFAULT '',
            title_normalized TEXT NOT NULL DEFAULT '',
            content_normalized TEXT NOT NULL DEFAULT '',
            full_text_normalized TEXT NOT NULL DEFAULT ''
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS note_tokens (
            note_id TEXT NOT NULL,
            token TEXT NOT NULL,
            token_normalized TEXT NOT NULL,
            position INTEGER NOT NULL,
            source TEXT NOT NULL DEFAULT 'content'
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_note_tokens_note_id ON note_tokens (note_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_note_tokens_token ON note_tokens (token_normalized)")
        .execute(pool)
        .await?;

    info!(
        subsystem = "db",
        component = "schema",
        op = "init",
        "Search index schema ready"
    );

    Ok(())
}
