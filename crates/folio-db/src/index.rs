//! Index writer: keeps the persistent search index in step with note CRUD.
//!
//! Every upsert fully regenerates a note's index state (search content row,
//! token rows, FTS document) inside a single transaction, so concurrent
//! readers see either the fully-old or fully-new state, never a mix.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use sqlx::SqlitePool;
use tracing::{debug, error, info, warn};

use folio_core::{
    normalize, preprocess_content, tokenize, BatchIndexOutcome, Error, IndexConfig, NoteSource,
    NoteType, Result,
};

use crate::notes::NoteStore;

/// Fully derived index state for one note, ready to be written.
pub(crate) struct IndexDocument {
    pub title: String,
    pub content: String,
    pub title_normalized: String,
    pub content_normalized: String,
    pub full_text_normalized: String,
    pub tokens: Vec<String>,
}

/// Derive a note's index state: preprocess, truncate at the content cap
/// (logged), normalize, tokenize. Single derivation path shared by the
/// writer and the rebuild so the two cannot drift.
pub(crate) fn derive_document(
    note_id: &str,
    title: &str,
    note_type: NoteType,
    mime: &str,
    raw: &str,
    config: &IndexConfig,
) -> IndexDocument {
    let mut content = preprocess_content(raw, note_type, mime);

    let content_chars = content.chars().count();
    if content_chars > config.max_content_chars {
        info!(
            subsystem = "index",
            component = "index_writer",
            note_id,
            content_chars,
            cap = config.max_content_chars,
            "content exceeds max size, truncating"
        );
        content = content.chars().take(config.max_content_chars).collect();
    }

    let title_normalized = normalize(title);
    let content_normalized = normalize(&content);
    let full_text_normalized = format!("{} {}", title_normalized, content_normalized);
    let tokens = tokenize(&format!("{} {}", title, content));

    IndexDocument {
        title: title.to_string(),
        content,
        title_normalized,
        content_normalized,
        full_text_normalized,
        tokens,
    }
}

/// Writes note content into the persistent search index.
pub struct IndexWriter {
    pool: SqlitePool,
    store: NoteStore,
    config: IndexConfig,
}

impl IndexWriter {
    /// Create a new IndexWriter over the given pool.
    pub fn new(pool: SqlitePool, config: IndexConfig) -> Self {
        let store = NoteStore::new(pool.clone());
        Self {
            pool,
            store,
            config,
        }
    }

    /// Create or refresh the index entry for a note.
    ///
    /// Notes that are deleted, protected, or of a non-indexable type have
    /// their index state removed instead: index existence tracks
    /// indexability exactly.
    pub async fn upsert(&self, note_id: &str) -> Result<()> {
        let note = match self.store.get_note(note_id).await {
            Ok(Some(note)) => note,
            Ok(None) => {
                debug!(
                    subsystem = "index",
                    component = "index_writer",
                    note_id,
                    "note not found, clearing any index state"
                );
                return self.delete(note_id).await;
            }
            Err(e) => {
                return Err(Error::IndexWrite {
                    note_id: note_id.to_string(),
                    message: format!("note read failed: {e}"),
                })
            }
        };

        if !note.is_indexable() {
            return self.delete(note_id).await;
        }

        let raw = note.content.unwrap_or_default();
        let doc = derive_document(
            note_id,
            &note.title,
            note.note_type,
            &note.mime,
            &raw,
            &self.config,
        );

        let result: std::result::Result<(), sqlx::Error> = async {
            let mut tx = self.pool.begin().await?;

            sqlx::query(
                r#"
                INSERT OR REPLACE INTO note_search_content
                (note_id, title, content, title_normalized, content_normalized, full_text_normalized)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(note_id)
            .bind(&doc.title)
            .bind(&doc.content)
            .bind(&doc.title_normalized)
            .bind(&doc.content_normalized)
            .bind(&doc.full_text_normalized)
            .execute(&mut *tx)
            .await?;

            sqlx::query("DELETE FROM note_tokens WHERE note_id = ?")
                .bind(note_id)
                .execute(&mut *tx)
                .await?;

            for (position, token) in doc.tokens.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO note_tokens (note_id, token, token_normalized, position, source)
                    VALUES (?, ?, ?, ?, 'content')
                    "#,
                )
                .bind(note_id)
                .bind(token)
                .bind(normalize(token))
                .bind(position as i64)
                .execute(&mut *tx)
                .await?;
            }

            sqlx::query("DELETE FROM notes_fts WHERE note_id = ?")
                .bind(note_id)
                .execute(&mut *tx)
                .await?;

            sqlx::query("INSERT INTO notes_fts (note_id, title, content) VALUES (?, ?, ?)")
                .bind(note_id)
                .bind(&doc.title)
                .bind(&doc.content)
                .execute(&mut *tx)
                .await?;

            tx.commit().await
        }
        .await;

        result.map_err(|e| Error::IndexWrite {
            note_id: note_id.to_string(),
            message: e.to_string(),
        })?;

        debug!(
            subsystem = "index",
            component = "index_writer",
            note_id,
            token_count = doc.tokens.len(),
            "index entry updated"
        );

        Ok(())
    }

    /// Remove a note's index state. Idempotent.
    pub async fn delete(&self, note_id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM note_search_content WHERE note_id = ?")
            .bind(note_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM note_tokens WHERE note_id = ?")
            .bind(note_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM notes_fts WHERE note_id = ?")
            .bind(note_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Index many notes in bounded chunks.
    ///
    /// Per-note failures are logged and counted, never propagated; one bad
    /// note must not block its siblings. The optional cancellation flag is
    /// checked between chunks, which are the safe interruption points.
    pub async fn batch_upsert(
        &self,
        note_ids: &[String],
        cancel: Option<&AtomicBool>,
    ) -> Result<BatchIndexOutcome> {
        let start = Instant::now();
        let mut outcome = BatchIndexOutcome::default();

        for chunk in note_ids.chunks(self.config.batch_size) {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    warn!(
                        subsystem = "index",
                        component = "index_writer",
                        op = "batch_upsert",
                        indexed = outcome.indexed,
                        "batch indexing cancelled"
                    );
                    outcome.cancelled = true;
                    break;
                }
            }

            for note_id in chunk {
                match self.upsert(note_id).await {
                    Ok(()) => outcome.indexed += 1,
                    Err(e) => {
                        error!(
                            subsystem = "index",
                            component = "index_writer",
                            op = "batch_upsert",
                            note_id = note_id.as_str(),
                            error = %e,
                            "failed to index note"
                        );
                        outcome.errors += 1;
                    }
                }
            }
        }

        outcome.elapsed_ms = start.elapsed().as_millis() as u64;
        info!(
            subsystem = "index",
            component = "index_writer",
            op = "batch_upsert",
            indexed = outcome.indexed,
            errors = outcome.errors,
            duration_ms = outcome.elapsed_ms,
            "batch indexing completed"
        );

        Ok(outcome)
    }

    /// The configuration this writer runs with.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }
}
