//! Index consistency management: verify, sync, rebuild, optimize.
//!
//! The index is a cache over the note store, so every inconsistency is
//! repairable: missing entries get synced, orphans removed by a rebuild.
//! Nothing here is a source of truth.

use std::time::Instant;

use sqlx::{Row, SqlitePool};
use tracing::{error, info, warn};

use folio_core::models::indexable_types_sql_list;
use folio_core::{
    normalize, IndexConfig, IndexStats, IntegrityReport, IntegrityStats, NoteType, Result,
};

use crate::index::{derive_document, IndexWriter};

/// Maintenance operations over the persistent search index.
pub struct IndexMaintenance {
    pool: SqlitePool,
    writer: IndexWriter,
    config: IndexConfig,
}

impl IndexMaintenance {
    /// Create a new IndexMaintenance over the given pool.
    pub fn new(pool: SqlitePool, config: IndexConfig) -> Self {
        let writer = IndexWriter::new(pool.clone(), config.clone());
        Self {
            pool,
            writer,
            config,
        }
    }

    /// Check index integrity against the note store.
    ///
    /// Returns a structured report, never an error for inconsistencies:
    /// callers act on `valid = false` by running [`sync_missing`] or
    /// [`rebuild`].
    ///
    /// [`sync_missing`]: Self::sync_missing
    /// [`rebuild`]: Self::rebuild
    pub async fn verify(&self) -> Result<IntegrityReport> {
        let types = indexable_types_sql_list();
        let mut issues = Vec::new();

        let (total_notes,): (i64,) = sqlx::query_as(&format!(
            "SELECT COUNT(*) FROM notes WHERE is_deleted = 0 AND is_protected = 0 AND type IN ({})",
            types
        ))
        .fetch_one(&self.pool)
        .await?;

        let (indexed_notes,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(DISTINCT c.note_id)
            FROM note_search_content c
            JOIN notes n ON n.note_id = c.note_id
            WHERE n.is_deleted = 0
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let missing: Vec<String> = sqlx::query(&format!(
            r#"
            SELECT note_id FROM notes
            WHERE is_deleted = 0 AND is_protected = 0 AND type IN ({})
              AND note_id NOT IN (SELECT note_id FROM note_search_content)
            "#,
            types
        ))
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| row.try_get("note_id"))
        .collect::<std::result::Result<_, _>>()?;

        if !missing.is_empty() {
            issues.push(format!("{} notes missing from search index", missing.len()));
        }

        let orphaned: Vec<String> = sqlx::query(
            r#"
            SELECT note_id FROM note_search_content
            WHERE note_id NOT IN (SELECT note_id FROM notes)
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| row.try_get("note_id"))
        .collect::<std::result::Result<_, _>>()?;

        if !orphaned.is_empty() {
            issues.push(format!("{} orphaned entries in search index", orphaned.len()));
        }

        let (token_desynced,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM note_search_content
            WHERE note_id NOT IN (SELECT note_id FROM note_tokens)
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        if token_desynced > 0 {
            issues.push(format!("{} notes missing from token index", token_desynced));
        }

        Ok(IntegrityReport {
            valid: issues.is_empty(),
            issues,
            stats: IntegrityStats {
                total_notes,
                indexed_notes,
                missing_from_index: missing.len() as i64,
                orphaned_entries: orphaned.len() as i64,
                token_desynced,
            },
        })
    }

    /// Index up to one batch of notes that are missing from the index.
    ///
    /// Idempotent; designed for periodic invocation rather than one-shot
    /// repair. Returns the number of notes synced.
    pub async fn sync_missing(&self) -> Result<u64> {
        let missing: Vec<String> = sqlx::query(&format!(
            r#"
            SELECT note_id FROM notes
            WHERE is_deleted = 0 AND is_protected = 0 AND type IN ({})
              AND note_id NOT IN (SELECT note_id FROM note_search_content)
            LIMIT ?
            "#,
            indexable_types_sql_list()
        ))
        .bind(self.config.batch_size as i64)
        .fetch_all(&self.pool)
        .await?
        .iter()
        .map(|row| row.try_get("note_id"))
        .collect::<std::result::Result<_, _>>()?;

        if missing.is_empty() {
            return Ok(0);
        }

        let mut synced = 0u64;
        for note_id in &missing {
            match self.writer.upsert(note_id).await {
                Ok(()) => synced += 1,
                Err(e) => {
                    error!(
                        subsystem = "index",
                        component = "maintenance",
                        op = "sync_missing",
                        note_id = note_id.as_str(),
                        error = %e,
                        "failed to sync note"
                    );
                }
            }
        }

        info!(
            subsystem = "index",
            component = "maintenance",
            op = "sync_missing",
            batch_count = synced,
            "synced missing notes to search index"
        );

        if synced > self.config.sync_optimize_threshold {
            self.optimize().await?;
        }

        Ok(synced)
    }

    /// Destructive full rebuild of the index from the note store.
    ///
    /// Runs in a single transaction: a crash mid-rebuild leaves the cleared
    /// state, never a half-populated index. Callers retry from scratch on
    /// failure instead of resuming.
    pub async fn rebuild(&self) -> Result<()> {
        info!(
            subsystem = "index",
            component = "maintenance",
            op = "rebuild",
            "rebuilding search index"
        );
        let start = Instant::now();

        let notes = sqlx::query(&format!(
            r#"
            SELECT n.note_id, n.title, n.type, n.mime, b.content
            FROM notes n
            LEFT JOIN blobs b ON n.blob_id = b.blob_id
            WHERE n.is_deleted = 0 AND n.is_protected = 0 AND n.type IN ({})
            "#,
            indexable_types_sql_list()
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM note_search_content")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM note_tokens")
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM notes_fts").execute(&mut *tx).await?;

        let mut rebuilt = 0u64;
        for row in &notes {
            let note_id: String = row.try_get("note_id")?;
            let title: String = row.try_get("title")?;
            let note_type = NoteType::parse(row.try_get::<String, _>("type")?.as_str());
            let mime: String = row.try_get("mime")?;
            let raw: Option<String> = match row.try_get("content") {
                Ok(content) => content,
                Err(e) => {
                    // One unreadable blob must not abort the rebuild
                    warn!(
                        subsystem = "index",
                        component = "maintenance",
                        op = "rebuild",
                        note_id = note_id.as_str(),
                        error = %e,
                        "skipping note with unreadable content"
                    );
                    continue;
                }
            };

            let doc = derive_document(
                &note_id,
                &title,
                note_type,
                &mime,
                &raw.unwrap_or_default(),
                &self.config,
            );

            sqlx::query(
                r#"
                INSERT INTO note_search_content
                (note_id, title, content, title_normalized, content_normalized, full_text_normalized)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&note_id)
            .bind(&doc.title)
            .bind(&doc.content)
            .bind(&doc.title_normalized)
            .bind(&doc.content_normalized)
            .bind(&doc.full_text_normalized)
            .execute(&mut *tx)
            .await?;

            for (position, token) in doc.tokens.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO note_tokens (note_id, token, token_normalized, position, source)
                    VALUES (?, ?, ?, ?, 'content')
                    "#,
                )
                .bind(&note_id)
                .bind(token)
                .bind(normalize(token))
                .bind(position as i64)
                .execute(&mut *tx)
                .await?;
            }

            sqlx::query("INSERT INTO notes_fts (note_id, title, content) VALUES (?, ?, ?)")
                .bind(&note_id)
                .bind(&doc.title)
                .bind(&doc.content)
                .execute(&mut *tx)
                .await?;

            rebuilt += 1;
        }

        sqlx::query("INSERT INTO notes_fts(notes_fts) VALUES('optimize')")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            subsystem = "index",
            component = "maintenance",
            op = "rebuild",
            batch_count = rebuilt,
            duration_ms = start.elapsed().as_millis() as u64,
            "search index rebuild completed"
        );

        Ok(())
    }

    /// Run the engine's merge/optimize pass and refresh planner statistics.
    ///
    /// Safe on any schedule; no consistency implications.
    pub async fn optimize(&self) -> Result<()> {
        sqlx::query("INSERT INTO notes_fts(notes_fts) VALUES('optimize')")
            .execute(&self.pool)
            .await?;
        sqlx::query("ANALYZE note_search_content")
            .execute(&self.pool)
            .await?;

        info!(
            subsystem = "index",
            component = "maintenance",
            op = "optimize",
            "search index optimized"
        );
        Ok(())
    }

    /// Basic statistics about the index.
    ///
    /// Size comes from the dbstat virtual table when this SQLite build has
    /// it; otherwise it falls back to an average-row-size estimate.
    pub async fn stats(&self) -> Result<IndexStats> {
        let (total_documents,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM notes_fts")
            .fetch_one(&self.pool)
            .await?;

        let dbstat: std::result::Result<(Option<i64>,), sqlx::Error> =
            sqlx::query_as("SELECT SUM(pgsize) FROM dbstat WHERE name LIKE 'notes_fts%'")
                .fetch_one(&self.pool)
                .await;

        let index_size_estimate = match dbstat {
            Ok((Some(size),)) => size,
            _ => {
                // dbstat not compiled in; estimate from average row size
                let (avg,): (Option<f64>,) = sqlx::query_as(
                    "SELECT AVG(LENGTH(content) + LENGTH(title)) FROM note_search_content",
                )
                .fetch_one(&self.pool)
                .await?;
                (avg.unwrap_or(0.0) * total_documents as f64 * 1.5) as i64
            }
        };

        Ok(IndexStats {
            total_documents,
            index_size_estimate,
        })
    }
}
