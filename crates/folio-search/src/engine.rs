//! Search orchestration across the persistent index and protected notes.

use std::sync::Arc;
use std::time::Instant;

use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use folio_core::{
    Error, IndexConfig, IndexStats, IntegrityReport, ProtectedSession, Result, SearchMatch,
    SearchOperator, SearchOptions,
};
use folio_db::{FtsSearch, IndexMaintenance, IndexWriter, NoteStore};

use crate::protected::ProtectedScanner;

/// Top-level search engine.
///
/// Owns the persistent executor, the index writer, maintenance, and the
/// protected-note scanner, and merges the two search paths behind one
/// `search` call. Engine availability is probed once at construction;
/// a degraded engine reports [`Error::FtsUnavailable`] instead of silently
/// returning nothing.
pub struct SearchEngine {
    fts: FtsSearch,
    writer: IndexWriter,
    maintenance: IndexMaintenance,
    scanner: ProtectedScanner,
    config: IndexConfig,
    fts_available: bool,
}

impl SearchEngine {
    /// Build an engine over the pool and protected session.
    pub async fn new(
        pool: SqlitePool,
        session: Arc<dyn ProtectedSession>,
        config: IndexConfig,
    ) -> Result<Self> {
        let fts = FtsSearch::new(pool.clone(), config.clone());
        let fts_available = fts.check_availability().await?;
        if !fts_available {
            warn!(
                subsystem = "search",
                component = "engine",
                "full-text index not present, persistent search disabled"
            );
        }

        let store = NoteStore::new(pool.clone());
        Ok(Self {
            fts,
            writer: IndexWriter::new(pool.clone(), config.clone()),
            maintenance: IndexMaintenance::new(pool, config.clone()),
            scanner: ProtectedScanner::new(store, session),
            config,
            fts_available,
        })
    }

    /// Whether the persistent full-text index was present at construction.
    pub fn is_available(&self) -> bool {
        self.fts_available
    }

    /// Search both paths and merge the results.
    ///
    /// Persistent matches come first, ordered by relevance; protected
    /// matches are appended. A failure on the protected path downgrades to
    /// a warning rather than discarding the persistent results.
    pub async fn search(
        &self,
        tokens: &[String],
        operator: SearchOperator,
        scope: Option<&[String]>,
        options: &SearchOptions,
    ) -> Result<Vec<SearchMatch>> {
        if !self.fts_available {
            return Err(Error::FtsUnavailable);
        }

        let start = Instant::now();
        let mut results = self.fts.search(tokens, operator, scope, options).await?;

        match self.scanner.search(tokens, operator, scope).await {
            Ok(protected) => results.extend(protected),
            Err(e) => {
                warn!(
                    subsystem = "search",
                    component = "engine",
                    error = %e,
                    "protected scan failed, returning persistent results only"
                );
            }
        }

        let limit = self.config.clamp_limit(options.limit) as usize;
        results.truncate(limit);

        debug!(
            subsystem = "search",
            component = "engine",
            result_count = results.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "search completed"
        );
        Ok(results)
    }

    /// Index or re-index one note.
    pub async fn index_note(&self, note_id: &str) -> Result<()> {
        self.writer.upsert(note_id).await
    }

    /// Remove one note from the index.
    pub async fn remove_note(&self, note_id: &str) -> Result<()> {
        self.writer.delete(note_id).await
    }

    /// Rebuild the whole index from the note store.
    pub async fn rebuild_index(&self) -> Result<()> {
        info!(
            subsystem = "search",
            component = "engine",
            op = "rebuild_index",
            "full index rebuild requested"
        );
        self.maintenance.rebuild().await
    }

    /// Check index consistency against the note store.
    pub async fn verify_index(&self) -> Result<IntegrityReport> {
        self.maintenance.verify().await
    }

    /// Backfill one batch of notes missing from the index.
    pub async fn sync_missing(&self) -> Result<u64> {
        self.maintenance.sync_missing().await
    }

    /// Merge the engine's index segments and refresh planner statistics.
    pub async fn optimize_index(&self) -> Result<()> {
        self.maintenance.optimize().await
    }

    /// Document count and size estimate for the index.
    pub async fn index_stats(&self) -> Result<IndexStats> {
        self.maintenance.stats().await
    }
}
