//! Persistent full-text search executor.
//!
//! Runs compiled FTS5 queries against the index, joined back to note
//! metadata, restricted to non-deleted, non-protected notes. Protected
//! notes are never in this index; they are scanned separately.

use std::time::Instant;

use sqlx::{Row, SqlitePool};
use tracing::{debug, warn};

use folio_core::defaults::{HIGHLIGHT_END, HIGHLIGHT_START};
use folio_core::{
    compile_fts_query, normalize, Error, IndexConfig, Result, SearchMatch, SearchOperator,
    SearchOptions,
};

use crate::escape_like;

/// Full-text search provider over the SQLite FTS5 index.
pub struct FtsSearch {
    pool: SqlitePool,
    config: IndexConfig,
}

impl FtsSearch {
    /// Create a new FtsSearch with the given connection pool.
    pub fn new(pool: SqlitePool, config: IndexConfig) -> Self {
        Self { pool, config }
    }

    /// Probe whether the FTS5 index table exists.
    ///
    /// Not memoized here: the orchestrator owns the availability flag as
    /// instance state, so independent engines (and tests) stay isolated.
    pub async fn check_availability(&self) -> Result<bool> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'notes_fts'",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    /// Search the persistent index.
    ///
    /// Results are ordered by engine relevance (`score = -rank`, higher is
    /// better) and paginated per `options`. `scope` restricts results to a
    /// note-ID set when present.
    pub async fn search(
        &self,
        tokens: &[String],
        operator: SearchOperator,
        scope: Option<&[String]>,
        options: &SearchOptions,
    ) -> Result<Vec<SearchMatch>> {
        // FTS5 has no unary NOT, so negation runs against the normalized
        // side table instead of the FTS index.
        if operator.is_negation() {
            return self.search_negated(tokens, scope, options).await;
        }

        let fts_query = compile_fts_query(tokens, operator)?;
        let limit = self.config.clamp_limit(options.limit);
        let offset = options.offset.max(0);

        let snippet_select = if options.include_snippets {
            format!(
                ", snippet(notes_fts, 2, '{}', '{}', '...', {}) AS snippet",
                HIGHLIGHT_START, HIGHLIGHT_END, self.config.snippet_tokens
            )
        } else {
            String::new()
        };

        let mut sql = format!(
            r#"
            SELECT notes_fts.note_id AS note_id,
                   n.title AS title,
                   -rank AS score
                   {}
            FROM notes_fts
            JOIN notes n ON n.note_id = notes_fts.note_id
            WHERE notes_fts MATCH ?
              AND n.is_deleted = 0
              AND n.is_protected = 0
            "#,
            snippet_select
        );

        if let Some(ids) = scope {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; ids.len()].join(",");
            sql.push_str(&format!(" AND notes_fts.note_id IN ({})", placeholders));
        }
        sql.push_str(" ORDER BY rank LIMIT ? OFFSET ?");

        let mut query = sqlx::query(&sql).bind(&fts_query);
        if let Some(ids) = scope {
            for id in ids {
                query = query.bind(id);
            }
        }
        query = query.bind(limit).bind(offset);

        let start = Instant::now();
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify_engine_error(e, &fts_query))?;
        self.log_if_slow("fts_search", &fts_query, start, rows.len());

        rows.into_iter()
            .map(|row| {
                Ok(SearchMatch {
                    note_id: row.try_get("note_id")?,
                    title: row.try_get("title")?,
                    score: row.try_get("score")?,
                    snippet: if options.include_snippets {
                        row.try_get("snippet")?
                    } else {
                        None
                    },
                })
            })
            .collect()
    }

    /// Contains-none search over the normalized content table.
    ///
    /// Matches notes where no token appears anywhere in the normalized
    /// title+content. No engine rank exists on this path; matches carry a
    /// fixed score.
    async fn search_negated(
        &self,
        tokens: &[String],
        scope: Option<&[String]>,
        options: &SearchOptions,
    ) -> Result<Vec<SearchMatch>> {
        if tokens.is_empty() {
            return Err(Error::QuerySyntax {
                query: String::new(),
                message: "no search tokens provided".to_string(),
            });
        }

        let limit = self.config.clamp_limit(options.limit);
        let offset = options.offset.max(0);

        let mut sql = String::from(
            r#"
            SELECT c.note_id AS note_id, n.title AS title, 1.0 AS score
            FROM note_search_content c
            JOIN notes n ON n.note_id = c.note_id
            WHERE n.is_deleted = 0
              AND n.is_protected = 0
            "#,
        );
        for _ in tokens {
            sql.push_str(" AND c.full_text_normalized NOT LIKE ? ESCAPE '\\'");
        }
        if let Some(ids) = scope {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; ids.len()].join(",");
            sql.push_str(&format!(" AND c.note_id IN ({})", placeholders));
        }
        sql.push_str(" ORDER BY c.note_id LIMIT ? OFFSET ?");

        let mut query = sqlx::query(&sql);
        for token in tokens {
            query = query.bind(format!("%{}%", escape_like(&normalize(token))));
        }
        if let Some(ids) = scope {
            for id in ids {
                query = query.bind(id);
            }
        }
        query = query.bind(limit).bind(offset);

        let start = Instant::now();
        let rows = query.fetch_all(&self.pool).await?;
        self.log_if_slow("negated_search", "NOT LIKE", start, rows.len());

        rows.into_iter()
            .map(|row| {
                Ok(SearchMatch {
                    note_id: row.try_get("note_id")?,
                    title: row.try_get("title")?,
                    score: row.try_get("score")?,
                    snippet: None,
                })
            })
            .collect()
    }

    fn log_if_slow(&self, op: &str, query: &str, start: Instant, result_count: usize) {
        let elapsed = start.elapsed();
        if elapsed > self.config.slow_query_threshold {
            warn!(
                subsystem = "search",
                component = "fts",
                op,
                query,
                duration_ms = elapsed.as_millis() as u64,
                result_count,
                slow = true,
                "slow search query"
            );
        } else {
            debug!(
                subsystem = "search",
                component = "fts",
                op,
                duration_ms = elapsed.as_millis() as u64,
                result_count,
                "search query completed"
            );
        }
    }
}

/// Classify an engine error into the typed taxonomy.
///
/// A missing FTS table means the capability is absent; MATCH syntax
/// complaints mean the compiled query was rejected. Everything else stays
/// a database error.
fn classify_engine_error(e: sqlx::Error, query: &str) -> Error {
    if let sqlx::Error::Database(db_err) = &e {
        let message = db_err.message();
        if message.contains("no such table: notes_fts") {
            return Error::FtsUnavailable;
        }
        if message.contains("fts5: syntax error") || message.contains("malformed MATCH") {
            return Error::QuerySyntax {
                query: query.to_string(),
                message: message.to_string(),
            };
        }
    }
    Error::Database(e)
}
