//! Read-only access to the note store.
//!
//! The note store (`notes` + `blobs` tables) belongs to an external
//! subsystem; this module is the indexer's view of it, keyed by noteId.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use folio_core::models::indexable_types_sql_list;
use folio_core::{Note, NoteSource, NoteType, Result};

/// SQLite-backed note store reader.
#[derive(Clone)]
pub struct NoteStore {
    pool: SqlitePool,
}

impl NoteStore {
    /// Create a new NoteStore over the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn note_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Note> {
        Ok(Note {
            note_id: row.try_get("note_id")?,
            title: row.try_get("title")?,
            note_type: NoteType::parse(row.try_get::<String, _>("type")?.as_str()),
            mime: row.try_get("mime")?,
            is_protected: row.try_get::<i64, _>("is_protected")? != 0,
            is_deleted: row.try_get::<i64, _>("is_deleted")? != 0,
            content: row.try_get("content")?,
        })
    }
}

#[async_trait]
impl NoteSource for NoteStore {
    async fn get_note(&self, note_id: &str) -> Result<Option<Note>> {
        let row = sqlx::query(
            r#"
            SELECT n.note_id, n.title, n.type, n.mime, n.is_protected, n.is_deleted, b.content
            FROM notes n
            LEFT JOIN blobs b ON n.blob_id = b.blob_id
            WHERE n.note_id = ?
            "#,
        )
        .bind(note_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::note_from_row).transpose()
    }

    async fn fetch_protected_notes(&self, scope: Option<&[String]>) -> Result<Vec<Note>> {
        let mut sql = format!(
            r#"
            SELECT n.note_id, n.title, n.type, n.mime, n.is_protected, n.is_deleted, b.content
            FROM notes n
            LEFT JOIN blobs b ON n.blob_id = b.blob_id
            WHERE n.is_protected = 1
              AND n.is_deleted = 0
              AND n.type IN ({})
            "#,
            indexable_types_sql_list()
        );

        if let Some(ids) = scope {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let placeholders = vec!["?"; ids.len()].join(",");
            sql.push_str(&format!(" AND n.note_id IN ({})", placeholders));
        }

        let mut query = sqlx::query(&sql);
        if let Some(ids) = scope {
            for id in ids {
                query = query.bind(id);
            }
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(Self::note_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{create_note_store_schema, insert_note, memory_pool, NoteFixture};

    #[tokio::test]
    async fn test_get_note_joins_blob_content() {
        let pool = memory_pool().await;
        create_note_store_schema(&pool).await;
        insert_note(
            &pool,
            &NoteFixture::new("n1", "Title").with_content("<p>body</p>"),
        )
        .await;

        let store = NoteStore::new(pool);
        let note = store.get_note("n1").await.unwrap().unwrap();
        assert_eq!(note.title, "Title");
        assert_eq!(note.content.as_deref(), Some("<p>body</p>"));
        assert!(!note.is_protected);
    }

    #[tokio::test]
    async fn test_get_note_missing() {
        let pool = memory_pool().await;
        create_note_store_schema(&pool).await;

        let store = NoteStore::new(pool);
        assert!(store.get_note("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_protected_notes_filters() {
        let pool = memory_pool().await;
        create_note_store_schema(&pool).await;
        insert_note(&pool, &NoteFixture::new("plain", "Plain")).await;
        insert_note(&pool, &NoteFixture::new("prot", "Secret").protected()).await;
        insert_note(
            &pool,
            &NoteFixture::new("gone", "Deleted").protected().deleted(),
        )
        .await;
        insert_note(
            &pool,
            &NoteFixture::new("img", "Image")
                .protected()
                .with_type("image", "image/png"),
        )
        .await;

        let store = NoteStore::new(pool);
        let notes = store.fetch_protected_notes(None).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].note_id, "prot");
    }

    #[tokio::test]
    async fn test_fetch_protected_notes_scoped() {
        let pool = memory_pool().await;
        create_note_store_schema(&pool).await;
        insert_note(&pool, &NoteFixture::new("p1", "One").protected()).await;
        insert_note(&pool, &NoteFixture::new("p2", "Two").protected()).await;

        let store = NoteStore::new(pool);
        let scope = vec!["p2".to_string()];
        let notes = store.fetch_protected_notes(Some(&scope)).await.unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].note_id, "p2");

        // Empty scope means nothing can match
        let notes = store.fetch_protected_notes(Some(&[])).await.unwrap();
        assert!(notes.is_empty());
    }
}
