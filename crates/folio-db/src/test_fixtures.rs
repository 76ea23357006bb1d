//! Test fixtures for database integration tests.
//!
//! Provides reusable setup functions and note builders for consistent
//! testing across the codebase. The note store tables created here stand in
//! for the external storage collaborator.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_db::test_fixtures::{create_note_store_schema, insert_note, memory_pool, NoteFixture};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let pool = memory_pool().await;
//!     create_note_store_schema(&pool).await;
//!     insert_note(&pool, &NoteFixture::new("n1", "Title").with_content("<p>hi</p>")).await;
//!     // Run your tests...
//! }
//! ```

use rand::distributions::Alphanumeric;
use rand::Rng;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Create an in-memory SQLite pool.
///
/// Single connection: each in-memory connection is its own database, so the
/// pool must never hand out a second one.
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite pool")
}

/// Create the note store tables (`notes`, `blobs`).
///
/// These belong to the storage collaborator in production; tests need a
/// local stand-in.
pub async fn create_note_store_schema(pool: &SqlitePool) {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            note_id TEXT PRIMARY KEY,
            title TEXT NOT NULL DEFAULT '',
            type TEXT NOT NULL DEFAULT 'text',
            mime TEXT NOT NULL DEFAULT 'text/html',
            blob_id TEXT,
            is_protected INTEGER NOT NULL DEFAULT 0,
            is_deleted INTEGER NOT NULL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await
    .expect("create notes table");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS blobs (
            blob_id TEXT PRIMARY KEY,
            content TEXT
        )
        "#,
    )
    .execute(pool)
    .await
    .expect("create blobs table");
}

/// Generate a random 12-character note ID in the note store's style.
pub fn random_note_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect()
}

/// Builder for a test note row.
#[derive(Debug, Clone)]
pub struct NoteFixture {
    pub note_id: String,
    pub title: String,
    pub note_type: String,
    pub mime: String,
    pub content: Option<String>,
    pub is_protected: bool,
    pub is_deleted: bool,
}

impl NoteFixture {
    /// A plain HTML text note with no content blob.
    pub fn new(note_id: &str, title: &str) -> Self {
        Self {
            note_id: note_id.to_string(),
            title: title.to_string(),
            note_type: "text".to_string(),
            mime: "text/html".to_string(),
            content: None,
            is_protected: false,
            is_deleted: false,
        }
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn with_type(mut self, note_type: &str, mime: &str) -> Self {
        self.note_type = note_type.to_string();
        self.mime = mime.to_string();
        self
    }

    pub fn protected(mut self) -> Self {
        self.is_protected = true;
        self
    }

    pub fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }
}

/// Insert a note (and its content blob, when present) into the note store.
pub async fn insert_note(pool: &SqlitePool, fixture: &NoteFixture) {
    let blob_id = fixture.content.as_ref().map(|_| format!("blob_{}", fixture.note_id));

    if let (Some(blob_id), Some(content)) = (&blob_id, &fixture.content) {
        sqlx::query("INSERT OR REPLACE INTO blobs (blob_id, content) VALUES (?, ?)")
            .bind(blob_id)
            .bind(content)
            .execute(pool)
            .await
            .expect("insert blob");
    }

    sqlx::query(
        r#"
        INSERT OR REPLACE INTO notes (note_id, title, type, mime, blob_id, is_protected, is_deleted)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&fixture.note_id)
    .bind(&fixture.title)
    .bind(&fixture.note_type)
    .bind(&fixture.mime)
    .bind(&blob_id)
    .bind(fixture.is_protected as i64)
    .bind(fixture.is_deleted as i64)
    .execute(pool)
    .await
    .expect("insert note");
}

/// Insert a note whose blob holds invalid UTF-8, so content reads fail.
///
/// Used to exercise per-note error isolation in batch indexing.
pub async fn insert_corrupt_note(pool: &SqlitePool, note_id: &str, title: &str) {
    let blob_id = format!("blob_{}", note_id);

    sqlx::query("INSERT OR REPLACE INTO blobs (blob_id, content) VALUES (?, ?)")
        .bind(&blob_id)
        .bind(vec![0xffu8, 0xfe, 0x00, 0x9f])
        .execute(pool)
        .await
        .expect("insert corrupt blob");

    sqlx::query(
        r#"
        INSERT OR REPLACE INTO notes (note_id, title, type, mime, blob_id, is_protected, is_deleted)
        VALUES (?, ?, 'text', 'text/html', ?, 0, 0)
        "#,
    )
    .bind(note_id)
    .bind(title)
    .bind(&blob_id)
    .execute(pool)
    .await
    .expect("insert corrupt note");
}
