//! # folio-db
//!
//! SQLite database layer for the folio search indexing subsystem.
//!
//! This crate provides:
//! - Connection pool management
//! - The index-owned schema (FTS5 table, search content, token rows)
//! - Read-only note store access
//! - The index writer (upsert/delete/batch)
//! - The persistent full-text search executor
//! - Index consistency maintenance (verify/sync/rebuild/optimize)
//!
//! ## Example
//!
//! ```rust,ignore
//! use folio_db::{create_pool, init_index_schema, IndexWriter};
//! use folio_core::IndexConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool("sqlite://notes.db").await?;
//!     init_index_schema(&pool).await?;
//!
//!     let writer = IndexWriter::new(pool.clone(), IndexConfig::default());
//!     writer.upsert("someNoteId").await?;
//!     Ok(())
//! }
//! ```

pub mod fts;
pub mod index;
pub mod maintenance;
pub mod notes;
pub mod pool;
pub mod schema;

// Test fixtures for integration tests
// Note: always compiled so integration tests (in tests/) can use them
pub mod test_fixtures;

// Re-export core types
pub use folio_core::*;

pub use fts::FtsSearch;
pub use index::IndexWriter;
pub use maintenance::IndexMaintenance;
pub use notes::NoteStore;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};
pub use schema::init_index_schema;

/// Escape LIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
