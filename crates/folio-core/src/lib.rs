//! # folio-core
//!
//! Core types, traits, and the pure text pipeline for the folio search
//! indexing subsystem.
//!
//! This crate provides the foundational pieces the other folio crates
//! depend on:
//! - Error taxonomy and `Result` alias
//! - Note and search result models
//! - Text normalization and tokenization (camelCase/snake_case aware)
//! - Content-type-aware preprocessing (HTML, mind-map JSON, canvas JSON)
//! - Search operator parsing and FTS5 query compilation
//! - The `ProtectedSession` and `NoteSource` collaborator traits

pub mod config;
pub mod content;
pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod query;
pub mod search;
pub mod traits;

// Re-export commonly used types at crate root
pub use config::IndexConfig;
pub use content::preprocess_content;
pub use error::{Error, Result};
pub use models::{Note, NoteType};
pub use normalize::{normalize, split_camel_case, tokenize};
pub use query::{compile_fts_query, sanitize_fts_token, SearchOperator};
pub use search::{
    BatchIndexOutcome, IndexStats, IntegrityReport, IntegrityStats, SearchMatch, SearchOptions,
};
pub use traits::{NoProtectedSession, NoteSource, ProtectedSession};
