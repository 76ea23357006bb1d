//! # folio-search
//!
//! Search orchestration for folio notes.
//!
//! This crate provides:
//! - The top-level [`SearchEngine`] merging persistent full-text results
//!   with in-memory protected-note matches
//! - The protected-note scanner, which decrypts candidates in memory and
//!   never persists plaintext
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use folio_core::{NoProtectedSession, IndexConfig, SearchOperator, SearchOptions};
//! use folio_db::create_pool;
//! use folio_search::SearchEngine;
//!
//! let pool = create_pool("sqlite://notes.db").await?;
//! let engine = SearchEngine::new(pool, Arc::new(NoProtectedSession), IndexConfig::default()).await?;
//!
//! let hits = engine
//!     .search(
//!         &["launch".into(), "date".into()],
//!         SearchOperator::ContainsAll,
//!         None,
//!         &SearchOptions::new().with_snippets(),
//!     )
//!     .await?;
//! ```

pub mod engine;
pub mod protected;

// Re-export core types
pub use folio_core::*;

pub use engine::SearchEngine;
pub use protected::{generate_snippet, matches_operator, ProtectedScanner};
