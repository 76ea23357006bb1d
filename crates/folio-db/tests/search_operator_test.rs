//! Operator semantics against a small indexed corpus.
//!
//! Each operator maps to a distinct engine query shape (phrase, AND of
//! phrases, prefix, OR, NOT LIKE); these tests pin the observable member
//! semantics rather than the generated query text.

use sqlx::SqlitePool;

use folio_db::test_fixtures::{create_note_store_schema, insert_note, memory_pool, NoteFixture};
use folio_db::{init_index_schema, FtsSearch, IndexConfig, IndexWriter, SearchOperator, SearchOptions};

async fn setup_corpus() -> (SqlitePool, FtsSearch) {
    let pool = memory_pool().await;
    create_note_store_schema(&pool).await;
    init_index_schema(&pool).await.expect("index schema");

    let writer = IndexWriter::new(pool.clone(), IndexConfig::default());
    let corpus = [
        ("note_phrase1", "Phrases", "alpha beta gamma"),
        ("note_phrase2", "Split", "alpha gamma beta"),
        ("note_prefix1", "Prefixes", "alphabet better gamma"),
        ("note_other1", "Other", "delta epsilon zeta"),
    ];
    for (id, title, content) in corpus {
        insert_note(&pool, &NoteFixture::new(id, title).with_content(content)).await;
        writer.upsert(id).await.expect("upsert");
    }

    let fts = FtsSearch::new(pool.clone(), IndexConfig::default());
    (pool, fts)
}

fn tokens(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

async fn ids(fts: &FtsSearch, words: &[&str], op: SearchOperator) -> Vec<String> {
    let mut hits: Vec<String> = fts
        .search(&tokens(words), op, None, &SearchOptions::default())
        .await
        .expect("search")
        .into_iter()
        .map(|m| m.note_id)
        .collect();
    hits.sort();
    hits
}

#[tokio::test]
async fn test_exact_phrase_requires_adjacency() {
    let (_pool, fts) = setup_corpus().await;

    let hits = ids(&fts, &["alpha", "beta"], SearchOperator::ExactPhrase).await;
    assert_eq!(hits, vec!["note_phrase1"], "only the adjacent pair matches");
}

#[tokio::test]
async fn test_contains_all_ignores_order() {
    let (_pool, fts) = setup_corpus().await;

    let hits = ids(&fts, &["alpha", "beta"], SearchOperator::ContainsAll).await;
    assert_eq!(hits, vec!["note_phrase1", "note_phrase2"]);
}

#[tokio::test]
async fn test_not_contains_excludes_every_matching_note() {
    let (_pool, fts) = setup_corpus().await;

    let hits = ids(&fts, &["alpha", "beta"], SearchOperator::NotContains).await;
    // Exclusion runs on substrings, so "alphabet" counts as containing
    // "alpha" and note_prefix1 is excluded along with the phrase notes
    assert_eq!(hits, vec!["note_other1"]);
}

#[tokio::test]
async fn test_starts_with_matches_prefixed_terms() {
    let (_pool, fts) = setup_corpus().await;

    let hits = ids(&fts, &["alphab", "bet"], SearchOperator::StartsWith).await;
    assert_eq!(hits, vec!["note_prefix1"]);
}

#[tokio::test]
async fn test_fuzzy_any_matches_on_a_single_term() {
    let (_pool, fts) = setup_corpus().await;

    let hits = ids(&fts, &["delta", "beta"], SearchOperator::FuzzyAny).await;
    assert_eq!(
        hits,
        vec!["note_other1", "note_phrase1", "note_phrase2"],
        "any single matching term is enough"
    );
}

#[tokio::test]
async fn test_scope_restricts_result_set() {
    let (_pool, fts) = setup_corpus().await;

    let scope = vec!["note_phrase2".to_string()];
    let hits = fts
        .search(
            &tokens(&["alpha"]),
            SearchOperator::ContainsAll,
            Some(&scope),
            &SearchOptions::default(),
        )
        .await
        .expect("search");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].note_id, "note_phrase2");
}

#[tokio::test]
async fn test_limit_and_offset_paginate() {
    let (_pool, fts) = setup_corpus().await;

    let page1 = fts
        .search(
            &tokens(&["gamma"]),
            SearchOperator::ContainsAll,
            None,
            &SearchOptions::new().with_limit(2),
        )
        .await
        .expect("search");
    assert_eq!(page1.len(), 2);

    let page2 = fts
        .search(
            &tokens(&["gamma"]),
            SearchOperator::ContainsAll,
            None,
            &SearchOptions::new().with_limit(2).with_offset(2),
        )
        .await
        .expect("search");
    assert_eq!(page2.len(), 1);
    assert!(page1.iter().all(|m| m.note_id != page2[0].note_id));
}

#[tokio::test]
async fn test_snippets_highlight_matched_terms() {
    let (_pool, fts) = setup_corpus().await;

    let hits = fts
        .search(
            &tokens(&["epsilon"]),
            SearchOperator::ContainsAll,
            None,
            &SearchOptions::new().with_snippets(),
        )
        .await
        .expect("search");

    assert_eq!(hits.len(), 1);
    let snippet = hits[0].snippet.as_deref().expect("snippet requested");
    assert!(snippet.contains("<mark>epsilon</mark>"), "snippet: {snippet}");
}

#[tokio::test]
async fn test_deleted_and_protected_notes_never_surface() {
    let pool = memory_pool().await;
    create_note_store_schema(&pool).await;
    init_index_schema(&pool).await.expect("index schema");
    let writer = IndexWriter::new(pool.clone(), IndexConfig::default());
    let fts = FtsSearch::new(pool.clone(), IndexConfig::default());

    insert_note(
        &pool,
        &NoteFixture::new("note_live", "Live").with_content("shared keyword"),
    )
    .await;
    writer.upsert("note_live").await.expect("upsert");

    // Index first, then flip flags without re-indexing: the executor's own
    // filters must still hide the note
    insert_note(
        &pool,
        &NoteFixture::new("note_gone", "Gone").with_content("shared keyword"),
    )
    .await;
    writer.upsert("note_gone").await.expect("upsert");
    sqlx::query("UPDATE notes SET is_deleted = 1 WHERE note_id = 'note_gone'")
        .execute(&pool)
        .await
        .expect("update");

    let hits = ids(&fts, &["shared"], SearchOperator::ContainsAll).await;
    assert_eq!(hits, vec!["note_live"]);
}

#[tokio::test]
async fn test_hostile_tokens_are_neutralized_not_executed() {
    let (_pool, fts) = setup_corpus().await;

    // Injection-shaped input must come back as an empty result, not an error
    let hits = fts
        .search(
            &tokens(&["alpha; DROP TABLE notes", "--comment"]),
            SearchOperator::ContainsAll,
            None,
            &SearchOptions::default(),
        )
        .await
        .expect("hostile input must not error");
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_diacritics_fold_in_negation_path() {
    let pool = memory_pool().await;
    create_note_store_schema(&pool).await;
    init_index_schema(&pool).await.expect("index schema");
    let writer = IndexWriter::new(pool.clone(), IndexConfig::default());
    let fts = FtsSearch::new(pool.clone(), IndexConfig::default());

    insert_note(
        &pool,
        &NoteFixture::new("note_cafe", "Menu").with_content("café au lait"),
    )
    .await;
    insert_note(
        &pool,
        &NoteFixture::new("note_tea", "Menu").with_content("green tea"),
    )
    .await;
    writer.upsert("note_cafe").await.expect("upsert");
    writer.upsert("note_tea").await.expect("upsert");

    // Accented query term folds to the same normalized form
    let hits = ids(&fts, &["Café"], SearchOperator::NotContains).await;
    assert_eq!(hits, vec!["note_tea"]);
}
