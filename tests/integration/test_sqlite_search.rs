//! End-to-end ingestion and search against a SQLite file.

use docsearch::embedding::EmbeddingProvider;
use docsearch::error::EmbeddingResult;
use docsearch::storage::{DocumentStore, NewDocument, SqliteDatabase, StoreConfig};
use docsearch::vector::{DecodePolicy, DistanceMetric, VectorDimension};
use docsearch::DocumentService;
use tempfile::TempDir;

/// Embeds text by counting a few fixed keywords.
struct KeywordEmbedder;

const KEYWORDS: [&str; 4] = ["rust", "memory", "garden", "tomato"];

impl EmbeddingProvider for KeywordEmbedder {
    fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let lower = text.to_lowercase();
        Ok(KEYWORDS
            .iter()
            .map(|k| lower.matches(k).count() as f32)
            .collect())
    }

    fn model_name(&self) -> &str {
        "keyword-counter"
    }
}

fn open_service(
    path: &std::path::Path,
    metric: DistanceMetric,
) -> DocumentService<KeywordEmbedder, SqliteDatabase> {
    let config = StoreConfig {
        dimension: VectorDimension::new(KEYWORDS.len()).unwrap(),
        metric,
        ..StoreConfig::default()
    };
    let database = SqliteDatabase::open(path).unwrap();
    DocumentService::new(KeywordEmbedder, DocumentStore::new(database, config))
}

#[test]
fn test_ingest_then_search_ranks_by_meaning() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("documents.db");
    let service = open_service(&db_path, DistanceMetric::Cosine);

    let rust = service
        .ingest_document("Rust gives memory safety", None, Some("rust.md"))
        .unwrap();
    service
        .ingest_document("Growing a tomato garden", None, None)
        .unwrap();
    service
        .ingest_document("Memory layout of Rust structs, rust rust", None, None)
        .unwrap();

    let outcome = service.query_by_text("rust memory", 2).unwrap();

    assert_eq!(outcome.skipped, 0);
    assert_eq!(outcome.results.len(), 2);
    assert_eq!(outcome.results[0].document.id, rust.id);
    assert!((outcome.results[0].similarity.get() - 1.0).abs() < 1e-6);
    assert!(outcome.results[0].similarity >= outcome.results[1].similarity);
    assert_eq!(
        outcome.results[0].document.file_name.as_deref(),
        Some("rust.md")
    );
}

#[test]
fn test_documents_survive_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("documents.db");

    let stored = {
        let service = open_service(&db_path, DistanceMetric::L2);
        service
            .ingest_document("tomato garden", Some("text/plain"), None)
            .unwrap()
    };

    let service = open_service(&db_path, DistanceMetric::L2);
    let outcome = service.query_by_vector(&[0.0, 0.0, 1.0, 1.0], 5).unwrap();

    assert_eq!(outcome.results.len(), 1);
    let found = &outcome.results[0].document;
    assert_eq!(found.id, stored.id);
    assert_eq!(found.created_at, stored.created_at);
    assert_eq!(found.embedding, stored.embedding);
    assert_eq!(service.store().database().document_count().unwrap(), 1);
}

#[test]
fn test_empty_database_returns_no_results() {
    let temp_dir = TempDir::new().unwrap();
    let service = open_service(&temp_dir.path().join("empty.db"), DistanceMetric::Cosine);

    let outcome = service.query_by_text("rust", 5).unwrap();

    assert!(outcome.is_empty());
}

#[test]
fn test_zero_limit_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let service = open_service(&temp_dir.path().join("docs.db"), DistanceMetric::Cosine);

    let err = service.query_by_text("rust", 0).unwrap_err();

    assert_eq!(err.status_code(), "INVALID_LIMIT");
}

fn store_with_corrupt_row(
    temp_dir: &TempDir,
    decode_policy: DecodePolicy,
) -> DocumentStore<SqliteDatabase> {
    let db_path = temp_dir.path().join("documents.db");
    let config = StoreConfig {
        dimension: VectorDimension::new(2).unwrap(),
        decode_policy,
        ..StoreConfig::default()
    };
    let store = DocumentStore::new(SqliteDatabase::open(&db_path).unwrap(), config);
    store
        .insert(NewDocument::new("good", vec![1.0, 0.0]))
        .unwrap();

    // A literal written by some other tool, not by the encoder
    let raw = rusqlite::Connection::open(&db_path).unwrap();
    raw.execute(
        "INSERT INTO documents (content, embedding) VALUES ('corrupt', '[1.0,bad]')",
        [],
    )
    .unwrap();

    store
}

#[test]
fn test_strict_policy_skips_corrupt_stored_vector() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_with_corrupt_row(&temp_dir, DecodePolicy::Strict);

    let outcome = store.search_similar(&[1.0, 0.0], 10).unwrap();

    assert_eq!(outcome.skipped, 1);
    assert_eq!(outcome.results.len(), 1);
    assert_eq!(outcome.results[0].document.content, "good");
}

#[test]
fn test_lenient_policy_keeps_corrupt_stored_vector() {
    let temp_dir = TempDir::new().unwrap();
    let store = store_with_corrupt_row(&temp_dir, DecodePolicy::Lenient);

    let outcome = store.search_similar(&[1.0, 0.0], 10).unwrap();

    assert_eq!(outcome.skipped, 0);
    let contents: Vec<&str> = outcome
        .results
        .iter()
        .map(|r| r.document.content.as_str())
        .collect();
    assert_eq!(contents, vec!["good", "corrupt"]);
    // [1.0,bad] reads as [1.0,0.0], identical to the query
    assert_eq!(outcome.results[1].document.embedding, vec![1.0, 0.0]);
    assert!((outcome.results[1].similarity.get() - 1.0).abs() < 1e-6);
}
