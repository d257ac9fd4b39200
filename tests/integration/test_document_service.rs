//! DocumentService wired to a mocked embedding service and a recording database.

use chrono::{TimeZone, Utc};
use docsearch::error::{EmbeddingError, ServiceError};
use docsearch::storage::{
    BackendError, DocumentId, DocumentStore, InsertRow, InsertedRow, RankedQuery, RowResult,
    StoreConfig, VectorDatabase,
};
use docsearch::vector::VectorDimension;
use docsearch::{DocumentService, OllamaClient};
use mockito::Server;
use parking_lot::Mutex;
use std::time::Duration;

/// Records inserted literals and hands out ids from a fixed start.
struct RecordingDatabase {
    next_id: Mutex<i64>,
    inserts: Mutex<Vec<String>>,
}

impl RecordingDatabase {
    fn starting_at(id: i64) -> Self {
        Self {
            next_id: Mutex::new(id),
            inserts: Mutex::new(Vec::new()),
        }
    }

    fn insert_count(&self) -> usize {
        self.inserts.lock().len()
    }
}

impl VectorDatabase for RecordingDatabase {
    fn insert_document(&self, row: InsertRow<'_>) -> Result<InsertedRow, BackendError> {
        self.inserts.lock().push(row.embedding.to_string());
        let mut next = self.next_id.lock();
        let id = *next;
        *next += 1;
        Ok(InsertedRow {
            id,
            created_at: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        })
    }

    fn query_ranked(&self, _query: RankedQuery<'_>) -> Result<Vec<RowResult>, BackendError> {
        Ok(Vec::new())
    }
}

fn service(
    server: &Server,
    database: RecordingDatabase,
) -> DocumentService<OllamaClient, RecordingDatabase> {
    let client = OllamaClient::new(
        &server.url(),
        "nomic-embed-text",
        Some(Duration::from_secs(10)),
    )
    .unwrap();
    let config = StoreConfig {
        dimension: VectorDimension::new(3).unwrap(),
        ..StoreConfig::default()
    };
    DocumentService::new(client, DocumentStore::new(database, config))
}

#[test]
fn test_ingest_returns_stored_document() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/api/embeddings")
        .with_status(200)
        .with_body(r#"{"embedding":[0.1,0.2,0.3]}"#)
        .create();
    let service = service(&server, RecordingDatabase::starting_at(7));

    let doc = service
        .ingest_document("hello", Some("text/plain"), None)
        .unwrap();

    assert_eq!(doc.id, DocumentId::new(7));
    assert_eq!(doc.content, "hello");
    assert_eq!(doc.media_type.as_deref(), Some("text/plain"));
    assert_eq!(doc.file_name, None);
    assert_eq!(doc.embedding, vec![0.1, 0.2, 0.3]);
    assert_eq!(
        service.store().database().inserts.lock().as_slice(),
        ["[0.100000,0.200000,0.300000]"]
    );
}

#[test]
fn test_ingest_with_failing_service_writes_nothing() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/api/embeddings")
        .with_status(500)
        .create();
    let service = service(&server, RecordingDatabase::starting_at(1));

    let err = service.ingest_document("hello", None, None).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Embedding(EmbeddingError::ServiceError { status: 500 })
    ));
    assert_eq!(service.store().database().insert_count(), 0);
}

#[test]
fn test_ingest_rejects_wrong_embedding_size() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/api/embeddings")
        .with_status(200)
        .with_body(r#"{"embedding":[0.1,0.2]}"#)
        .create();
    let service = service(&server, RecordingDatabase::starting_at(1));

    let err = service.ingest_document("hello", None, None).unwrap_err();

    assert_eq!(err.status_code(), "DIMENSION_MISMATCH");
    assert_eq!(service.store().database().insert_count(), 0);
}

#[test]
fn test_query_with_failing_service_is_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/api/embeddings")
        .with_status(200)
        .with_body("{}")
        .create();
    let service = service(&server, RecordingDatabase::starting_at(1));

    let err = service.query_by_text("anything", 5).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Embedding(EmbeddingError::Parse { .. })
    ));
}
