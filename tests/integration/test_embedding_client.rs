//! OllamaClient against a mocked embeddings endpoint.

use docsearch::embedding::{EmbeddingProvider, OllamaClient};
use docsearch::error::EmbeddingError;
use mockito::{Matcher, Server};
use serde_json::json;
use std::time::Duration;

fn client(server: &Server) -> OllamaClient {
    OllamaClient::new(
        &server.url(),
        "nomic-embed-text",
        Some(Duration::from_secs(10)),
    )
    .unwrap()
}

#[test]
fn test_embed_posts_model_and_prompt() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/api/embeddings")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "model": "nomic-embed-text",
            "prompt": "hello world"
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"embedding":[0.1,0.2,0.3]}"#)
        .expect(1)
        .create();

    let embedding = client(&server).embed("hello world").unwrap();

    assert_eq!(embedding, vec![0.1, 0.2, 0.3]);
    mock.assert();
}

#[test]
fn test_non_200_status_is_service_error() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/api/embeddings")
        .with_status(500)
        .with_body("model runner crashed")
        .expect(1)
        .create();

    let err = client(&server).embed("hello").unwrap_err();

    assert!(matches!(err, EmbeddingError::ServiceError { status: 500 }));
    // Single attempt, no retry
    mock.assert();
}

#[test]
fn test_missing_model_suggests_pull() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/api/embeddings")
        .with_status(404)
        .with_body(r#"{"error":"model \"nomic-embed-text\" not found"}"#)
        .create();

    let err = client(&server).embed("hello").unwrap_err();

    assert_eq!(err.status_code(), "EMBEDDING_SERVICE_ERROR");
    assert!(
        err.recovery_suggestions()
            .iter()
            .any(|s| s.contains("ollama pull"))
    );
}

#[test]
fn test_malformed_body_is_parse_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/api/embeddings")
        .with_status(200)
        .with_body("not json")
        .create();

    let err = client(&server).embed("hello").unwrap_err();

    assert!(matches!(err, EmbeddingError::Parse { .. }));
}

#[test]
fn test_wrong_shape_is_parse_error() {
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/api/embeddings")
        .with_status(200)
        .with_body(r#"{"embeddings":[[0.1,0.2]]}"#)
        .create();

    let err = client(&server).embed("hello").unwrap_err();

    assert_eq!(err.status_code(), "EMBEDDING_PARSE_ERROR");
}

#[test]
fn test_base_url_trailing_slash() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/api/embeddings")
        .with_status(200)
        .with_body(r#"{"embedding":[1.0]}"#)
        .create();

    let base = format!("{}/", server.url());
    let client = OllamaClient::new(&base, "all-minilm", None).unwrap();

    assert_eq!(client.embed("x").unwrap(), vec![1.0]);
    mock.assert();
}
