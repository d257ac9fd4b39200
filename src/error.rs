//! Error types for the document search system
//!
//! This module provides structured error types using thiserror for better
//! error handling and actionable error messages. Storage errors live in
//! [`crate::storage`] next to the backends that produce them.

use crate::storage::StoreError;
use thiserror::Error;

/// Failures talking to the embedding provider.
///
/// None of these are retried; each is returned to the caller as soon as it
/// happens.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// The request body could not be serialized
    #[error("Failed to prepare embedding request: {source}")]
    RequestPreparation { source: serde_json::Error },

    /// Transport failure: connection refused, DNS, timeout, truncated body
    #[error("Failed to reach embedding service at '{endpoint}': {source}")]
    Unavailable {
        endpoint: String,
        source: reqwest::Error,
    },

    /// The provider answered with anything other than 200 OK
    #[error("Embedding service returned status {status}")]
    ServiceError { status: u16 },

    /// The provider answered 200 but the body is not `{"embedding": [...]}`
    #[error("Failed to parse embedding response: {source}")]
    Parse { source: serde_json::Error },
}

impl EmbeddingError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> String {
        match self {
            Self::RequestPreparation { .. } => "REQUEST_PREPARATION_ERROR",
            Self::Unavailable { .. } => "EMBEDDING_UNAVAILABLE",
            Self::ServiceError { .. } => "EMBEDDING_SERVICE_ERROR",
            Self::Parse { .. } => "EMBEDDING_PARSE_ERROR",
        }
        .to_string()
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Unavailable { .. } => vec![
                "Check that Ollama is running ('ollama serve')",
                "Set OLLAMA_URL or embedding.url if the service is not on localhost:11434",
            ],
            Self::ServiceError { status: 404 } => vec![
                "The embedding model may not be pulled yet ('ollama pull nomic-embed-text')",
            ],
            Self::ServiceError { .. } => {
                vec!["Inspect the embedding service logs for the failing request"]
            }
            Self::Parse { .. } => vec![
                "Verify embedding.model names a model that supports embeddings",
                "Confirm the endpoint speaks the Ollama /api/embeddings protocol",
            ],
            Self::RequestPreparation { .. } => vec![],
        }
    }
}

/// Errors returned by [`crate::search::DocumentService`].
///
/// Both variants wrap the underlying component error unchanged.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Get a stable status code for this error type.
    ///
    /// Returns a string identifier that can be used in JSON responses
    /// for programmatic error handling.
    pub fn status_code(&self) -> String {
        match self {
            Self::Embedding(e) => e.status_code(),
            Self::Store(e) => e.status_code(),
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Embedding(e) => e.recovery_suggestions(),
            Self::Store(e) => e.recovery_suggestions(),
        }
    }
}

/// Result type alias for embedding operations
pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

/// Result type alias for orchestrated operations
pub type ServiceResult<T> = Result<T, ServiceError>;
