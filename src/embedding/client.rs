//! Embedding providers.
//!
//! [`OllamaClient`] talks to an Ollama-compatible `/api/embeddings`
//! endpoint over blocking HTTP. Every call is a single request; failures
//! are classified and returned without retrying.

use super::embeddings_url;
use crate::error::{EmbeddingError, EmbeddingResult};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

/// Model requested when none is configured.
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Trait for turning text into an embedding vector.
///
/// Implementations must be thread-safe; the search service may be shared
/// across callers.
pub trait EmbeddingProvider: Send + Sync {
    /// Embeds a single text.
    fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>>;

    /// Name of the model producing the embeddings.
    fn model_name(&self) -> &str;
}

impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for std::sync::Arc<T> {
    fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        (**self).embed(text)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Blocking client for the Ollama embeddings API.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:11434`).
    ///
    /// `timeout` bounds the whole request; `None` waits indefinitely.
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint: embeddings_url(base_url),
            model: model.into(),
        })
    }

    /// Full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl EmbeddingProvider for OllamaClient {
    fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        let body = serde_json::to_vec(&EmbeddingRequest {
            model: &self.model,
            prompt: text,
        })
        .map_err(|source| {
            error!("Failed to serialize embedding request: {source}");
            EmbeddingError::RequestPreparation { source }
        })?;

        debug!(
            "Sending embedding request to {}: model={}, prompt_len={}",
            self.endpoint,
            self.model,
            text.len()
        );

        let unavailable = |source: reqwest::Error| {
            error!("Embedding service connection error: {source}");
            EmbeddingError::Unavailable {
                endpoint: self.endpoint.clone(),
                source,
            }
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .map_err(unavailable)?;

        let status = response.status();
        let bytes = response.bytes().map_err(unavailable)?;
        debug!(
            "Embedding response: status={}, body_len={}",
            status.as_u16(),
            bytes.len()
        );

        if status != StatusCode::OK {
            error!("Embedding service returned non-200 status: {status}");
            return Err(EmbeddingError::ServiceError {
                status: status.as_u16(),
            });
        }

        let parsed: EmbeddingResponse = serde_json::from_slice(&bytes).map_err(|source| {
            error!("Failed to parse embedding response: {source}");
            EmbeddingError::Parse { source }
        })?;

        debug!("Received embedding with {} dimensions", parsed.embedding.len());
        Ok(parsed.embedding)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Mock embedding provider for testing.
///
/// Returns a fixed vector, or fails every call with a service error, and
/// records the prompts it was given.
#[cfg(test)]
pub struct MockEmbeddingProvider {
    embedding: Vec<f32>,
    failure_status: Option<u16>,
    prompts: parking_lot::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockEmbeddingProvider {
    pub fn returning(embedding: Vec<f32>) -> Self {
        Self {
            embedding,
            failure_status: None,
            prompts: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn failing_with_status(status: u16) -> Self {
        Self {
            failure_status: Some(status),
            ..Self::returning(Vec::new())
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[cfg(test)]
impl EmbeddingProvider for MockEmbeddingProvider {
    fn embed(&self, text: &str) -> EmbeddingResult<Vec<f32>> {
        self.prompts.lock().push(text.to_string());
        match self.failure_status {
            Some(status) => Err(EmbeddingError::ServiceError { status }),
            None => Ok(self.embedding.clone()),
        }
    }

    fn model_name(&self) -> &str {
        "mock-embed"
    }
}
