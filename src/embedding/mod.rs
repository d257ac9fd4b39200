//! Embedding provider client and endpoint resolution.

mod client;
mod endpoint;

#[cfg(test)]
pub use client::MockEmbeddingProvider;
pub use client::{DEFAULT_EMBEDDING_MODEL, EmbeddingProvider, OllamaClient};
pub use endpoint::{
    CONTAINER_GATEWAY_URL, CONTAINER_MARKER_ENV, EMBEDDINGS_PATH, EndpointSources,
    LOCAL_DEFAULT_URL, OLLAMA_URL_ENV, embeddings_url,
};
