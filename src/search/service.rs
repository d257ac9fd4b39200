//! Ingestion and similarity search over an embedding provider and a store.

use crate::embedding::EmbeddingProvider;
use crate::error::ServiceResult;
use crate::storage::{Document, DocumentStore, NewDocument, SearchOutcome, VectorDatabase};
use tracing::{debug, info};

/// Stateless orchestrator tying the embedding provider to the store.
///
/// Each call embeds at most once and touches the store at most once.
/// Errors from either side are returned unchanged; nothing is cached,
/// batched or retried.
#[derive(Debug)]
pub struct DocumentService<P, D> {
    provider: P,
    store: DocumentStore<D>,
}

impl<P: EmbeddingProvider, D: VectorDatabase> DocumentService<P, D> {
    pub fn new(provider: P, store: DocumentStore<D>) -> Self {
        Self { provider, store }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn store(&self) -> &DocumentStore<D> {
        &self.store
    }

    /// Embeds `content` and stores it.
    ///
    /// All-or-nothing: if the embedding call fails the store is never
    /// called, so no document exists without a real embedding.
    pub fn ingest_document(
        &self,
        content: &str,
        media_type: Option<&str>,
        file_name: Option<&str>,
    ) -> ServiceResult<Document> {
        debug!(
            "Ingesting document: content_len={}, model={}",
            content.len(),
            self.provider.model_name()
        );
        let embedding = self.provider.embed(content)?;

        let doc = NewDocument::new(content, embedding)
            .with_media_type(media_type.map(str::to_string))
            .with_file_name(file_name.map(str::to_string));
        let document = self.store.insert(doc)?;

        info!("Ingested document {}", document.id);
        Ok(document)
    }

    /// Embeds `text` and returns the nearest stored documents.
    pub fn query_by_text(&self, text: &str, limit: usize) -> ServiceResult<SearchOutcome> {
        debug!("Querying by text: query_len={}, limit={limit}", text.len());
        let embedding = self.provider.embed(text)?;
        self.query_by_vector(&embedding, limit)
    }

    /// Returns the nearest stored documents to a caller-supplied vector.
    pub fn query_by_vector(&self, embedding: &[f32], limit: usize) -> ServiceResult<SearchOutcome> {
        Ok(self.store.search_similar(embedding, limit)?)
    }
}
