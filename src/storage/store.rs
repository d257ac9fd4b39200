//! Document store: validation and vector encoding around a [`VectorDatabase`].

use super::{
    Document, DocumentId, InsertRow, NewDocument, RankedQuery, RowScanError, SearchOutcome,
    SimilarityResult, StoreError, StoreResult, StoredRow, VectorDatabase,
};
use crate::vector::{self, DecodePolicy, DistanceMetric, Similarity, VectorDimension};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// Vector parameters the store validates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Dimensionality every stored and query vector must have
    pub dimension: VectorDimension,

    /// Distance metric used for ranking
    pub metric: DistanceMetric,

    /// How stored literals with bad components are read back
    pub decode_policy: DecodePolicy,
}

/// Persists documents with their embeddings and runs ranked lookups.
///
/// Holds no mutable state of its own; concurrency guarantees are those of
/// the underlying database.
#[derive(Debug)]
pub struct DocumentStore<D> {
    database: D,
    config: StoreConfig,
}

impl<D: VectorDatabase> DocumentStore<D> {
    pub fn new(database: D, config: StoreConfig) -> Self {
        Self { database, config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn database(&self) -> &D {
        &self.database
    }

    /// Inserts a document and returns it with its database identity.
    ///
    /// The embedding is validated and encoded before the database is
    /// touched. On failure nothing is returned, so the caller never holds a
    /// document without an id.
    pub fn insert(&self, doc: NewDocument) -> StoreResult<Document> {
        self.config.dimension.validate_vector(&doc.embedding)?;
        let literal = vector::encode(&doc.embedding)?;

        debug!(
            "Inserting document: content_len={}, media_type={:?}, file_name={:?}, embedding_len={}",
            doc.content.len(),
            doc.media_type,
            doc.file_name,
            doc.embedding.len()
        );

        let inserted = self
            .database
            .insert_document(InsertRow {
                content: &doc.content,
                media_type: doc.media_type.as_deref(),
                file_name: doc.file_name.as_deref(),
                embedding: &literal,
            })
            .map_err(|e| {
                error!("Failed to insert document: {e}");
                StoreError::persistence("insert", e)
            })?;

        info!("Stored document {} at {}", inserted.id, inserted.created_at);
        Ok(Document::from_new(
            doc,
            DocumentId::new(inserted.id),
            inserted.created_at,
        ))
    }

    /// Returns up to `limit` documents ranked by ascending distance to `query`.
    ///
    /// Rows that cannot be read are logged and skipped; their count is
    /// reported in [`SearchOutcome::skipped`] and the remaining rows keep
    /// the database's order.
    pub fn search_similar(&self, query: &[f32], limit: usize) -> StoreResult<SearchOutcome> {
        if limit == 0 {
            return Err(StoreError::InvalidLimit { limit });
        }
        self.config.dimension.validate_vector(query)?;
        let literal = vector::encode(query)?;

        debug!(
            "Executing ranked query: embedding_len={}, limit={}, metric={}",
            query.len(),
            limit,
            self.config.metric
        );

        let rows = self
            .database
            .query_ranked(RankedQuery {
                embedding: &literal,
                limit,
                metric: self.config.metric,
                decode_policy: self.config.decode_policy,
            })
            .map_err(|e| {
                error!("Ranked query failed: {e}");
                StoreError::persistence("search", e)
            })?;

        let mut outcome = SearchOutcome::default();
        for (position, row) in rows.into_iter().enumerate() {
            match row.and_then(|row| self.to_result(position, row)) {
                Ok(result) => {
                    debug!(
                        "Found document {} with similarity {}",
                        result.document.id, result.similarity
                    );
                    outcome.results.push(result);
                }
                Err(e) => {
                    warn!("Skipping unreadable search row: {e}");
                    outcome.skipped += 1;
                }
            }
        }

        info!(
            "Search returned {} documents ({} skipped)",
            outcome.results.len(),
            outcome.skipped
        );
        Ok(outcome)
    }

    fn to_result(&self, position: usize, row: StoredRow) -> Result<SimilarityResult, RowScanError> {
        let scan_error = |reason: String| RowScanError { position, reason };

        let embedding = self
            .config
            .decode_policy
            .decode(&row.embedding)
            .map_err(|e| scan_error(e.to_string()))?;
        self.config
            .dimension
            .validate_vector(&embedding)
            .map_err(|e| scan_error(e.to_string()))?;

        Ok(SimilarityResult {
            document: Document {
                id: DocumentId::new(row.id),
                content: row.content,
                media_type: row.media_type,
                file_name: row.file_name,
                embedding,
                created_at: row.created_at,
            },
            similarity: Similarity::new(row.similarity),
        })
    }
}
