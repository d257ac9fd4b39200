//! Document store with embedding ingestion and vector similarity search.
//!
//! Text is embedded through an Ollama-compatible service, stored with its
//! vector in SQLite, and retrieved by nearest-neighbour ranking.

pub mod config;
pub mod display;
pub mod embedding;
pub mod error;
pub mod io;
pub mod search;
pub mod storage;
pub mod vector;

// Explicit exports for better API clarity
pub use config::Settings;
pub use embedding::{EmbeddingProvider, OllamaClient};
pub use error::{EmbeddingError, EmbeddingResult, ServiceError, ServiceResult};
pub use search::DocumentService;
pub use storage::{
    Document, DocumentId, DocumentStore, NewDocument, SearchOutcome, SimilarityResult,
    SqliteDatabase, StoreConfig, StoreError, StoreResult, VectorDatabase,
};
pub use vector::{DecodePolicy, DistanceMetric, Similarity, VectorDimension};
