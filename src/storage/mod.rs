//! Document persistence and ranked retrieval.
//!
//! [`DocumentStore`] owns validation and vector encoding; the database
//! behind it only has to implement the two statements in
//! [`VectorDatabase`]. [`SqliteDatabase`] is the bundled backend.

mod backend;
mod document;
mod error;
#[cfg(test)]
mod mock;
mod sqlite;
mod store;

pub use backend::{InsertRow, InsertedRow, RankedQuery, RowResult, StoredRow, VectorDatabase};
pub use document::{Document, DocumentId, NewDocument, SearchOutcome, SimilarityResult};
pub use error::{BackendError, RowScanError, StoreError, StoreResult};
#[cfg(test)]
pub use mock::MockDatabase;
pub use sqlite::SqliteDatabase;
pub use store::{DocumentStore, StoreConfig};
