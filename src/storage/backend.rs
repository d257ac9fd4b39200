//! The two statements the document store needs from a database.
//!
//! Backends see vectors only as literals produced by
//! [`crate::vector::encode`]; decoding and validation stay in the store.

use super::{BackendError, RowScanError};
use crate::vector::{DecodePolicy, DistanceMetric};
use chrono::{DateTime, Utc};

/// Parameters of the insert statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsertRow<'a> {
    pub content: &'a str,
    pub media_type: Option<&'a str>,
    pub file_name: Option<&'a str>,
    /// Vector literal
    pub embedding: &'a str,
}

/// Values the database generated for an inserted row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertedRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
}

/// Parameters of the ranked query statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedQuery<'a> {
    /// Vector literal of the query embedding
    pub embedding: &'a str,
    pub limit: usize,
    pub metric: DistanceMetric,
    /// How the distance function reads stored literals
    pub decode_policy: DecodePolicy,
}

/// One row of the ranked query, still carrying the raw vector literal.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRow {
    pub id: i64,
    pub content: String,
    pub media_type: Option<String>,
    pub file_name: Option<String>,
    pub embedding: String,
    pub created_at: DateTime<Utc>,
    /// `1 - distance` as computed by the database
    pub similarity: f64,
}

/// Row-level outcome of a ranked query.
pub type RowResult = Result<StoredRow, RowScanError>;

/// A relational store with a vector distance function.
///
/// Implementations issue exactly one statement per call. Whole-statement
/// failures are returned as `Err`; a row that fails to scan is reported
/// in place as `Err(RowScanError)` so the caller can keep the rest.
pub trait VectorDatabase: Send + Sync {
    /// Inserts one document and returns its generated id and timestamp.
    fn insert_document(&self, row: InsertRow<'_>) -> Result<InsertedRow, BackendError>;

    /// Returns at most `query.limit` rows ordered by ascending distance.
    fn query_ranked(&self, query: RankedQuery<'_>) -> Result<Vec<RowResult>, BackendError>;
}

impl<T: VectorDatabase + ?Sized> VectorDatabase for std::sync::Arc<T> {
    fn insert_document(&self, row: InsertRow<'_>) -> Result<InsertedRow, BackendError> {
        (**self).insert_document(row)
    }

    fn query_ranked(&self, query: RankedQuery<'_>) -> Result<Vec<RowResult>, BackendError> {
        (**self).query_ranked(query)
    }
}
