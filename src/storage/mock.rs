//! In-memory [`VectorDatabase`] double for unit tests.

use super::{
    BackendError, InsertRow, InsertedRow, RankedQuery, RowResult, StoredRow, VectorDatabase,
};
use crate::vector::{DecodePolicy, DistanceMetric};
use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;

/// Owned copy of an insert call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedInsert {
    pub content: String,
    pub media_type: Option<String>,
    pub file_name: Option<String>,
    pub embedding: String,
}

/// Owned copy of a ranked query call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedQuery {
    pub embedding: String,
    pub limit: usize,
    pub metric: DistanceMetric,
    pub decode_policy: DecodePolicy,
}

/// Records every call and answers with canned data.
///
/// Inserts echo back sequential ids starting at `next_id` with a fixed
/// timestamp; ranked queries return the configured rows verbatim,
/// ignoring the limit.
#[derive(Debug, Default)]
pub struct MockDatabase {
    next_id: Mutex<i64>,
    rows: Vec<RowResult>,
    failure: Option<String>,
    inserts: Mutex<Vec<RecordedInsert>>,
    queries: Mutex<Vec<RecordedQuery>>,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self {
            next_id: Mutex::new(1),
            ..Self::default()
        }
    }

    pub fn with_next_id(self, id: i64) -> Self {
        *self.next_id.lock() = id;
        self
    }

    pub fn with_rows(mut self, rows: Vec<RowResult>) -> Self {
        self.rows = rows;
        self
    }

    /// Makes every call fail with `message`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Timestamp assigned to every insert and canned row.
    pub fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap()
    }

    /// Builds a well-formed row.
    pub fn row(id: i64, embedding: &str, similarity: f64) -> StoredRow {
        StoredRow {
            id,
            content: format!("document {id}"),
            media_type: None,
            file_name: None,
            embedding: embedding.to_string(),
            created_at: Self::timestamp(),
            similarity,
        }
    }

    pub fn inserts(&self) -> Vec<RecordedInsert> {
        self.inserts.lock().clone()
    }

    pub fn insert_calls(&self) -> usize {
        self.inserts.lock().len()
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.queries.lock().clone()
    }

    fn check_failure(&self) -> Result<(), BackendError> {
        match &self.failure {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }
}

impl VectorDatabase for MockDatabase {
    fn insert_document(&self, row: InsertRow<'_>) -> Result<InsertedRow, BackendError> {
        self.inserts.lock().push(RecordedInsert {
            content: row.content.to_string(),
            media_type: row.media_type.map(str::to_string),
            file_name: row.file_name.map(str::to_string),
            embedding: row.embedding.to_string(),
        });
        self.check_failure()?;

        let mut next_id = self.next_id.lock();
        let id = *next_id;
        *next_id += 1;
        Ok(InsertedRow {
            id,
            created_at: Self::timestamp(),
        })
    }

    fn query_ranked(&self, query: RankedQuery<'_>) -> Result<Vec<RowResult>, BackendError> {
        self.queries.lock().push(RecordedQuery {
            embedding: query.embedding.to_string(),
            limit: query.limit,
            metric: query.metric,
            decode_policy: query.decode_policy,
        });
        self.check_failure()?;
        Ok(self.rows.clone())
    }
}
