//! SQLite backend for the document store.
//!
//! Embeddings are stored as vector literals in a TEXT column. Distance
//! functions registered on the connection stand in for pgvector's
//! operators, so ranking happens inside the database and the store only
//! ever sees pre-ordered rows.

use super::{
    BackendError, InsertRow, InsertedRow, RankedQuery, RowResult, RowScanError, StoredRow,
    VectorDatabase,
};
use crate::vector::{self, DecodePolicy, DistanceMetric};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::functions::{Context, FunctionFlags};
use rusqlite::types::Type;
use rusqlite::{Connection, Row, params};
use std::path::Path;
use tracing::debug;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS documents (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        content TEXT NOT NULL,
        media_type TEXT,
        file_name TEXT,
        embedding TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
    );

    CREATE INDEX IF NOT EXISTS idx_documents_created ON documents(created_at);
"#;

const INSERT_DOCUMENT: &str = "INSERT INTO documents (content, media_type, file_name, embedding)
     VALUES (?1, ?2, ?3, ?4)
     RETURNING id, created_at";

const DISTANCE_METRICS: [DistanceMetric; 3] = [
    DistanceMetric::Cosine,
    DistanceMetric::L2,
    DistanceMetric::InnerProduct,
];

/// Builds the ranked query for a metric.
///
/// `?3` selects lenient reading of stored literals. Rows whose distance is
/// NULL (unreadable or mismatched vectors) sort last and come back with a
/// NULL similarity, which fails the row scan.
fn ranked_query_sql(metric: DistanceMetric) -> String {
    format!(
        "SELECT id, content, media_type, file_name, embedding, created_at,
                1 - distance AS similarity
         FROM (SELECT *, {}(embedding, ?1, ?3) AS distance FROM documents)
         ORDER BY distance IS NULL, distance, id
         LIMIT ?2",
        metric.sql_function()
    )
}

/// Document database backed by a single SQLite connection.
pub struct SqliteDatabase {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDatabase")
            .field("path", &self.conn.lock().path().map(str::to_owned))
            .finish()
    }
}

impl SqliteDatabase {
    /// Opens (or creates) a database file and ensures the schema exists.
    pub fn open(path: impl AsRef<Path>) -> rusqlite::Result<Self> {
        let path = path.as_ref();
        debug!("Opening document database at {}", path.display());
        Self::with_connection(Connection::open(path)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> rusqlite::Result<Self> {
        register_distance_functions(&conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Number of stored documents.
    pub fn document_count(&self) -> rusqlite::Result<u64> {
        let count: i64 =
            self.conn
                .lock()
                .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

impl VectorDatabase for SqliteDatabase {
    fn insert_document(&self, row: InsertRow<'_>) -> Result<InsertedRow, BackendError> {
        let conn = self.conn.lock();
        let (id, created_at): (i64, String) = conn.query_row(
            INSERT_DOCUMENT,
            params![row.content, row.media_type, row.file_name, row.embedding],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )?;

        Ok(InsertedRow {
            id,
            created_at: parse_timestamp(&created_at)?,
        })
    }

    fn query_ranked(&self, query: RankedQuery<'_>) -> Result<Vec<RowResult>, BackendError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&ranked_query_sql(query.metric))?;
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);

        // Stepping errors abort the statement; column errors only cost the row
        let lenient = query.decode_policy == DecodePolicy::Lenient;
        let mut rows = stmt.query(params![query.embedding, limit, lenient])?;
        let mut results = Vec::new();
        while let Some(row) = rows.next()? {
            let position = results.len();
            results.push(scan_row(row).map_err(|e| RowScanError {
                position,
                reason: e.to_string(),
            }));
        }

        Ok(results)
    }
}

fn register_distance_functions(conn: &Connection) -> rusqlite::Result<()> {
    for metric in DISTANCE_METRICS {
        conn.create_scalar_function(
            metric.sql_function(),
            3,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            move |ctx| literal_distance(ctx, metric),
        )?;
    }
    Ok(())
}

/// `(stored, query, lenient)`: NULL unless both literals decode to vectors
/// of equal length.
///
/// The stored literal is read with the requested policy; the query literal
/// was produced by the encoder and is always read strictly.
fn literal_distance(ctx: &Context<'_>, metric: DistanceMetric) -> rusqlite::Result<Option<f64>> {
    let stored: String = ctx.get(0)?;
    let query: String = ctx.get(1)?;
    let policy = if ctx.get::<bool>(2)? {
        DecodePolicy::Lenient
    } else {
        DecodePolicy::Strict
    };

    let (Ok(stored), Ok(query)) = (policy.decode(&stored), vector::decode(&query)) else {
        return Ok(None);
    };
    Ok(metric.distance(&stored, &query).ok())
}

fn scan_row(row: &Row<'_>) -> rusqlite::Result<StoredRow> {
    let created_at: String = row.get(5)?;
    let created_at = parse_timestamp(&created_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;

    Ok(StoredRow {
        id: row.get(0)?,
        content: row.get(1)?,
        media_type: row.get(2)?,
        file_name: row.get(3)?,
        embedding: row.get(4)?,
        created_at,
        similarity: row.get(6)?,
    })
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}
