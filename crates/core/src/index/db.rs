//! Database connection, error taxonomy and timestamp encoding.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, Transaction};
use thiserror::Error;

use super::notes::NoteDao;
use super::schema::{SchemaError, init_schema};

/// The note operation that failed, rendered as a user-facing phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Update,
    Remove,
    Lookup,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Add => "can't add note to the index",
            Self::Update => "failed to update note index",
            Self::Remove => "failed to remove note index",
            Self::Lookup => "can't read note from the index",
        })
    }
}

#[derive(Debug, Error)]
pub enum IndexError {
    /// Connection or transaction level failure.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("{path}: can't add note to the index: a note with this path already exists")]
    DuplicatePath {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("{path}: {operation}: note not found in the index")]
    NotIndexed { path: String, operation: Operation },

    #[error("can't search the index (query: {query})")]
    Query {
        query: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Storage failure while operating on a single note.
    #[error("{path}: {operation}")]
    Storage {
        path: String,
        operation: Operation,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl IndexError {
    /// Whether the caller may retry the operation after rolling back.
    ///
    /// Only storage-level faults qualify; duplicate and missing paths, bad
    /// queries and invalid data need the caller to change something first.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::Storage { .. })
    }
}

/// Notebook index database handle.
pub struct IndexDb {
    conn: Connection,
}

impl IndexDb {
    /// Open or create an index database at the given path.
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, IndexError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Get the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begin a unit of work. Pass the transaction to [`NoteDao::new`] and
    /// commit it once every related operation has succeeded; dropping it
    /// rolls everything back.
    pub fn transaction(&mut self) -> Result<Transaction<'_>, IndexError> {
        Ok(self.conn.transaction()?)
    }

    /// Note operations in autocommit mode, outside any explicit transaction.
    pub fn notes(&self) -> NoteDao<'_> {
        NoteDao::new(&self.conn)
    }
}

/// Encode a timestamp for storage.
///
/// Fixed nanosecond precision keeps text comparison chronological and
/// round-trips exact.
pub(crate) fn encode_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn decode_time(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<DateTime<Utc>, rusqlite::Error> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_encoded_time_is_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2020, 11, 22, 16, 27, 45).unwrap();
        let fractional = whole + chrono::Duration::milliseconds(500);

        assert_eq!(encode_time(&whole), "2020-11-22T16:27:45.000000000Z");
        assert_eq!(encode_time(&whole).len(), encode_time(&fractional).len());
        assert!(encode_time(&whole) < encode_time(&fractional));
    }

    #[test]
    fn test_open_on_disk_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("index.db");

        {
            let db = IndexDb::open(&path).unwrap();
            db.notes()
                .add(&crate::index::NoteMetadata {
                    path: "a.md".into(),
                    ..Default::default()
                })
                .unwrap();
        }

        let db = IndexDb::open(&path).unwrap();
        assert_eq!(db.notes().count().unwrap(), 1);
    }

    #[test]
    fn test_dropped_transaction_rolls_back() {
        let mut db = IndexDb::open_in_memory().unwrap();
        {
            let tx = db.transaction().unwrap();
            NoteDao::new(&tx)
                .add(&crate::index::NoteMetadata {
                    path: "a.md".into(),
                    ..Default::default()
                })
                .unwrap();
        }
        assert_eq!(db.notes().count().unwrap(), 0);
    }

    #[test]
    fn test_error_messages_name_path_and_operation() {
        let err = IndexError::NotIndexed {
            path: "unknown/unknown.md".into(),
            operation: Operation::Update,
        };
        assert_eq!(
            err.to_string(),
            "unknown/unknown.md: failed to update note index: note not found in the index"
        );
        assert!(!err.is_retryable());
    }
}
