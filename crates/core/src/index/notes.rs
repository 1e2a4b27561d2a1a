//! Note rows: add, update, remove, lookup and the indexed-path listing.

use std::vec;

use rusqlite::{Connection, OptionalExtension, params};

use super::db::{IndexError, Operation, decode_time, encode_time};
use super::types::{IndexedMetadata, NoteMetadata};

/// Default number of rows fetched per page by [`IndexedNotes`].
pub const INDEXED_PAGE_SIZE: usize = 256;

/// Columns read back into a [`NoteMetadata`], in `row_to_metadata` order.
pub(crate) const NOTE_COLUMNS: &str =
    "n.path, n.title, n.body, n.word_count, n.checksum, n.created, n.modified";

/// Data access for note rows.
///
/// Works on any connection, including a [`rusqlite::Transaction`], which
/// derefs to one. The DAO never opens or commits a transaction itself: the
/// caller decides the unit of work.
#[derive(Clone, Copy)]
pub struct NoteDao<'a> {
    pub(crate) conn: &'a Connection,
}

impl<'a> NoteDao<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a new note. Returns its row ID.
    pub fn add(&self, note: &NoteMetadata) -> Result<i64, IndexError> {
        if note.path.is_empty() {
            return Err(IndexError::InvalidData("note path must not be empty".to_string()));
        }

        let result = self.conn.execute(
            "INSERT INTO notes (path, title, body, word_count, checksum, created, modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                note.path,
                note.title,
                note.body,
                note.word_count,
                note.checksum,
                encode_time(&note.created),
                encode_time(&note.modified),
            ],
        );

        match result {
            Ok(_) => {
                tracing::debug!(path = %note.path, "note added to index");
                Ok(self.conn.last_insert_rowid())
            }
            Err(source) if is_unique_violation(&source) => {
                Err(IndexError::DuplicatePath { path: note.path.clone(), source })
            }
            Err(source) => Err(IndexError::Storage {
                path: note.path.clone(),
                operation: Operation::Add,
                source,
            }),
        }
    }

    /// Replace every field of an indexed note except its path.
    pub fn update(&self, note: &NoteMetadata) -> Result<(), IndexError> {
        let rows = self
            .conn
            .execute(
                "UPDATE notes SET
                    title = ?1, body = ?2, word_count = ?3, checksum = ?4,
                    created = ?5, modified = ?6
                 WHERE path = ?7",
                params![
                    note.title,
                    note.body,
                    note.word_count,
                    note.checksum,
                    encode_time(&note.created),
                    encode_time(&note.modified),
                    note.path,
                ],
            )
            .map_err(|source| IndexError::Storage {
                path: note.path.clone(),
                operation: Operation::Update,
                source,
            })?;

        // SQLite reports an UPDATE matching nothing as success.
        if rows == 0 {
            return Err(IndexError::NotIndexed {
                path: note.path.clone(),
                operation: Operation::Update,
            });
        }

        tracing::debug!(path = %note.path, "note updated in index");
        Ok(())
    }

    /// Delete an indexed note. The file itself is left alone.
    pub fn remove(&self, path: &str) -> Result<(), IndexError> {
        let rows = self
            .conn
            .execute("DELETE FROM notes WHERE path = ?1", [path])
            .map_err(|source| IndexError::Storage {
                path: path.to_string(),
                operation: Operation::Remove,
                source,
            })?;

        if rows == 0 {
            return Err(IndexError::NotIndexed {
                path: path.to_string(),
                operation: Operation::Remove,
            });
        }

        tracing::debug!(path, "note removed from index");
        Ok(())
    }

    /// Get a note by its path.
    pub fn get(&self, path: &str) -> Result<Option<NoteMetadata>, IndexError> {
        self.conn
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes n WHERE n.path = ?1"),
                [path],
                row_to_metadata,
            )
            .optional()
            .map_err(|source| IndexError::Storage {
                path: path.to_string(),
                operation: Operation::Lookup,
                source,
            })
    }

    /// Get total note count.
    pub fn count(&self) -> Result<usize, IndexError> {
        let count: i64 =
            self.conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// List every indexed path with its modification time, ascending by path.
    ///
    /// Rows are fetched lazily, one page at a time. Each call starts a fresh
    /// enumeration.
    pub fn indexed(&self) -> IndexedNotes<'a> {
        IndexedNotes {
            conn: self.conn,
            page_size: INDEXED_PAGE_SIZE,
            after: None,
            page: Vec::new().into_iter(),
            exhausted: false,
        }
    }
}

/// Lazy enumeration of indexed notes, see [`NoteDao::indexed`].
pub struct IndexedNotes<'a> {
    conn: &'a Connection,
    page_size: usize,
    after: Option<String>,
    page: vec::IntoIter<IndexedMetadata>,
    exhausted: bool,
}

impl IndexedNotes<'_> {
    /// Change the number of rows fetched per round trip.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn fetch_page(&self) -> Result<Vec<IndexedMetadata>, IndexError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT path, modified FROM notes WHERE path > ?1 ORDER BY path LIMIT ?2",
        )?;
        let after = self.after.as_deref().unwrap_or("");
        let limit = i64::try_from(self.page_size).unwrap_or(i64::MAX);

        let rows = stmt.query_map(params![after, limit], |row| {
            Ok(IndexedMetadata {
                path: row.get(0)?,
                modified: decode_time(row, 1)?,
            })
        })?;

        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl Iterator for IndexedNotes<'_> {
    type Item = Result<IndexedMetadata, IndexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(entry) = self.page.next() {
            return Some(Ok(entry));
        }
        if self.exhausted {
            return None;
        }

        match self.fetch_page() {
            Ok(page) => {
                self.exhausted = page.len() < self.page_size;
                self.after = page.last().map(|entry| entry.path.clone());
                self.page = page.into_iter();
                self.page.next().map(Ok)
            }
            Err(e) => {
                self.exhausted = true;
                Some(Err(e))
            }
        }
    }
}

pub(crate) fn row_to_metadata(row: &rusqlite::Row) -> Result<NoteMetadata, rusqlite::Error> {
    Ok(NoteMetadata {
        path: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
        word_count: row.get(3)?,
        checksum: row.get(4)?,
        created: decode_time(row, 5)?,
        modified: decode_time(row, 6)?,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
