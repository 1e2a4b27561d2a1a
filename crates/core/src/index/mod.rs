//! Notebook index for fast queries on notes.
//!
//! This module provides SQLite-based indexing for:
//! - Note metadata (path, title, word count, checksum, dates)
//! - Full-text search over path, title and body, ranked with BM25
//! - Incremental updates against the files on disk
//!
//! # Example
//!
//! ```no_run
//! use noteindex_core::index::{DateDirection, Filter, FinderOpts, IndexDb};
//! use chrono::Utc;
//! use std::path::Path;
//!
//! let db = IndexDb::open(Path::new(".noteindex/index.db")).unwrap();
//!
//! let opts = FinderOpts::new(vec![
//!     Filter::matching("daily | index"),
//!     Filter::exclude_path(["archive"]),
//!     Filter::modified(DateDirection::Before, Utc::now()),
//! ])
//! .with_limit(10);
//!
//! for found in db.notes().find_all(&opts).unwrap() {
//!     println!("{}: {}", found.metadata.path, found.snippet);
//! }
//! ```

pub mod builder;
pub mod db;
pub mod filter;
pub mod finder;
pub mod notes;
pub mod reconcile;
pub mod schema;
pub mod types;

#[cfg(test)]
mod test_support;

pub use builder::{BuilderError, IndexBuilder, IndexStats, NoteSource, ProgressCallback};
pub use db::{IndexDb, IndexError, Operation};
pub use filter::{DateDirection, DateField, DateFilter, Filter, convert_query};
pub use finder::{MATCH_END, MATCH_START};
pub use notes::{INDEXED_PAGE_SIZE, IndexedNotes, NoteDao};
pub use reconcile::{DiffStats, FileChange, reconcile};
pub use schema::{SCHEMA_VERSION, SchemaError};
pub use types::{FinderOpts, IndexedMetadata, Match, NoteMetadata, PathMetadata};
