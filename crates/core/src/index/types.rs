//! Index data types for notebook notes and query results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::filter::Filter;

/// A note as known to the caller before (or after) indexing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoteMetadata {
    /// Path relative to the notebook root, `/`-separated. Sole identity key.
    pub path: String,
    /// Note title (from frontmatter, first heading, or filename).
    pub title: String,
    /// Raw content, excluding the title.
    pub body: String,
    /// Number of words in the body.
    pub word_count: u32,
    /// Content fingerprint.
    pub checksum: String,
    /// Creation time.
    pub created: DateTime<Utc>,
    /// Last modification time.
    pub modified: DateTime<Utc>,
}

/// Lightweight projection of an indexed note, used to detect stale entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedMetadata {
    pub path: String,
    pub modified: DateTime<Utc>,
}

/// A path and its modification time as seen on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMetadata {
    pub path: String,
    pub modified: DateTime<Utc>,
}

/// A search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// The note as stored in the index.
    pub metadata: NoteMetadata,
    /// Excerpt of the body, with matched terms wrapped in
    /// [`MATCH_START`](super::MATCH_START) / [`MATCH_END`](super::MATCH_END)
    /// when a free-text filter was used.
    pub snippet: String,
}

/// Options for [`NoteDao::find`](super::NoteDao::find).
#[derive(Debug, Clone, Default)]
pub struct FinderOpts {
    /// Filters combined with logical AND.
    pub filters: Vec<Filter>,
    /// Maximum number of results. 0 means unbounded.
    pub limit: usize,
}

impl FinderOpts {
    pub fn new(filters: Vec<Filter>) -> Self {
        Self { filters, limit: 0 }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}
