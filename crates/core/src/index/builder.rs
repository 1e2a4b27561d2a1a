//! Index building orchestration.

use std::error::Error as StdError;
use std::time::Instant;

use thiserror::Error;

use super::db::{IndexDb, IndexError};
use super::notes::NoteDao;
use super::reconcile::{FileChange, reconcile};
use super::types::{NoteMetadata, PathMetadata};

type BoxError = Box<dyn StdError + Send + Sync>;

/// Where the notes being indexed come from.
pub trait NoteSource {
    type Error: StdError + Send + Sync + 'static;

    /// Every note currently available, in any order.
    fn list(&self) -> Result<Vec<PathMetadata>, Self::Error>;

    /// Read the full metadata of one note listed by [`list`](Self::list).
    fn load(&self, path: &str) -> Result<NoteMetadata, Self::Error>;
}

#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("Failed to list notes: {0}")]
    Source(#[source] BoxError),

    #[error("Index database error: {0}")]
    Index(#[from] IndexError),

    #[error("Failed to load note {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: BoxError,
    },
}

/// Statistics from an indexing operation.
#[derive(Debug, Default)]
pub struct IndexStats {
    /// Number of notes listed by the source.
    pub files_found: usize,
    /// Notes added to the index.
    pub added: usize,
    /// Notes re-read and updated.
    pub modified: usize,
    /// Notes removed from the index.
    pub removed: usize,
    /// Notes left as they were.
    pub unchanged: usize,
    /// Paths that could not be applied, with the reason.
    pub failures: Vec<(String, BuilderError)>,
    /// Indexing duration in milliseconds.
    pub duration_ms: u64,
}

/// Progress callback for indexing operations.
/// Parameters: (current, total, current_path)
pub type ProgressCallback = Box<dyn Fn(usize, usize, &str)>;

/// Brings an index in line with a [`NoteSource`].
pub struct IndexBuilder<'a> {
    db: &'a mut IndexDb,
    progress: Option<ProgressCallback>,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(db: &'a mut IndexDb) -> Self {
        Self { db, progress: None }
    }

    /// Report each applied change to `progress`.
    pub fn with_progress(mut self, progress: ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Add new notes, refresh modified ones and drop the ones that are gone.
    ///
    /// With `force`, every note present on both sides is re-read regardless
    /// of its modification time. The whole pass runs in one transaction: a
    /// single note failing is recorded in [`IndexStats::failures`], but a
    /// listing or commit failure leaves the index untouched.
    pub fn reindex<S: NoteSource>(
        &mut self,
        source: &S,
        force: bool,
    ) -> Result<IndexStats, BuilderError> {
        let start = Instant::now();
        let mut stats = IndexStats::default();

        let disk = source.list().map_err(|e| BuilderError::Source(Box::new(e)))?;
        stats.files_found = disk.len();

        let tx = self.db.transaction()?;
        let dao = NoteDao::new(&tx);

        let mut changes = Vec::new();
        let diff = reconcile(dao.indexed(), disk, force, |change| changes.push(change))?;
        stats.unchanged = diff.unchanged;

        let total = changes.len();
        for (i, change) in changes.into_iter().enumerate() {
            if let Some(ref cb) = self.progress {
                cb(i + 1, total, change.path());
            }

            match apply_change(&dao, source, &change) {
                Ok(()) => match change {
                    FileChange::Added(_) => stats.added += 1,
                    FileChange::Modified(_) => stats.modified += 1,
                    FileChange::Deleted(_) => stats.removed += 1,
                },
                Err(e) => stats.failures.push((change.path().to_string(), e)),
            }
        }

        tx.commit().map_err(IndexError::from)?;

        stats.duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        tracing::info!(
            found = stats.files_found,
            added = stats.added,
            modified = stats.modified,
            removed = stats.removed,
            unchanged = stats.unchanged,
            failed = stats.failures.len(),
            duration_ms = stats.duration_ms,
            "index updated"
        );
        Ok(stats)
    }
}

fn apply_change<S: NoteSource>(
    dao: &NoteDao<'_>,
    source: &S,
    change: &FileChange,
) -> Result<(), BuilderError> {
    let load = |path: &str| {
        source
            .load(path)
            .map_err(|e| BuilderError::Load { path: path.to_string(), source: Box::new(e) })
    };

    match change {
        FileChange::Added(path) => {
            dao.add(&load(path)?)?;
        }
        FileChange::Modified(path) => dao.update(&load(path)?)?,
        FileChange::Deleted(path) => dao.remove(path)?,
    }
    Ok(())
}
