//! Diff the indexed notes against the files found on disk.

use std::cmp::Ordering;

use super::db::IndexError;
use super::types::{IndexedMetadata, PathMetadata};

/// What needs to happen to the index for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// On disk, not indexed yet.
    Added(String),
    /// Indexed, but the file changed since.
    Modified(String),
    /// Indexed, but the file is gone.
    Deleted(String),
}

impl FileChange {
    pub fn path(&self) -> &str {
        match self {
            Self::Added(path) | Self::Modified(path) | Self::Deleted(path) => path,
        }
    }
}

/// Counts from a [`reconcile`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffStats {
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    pub unchanged: usize,
}

/// Classify every path of `indexed` and `disk`, reporting changes to
/// `on_change` in ascending path order.
///
/// `indexed` must be ascending by path, as produced by
/// [`NoteDao::indexed`](super::NoteDao::indexed). `disk` may come in any
/// order. A file is modified when its modification time is strictly newer
/// than the indexed one, or on every path present on both sides when `force`
/// is set. Equal times are left alone.
///
/// Only errors from the `indexed` enumeration are returned; applying the
/// changes is up to the caller.
pub fn reconcile<I, D, F>(
    indexed: I,
    disk: D,
    force: bool,
    mut on_change: F,
) -> Result<DiffStats, IndexError>
where
    I: IntoIterator<Item = Result<IndexedMetadata, IndexError>>,
    D: IntoIterator<Item = PathMetadata>,
    F: FnMut(FileChange),
{
    let mut disk: Vec<PathMetadata> = disk.into_iter().collect();
    disk.sort_by(|a, b| a.path.cmp(&b.path));
    disk.dedup_by(|a, b| a.path == b.path);

    let mut disk = disk.into_iter();
    let mut indexed = indexed.into_iter();
    let mut stats = DiffStats::default();

    let mut on_disk = disk.next();
    let mut in_index = indexed.next().transpose()?;

    loop {
        let order = match (&on_disk, &in_index) {
            (None, None) => break,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(file), Some(entry)) => file.path.cmp(&entry.path),
        };

        match order {
            Ordering::Less => {
                if let Some(file) = on_disk.take() {
                    stats.added += 1;
                    on_change(FileChange::Added(file.path));
                }
                on_disk = disk.next();
            }
            Ordering::Greater => {
                if let Some(entry) = in_index.take() {
                    stats.deleted += 1;
                    on_change(FileChange::Deleted(entry.path));
                }
                in_index = indexed.next().transpose()?;
            }
            Ordering::Equal => {
                if let (Some(file), Some(entry)) = (on_disk.take(), in_index.take()) {
                    if force || file.modified > entry.modified {
                        stats.modified += 1;
                        on_change(FileChange::Modified(file.path));
                    } else {
                        stats.unchanged += 1;
                    }
                }
                on_disk = disk.next();
                in_index = indexed.next().transpose()?;
            }
        }
    }

    tracing::debug!(
        added = stats.added,
        modified = stats.modified,
        deleted = stats.deleted,
        unchanged = stats.unchanged,
        "reconciled index against disk"
    );
    Ok(stats)
}
