//! Markdown files on disk as a [`NoteSource`].

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::extractor::extract_note;
use super::checksum::note_checksum;
use super::walker::{NotebookWalker, NotebookWalkerError};
use crate::index::{NoteMetadata, NoteSource, PathMetadata};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Walker(#[from] NotebookWalkerError),

    #[error("failed to read note {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A notebook directory, read through [`NotebookWalker`].
#[derive(Debug)]
pub struct NotebookSource {
    walker: NotebookWalker,
}

impl NotebookSource {
    pub fn new(root: &Path, excluded_folders: Vec<PathBuf>) -> Result<Self, SourceError> {
        Ok(Self { walker: NotebookWalker::with_exclusions(root, excluded_folders)? })
    }

    pub fn root(&self) -> &Path {
        self.walker.root()
    }

    fn absolute(&self, relative: &str) -> PathBuf {
        let mut path = self.walker.root().to_path_buf();
        path.extend(relative.split('/').filter(|part| !part.is_empty()));
        path
    }
}

impl NoteSource for NotebookSource {
    type Error = SourceError;

    fn list(&self) -> Result<Vec<PathMetadata>, SourceError> {
        Ok(self
            .walker
            .walk()?
            .into_iter()
            .map(|file| PathMetadata {
                path: file.relative_path,
                modified: file.modified.into(),
            })
            .collect())
    }

    fn load(&self, path: &str) -> Result<NoteMetadata, SourceError> {
        let absolute = self.absolute(path);
        let read_error = |source| SourceError::Read { path: path.to_string(), source };

        let mut file = File::open(&absolute).map_err(read_error)?;
        let metadata = file.metadata().map_err(read_error)?;
        let mut content = String::new();
        file.read_to_string(&mut content).map_err(read_error)?;

        let modified: DateTime<Utc> = metadata.modified().map_err(read_error)?.into();
        let created: DateTime<Utc> = metadata.created().map_or(modified, DateTime::<Utc>::from);

        let extracted = extract_note(&content, path);

        Ok(NoteMetadata {
            path: path.to_string(),
            title: extracted.title,
            body: extracted.body,
            word_count: extracted.word_count,
            checksum: note_checksum(&content),
            created,
            modified,
        })
    }
}
