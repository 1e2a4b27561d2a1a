//! Recursive notebook directory walker.

use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum NotebookWalkerError {
    #[error("notebook root does not exist: {0}")]
    MissingRoot(String),

    #[error("failed to walk notebook directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),

    #[error("failed to read file metadata {0}: {1}")]
    MetadataError(String, #[source] std::io::Error),
}

/// A markdown file found under the notebook root.
#[derive(Debug, Clone)]
pub struct WalkedFile {
    /// Path relative to the notebook root, components joined with `/`.
    pub relative_path: String,
    /// File modification time.
    pub modified: SystemTime,
}

/// Walker for discovering markdown files in a notebook.
#[derive(Debug)]
pub struct NotebookWalker {
    root: PathBuf,
    /// Folders to skip, relative to the root.
    excluded_folders: Vec<PathBuf>,
}

impl NotebookWalker {
    pub fn new(root: &Path) -> Result<Self, NotebookWalkerError> {
        Self::with_exclusions(root, Vec::new())
    }

    /// Create a walker that skips the given folders.
    ///
    /// Excluded folders are relative to the notebook root
    /// (e.g. "templates/daily") or absolute paths inside it.
    pub fn with_exclusions(
        root: &Path,
        excluded_folders: Vec<PathBuf>,
    ) -> Result<Self, NotebookWalkerError> {
        let root = root
            .canonicalize()
            .map_err(|_| NotebookWalkerError::MissingRoot(root.display().to_string()))?;

        let excluded_folders = excluded_folders
            .into_iter()
            .map(|p| {
                if p.is_absolute() {
                    let p = p.canonicalize().unwrap_or(p);
                    p.strip_prefix(&root).unwrap_or(&p).to_path_buf()
                } else {
                    p
                }
            })
            .collect();

        Ok(Self { root, excluded_folders })
    }

    /// Walk the notebook and return all markdown files, sorted by relative
    /// path. Hidden entries, common tool directories and configured
    /// exclusions are skipped.
    pub fn walk(&self) -> Result<Vec<WalkedFile>, NotebookWalkerError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e))
        {
            let entry = entry.map_err(|e| {
                NotebookWalkerError::WalkError(self.root.display().to_string(), e)
            })?;

            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            let metadata = entry.metadata().map_err(|e| {
                NotebookWalkerError::MetadataError(
                    path.display().to_string(),
                    std::io::Error::from(e),
                )
            })?;

            let modified = metadata.modified().map_err(|e| {
                NotebookWalkerError::MetadataError(path.display().to_string(), e)
            })?;

            files.push(WalkedFile {
                relative_path: relative_key(path.strip_prefix(&self.root).unwrap_or(path)),
                modified,
            });
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }

    fn is_excluded(&self, entry: &walkdir::DirEntry) -> bool {
        // Never filter the root directory (depth 0)
        if entry.depth() == 0 {
            return false;
        }

        let name = entry.file_name().to_string_lossy();

        if name.starts_with('.') {
            return true;
        }

        if matches!(name.as_ref(), "node_modules" | "target" | "__pycache__" | "venv") {
            return true;
        }

        if !self.excluded_folders.is_empty()
            && let Ok(relative) = entry.path().strip_prefix(&self.root)
        {
            return self.excluded_folders.iter().any(|excluded| relative.starts_with(excluded));
        }

        false
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Join the normal components of a relative path with `/`, whatever the
/// platform separator.
fn relative_key(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_markdown_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()).is_some_and(|e| e == "md")
}
