//! Notebook file discovery and content extraction.
//!
//! This module walks a notebook directory, extracts the indexed fields from
//! each markdown file and exposes the result as a
//! [`NoteSource`](crate::index::NoteSource).

pub mod checksum;
pub mod extractor;
pub mod source;
pub mod walker;

pub use checksum::note_checksum;
pub use extractor::{ExtractedNote, extract_note};
pub use source::{NotebookSource, SourceError};
pub use walker::{NotebookWalker, NotebookWalkerError, WalkedFile};
