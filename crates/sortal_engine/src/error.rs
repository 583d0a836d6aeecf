//! Errors surfaced while processing a single file.

use std::path::PathBuf;

use thiserror::Error;

/// A failure processing one Java file.
#[derive(Debug, Error)]
pub enum SortError {
    #[error("file: {}; reason: unknown line ending", path.display())]
    UnknownLineEnding { path: PathBuf },

    #[error("file: {}; reason: unable to successfully parse the Java file", path.display())]
    UnableToParse { path: PathBuf },

    #[error("file: {}; reason: the Java file contained parse errors", path.display())]
    PartialParse { path: PathBuf },
}

impl SortError {
    /// The path of the file that caused the failure.
    pub fn path(&self) -> &PathBuf {
        match self {
            SortError::UnknownLineEnding { path }
            | SortError::UnableToParse { path }
            | SortError::PartialParse { path } => path,
        }
    }
}
