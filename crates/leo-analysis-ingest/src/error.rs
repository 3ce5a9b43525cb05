//! Fatal ingestion errors. Malformed lines never surface here; they are
//! skipped and counted by the readers.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Debug, Error)]
pub enum IngestError {
    /// The input file is missing or unreadable.
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading failed part way through the file.
    #[error("read failed in {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Read failure on a stream with no associated path.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl IngestError {
    /// Attach `path` to a bare stream error.
    pub(crate) fn with_path(self, path: impl Into<PathBuf>) -> Self {
        match self {
            IngestError::Io(source) => IngestError::Read {
                path: path.into(),
                source,
            },
            other => other,
        }
    }
}
