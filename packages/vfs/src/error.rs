//! Error types for storages and their items.

use std::io;
use std::path::PathBuf;

use webcore_json::JsonError;

use crate::StoragePath;

/// Failures raised by file and folder items.
#[derive(thiserror::Error, Debug)]
pub enum FileError {
    #[error("storage '{storage}' is closed")]
    Closed { storage: String },

    #[error("'{path}' does not exist")]
    NotFound { path: StoragePath },

    #[error("'{path}' is hidden")]
    Hidden { path: StoragePath },

    /// Content operations on a folder.
    #[error("can't stream folder '{path}'")]
    NotAFile { path: StoragePath },

    #[error("'{path}' is not a folder")]
    NotAFolder { path: StoragePath },

    /// A file write would replace an existing folder.
    #[error("'{path}' is an existing folder")]
    FolderExists { path: StoragePath },

    #[error("'{path}' exceeds the size limit of {limit} bytes")]
    SizeLimitExceeded { path: StoragePath, limit: u64 },

    /// A name resolved above the storage root.
    #[error("'{path}' escapes the storage root")]
    Escape { path: String },

    /// A folder copy whose destination lies inside the folder itself.
    #[error("can't copy '{path}' into itself")]
    CopyIntoSelf { path: StoragePath },

    #[error("storage '{storage}' is read-only")]
    ReadOnly { storage: String },

    #[error("invalid storage root {}: {source}", path.display())]
    InvalidRoot { path: PathBuf, source: io::Error },

    #[error("metadata error: {0}")]
    Metadata(#[from] JsonError),

    #[error("I/O error on '{path}': {source}")]
    Io { path: StoragePath, source: io::Error },
}

/// The discriminant of a [`FileError`], for callers that branch on the
/// failure without holding the error itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileErrorKind {
    Closed,
    NotFound,
    Hidden,
    NotAFile,
    NotAFolder,
    FolderExists,
    SizeLimitExceeded,
    Escape,
    CopyIntoSelf,
    ReadOnly,
    InvalidRoot,
    Metadata,
    Io,
}

impl FileErrorKind {
    /// Streaming failures count as I/O, as does a folder opened for content.
    pub fn is_io(&self) -> bool {
        matches!(self, FileErrorKind::Io | FileErrorKind::NotAFile)
    }
}

impl FileError {
    pub fn kind(&self) -> FileErrorKind {
        match self {
            FileError::Closed { .. } => FileErrorKind::Closed,
            FileError::NotFound { .. } => FileErrorKind::NotFound,
            FileError::Hidden { .. } => FileErrorKind::Hidden,
            FileError::NotAFile { .. } => FileErrorKind::NotAFile,
            FileError::NotAFolder { .. } => FileErrorKind::NotAFolder,
            FileError::FolderExists { .. } => FileErrorKind::FolderExists,
            FileError::SizeLimitExceeded { .. } => FileErrorKind::SizeLimitExceeded,
            FileError::Escape { .. } => FileErrorKind::Escape,
            FileError::CopyIntoSelf { .. } => FileErrorKind::CopyIntoSelf,
            FileError::ReadOnly { .. } => FileErrorKind::ReadOnly,
            FileError::InvalidRoot { .. } => FileErrorKind::InvalidRoot,
            FileError::Metadata(_) => FileErrorKind::Metadata,
            FileError::Io { .. } => FileErrorKind::Io,
        }
    }

    pub(crate) fn io(path: &StoragePath) -> impl FnOnce(io::Error) -> FileError + '_ {
        move |source| FileError::Io {
            path: path.clone(),
            source,
        }
    }
}

/// The single failure type at the wrapper boundary.
///
/// Produced by [`Guarded`](crate::Guarded) and
/// [`IntoStorageResult`](crate::IntoStorageResult); the originating
/// [`FileError`] stays reachable through `source()` and [`kind`](Self::kind).
#[derive(thiserror::Error, Debug)]
#[error("storage operation failed: {source}")]
pub struct StorageError {
    #[from]
    source: FileError,
}

impl StorageError {
    pub fn kind(&self) -> FileErrorKind {
        self.source.kind()
    }

    pub fn file_error(&self) -> &FileError {
        &self.source
    }

    pub fn into_file_error(self) -> FileError {
        self.source
    }
}

/// Failures building or querying a [`StorageRegistry`](crate::StorageRegistry).
#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("a storage named '{name}' is already registered")]
    Duplicate { name: String },

    #[error("no storage named '{name}'")]
    Unknown { name: String },

    #[error("storage '{name}' could not be created: {source}")]
    Backend {
        name: String,
        #[source]
        source: FileError,
    },

    #[error("invalid registry configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("could not read registry configuration {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn not_a_file_reads_as_io() {
        let err = FileError::NotAFile {
            path: StoragePath::parse("/docs").unwrap(),
        };
        assert_eq!(err.to_string(), "can't stream folder '/docs'");
        assert!(err.kind().is_io());
        assert!(!FileErrorKind::NotFound.is_io());
    }

    #[test]
    fn storage_error_keeps_source() {
        let err = StorageError::from(FileError::ReadOnly {
            storage: "archive".to_string(),
        });
        assert_eq!(err.kind(), FileErrorKind::ReadOnly);
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("storage 'archive' is read-only".to_string())
        );
        assert_eq!(
            err.to_string(),
            "storage operation failed: storage 'archive' is read-only"
        );
    }

    #[test]
    fn size_limit_display() {
        let err = FileError::SizeLimitExceeded {
            path: StoragePath::parse("big.bin").unwrap(),
            limit: 10,
        };
        assert_eq!(err.to_string(), "'/big.bin' exceeds the size limit of 10 bytes");
    }
}
