//! Content type lookup for items.

use crate::{FileError, FileItem};

pub const FOLDER_CONTENT_TYPE: &str = "inode/directory";

/// Maps an item to a media type.
pub trait ContentTypeMapper: Send + Sync {
    /// Fails when the item can't be looked up, for example once its
    /// storage is closed.
    fn content_type(&self, item: &FileItem) -> Result<String, FileError>;
}

/// Guesses from the file extension; folders map to `inode/directory` and
/// unknown extensions to `application/octet-stream`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuessContentType;

impl ContentTypeMapper for GuessContentType {
    fn content_type(&self, item: &FileItem) -> Result<String, FileError> {
        if item.is_folder()? {
            return Ok(FOLDER_CONTENT_TYPE.to_string());
        }
        Ok(mime_guess::from_path(item.name())
            .first_or_octet_stream()
            .essence_str()
            .to_string())
    }
}

/// Reports the same media type for every file. Folders still map to
/// `inode/directory`.
#[derive(Debug, Clone)]
pub struct FixedContentType(pub String);

impl FixedContentType {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self(content_type.into())
    }
}

impl ContentTypeMapper for FixedContentType {
    fn content_type(&self, item: &FileItem) -> Result<String, FileError> {
        if item.is_folder()? {
            return Ok(FOLDER_CONTENT_TYPE.to_string());
        }
        Ok(self.0.clone())
    }
}
