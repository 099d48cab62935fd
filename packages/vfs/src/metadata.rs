//! Metadata factories.
//!
//! Metadata is produced lazily, the first time an item's
//! [`metadata`](crate::FileItem::metadata) is requested, and cached when the
//! storage has an [`ItemCache`](crate::ItemCache).

use std::io::Read;

use chrono::SecondsFormat;
use webcore_json::{JsonObject, JsonValue};

use crate::{FileError, FileItem};

/// Produces the metadata document of an item.
pub trait MetadataFactory: Send + Sync {
    fn metadata(&self, item: &FileItem) -> Result<JsonObject, FileError>;
}

/// `name`, `path`, `folder`, `size`, `lastModified` (RFC 3339) and
/// `contentType`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicMetadata;

impl MetadataFactory for BasicMetadata {
    fn metadata(&self, item: &FileItem) -> Result<JsonObject, FileError> {
        let folder = item.is_folder()?;
        let mut meta = JsonObject::new()
            .with("name", item.name())
            .with("path", item.path().to_string())
            .with("folder", folder);
        if !folder {
            meta.put("size", item.size()?);
        }
        meta.put(
            "lastModified",
            item.last_modified()?
                .to_rfc3339_opts(SecondsFormat::Millis, true),
        );
        meta.put("contentType", item.content_type()?);
        Ok(meta)
    }
}

/// Basic metadata merged with a JSON sidecar file.
///
/// For `report.pdf` the sidecar is `report.pdf.meta.json` (with the default
/// suffix) in the same folder. Sidecar keys win over the basic ones. A
/// missing sidecar is not an error; a malformed one is.
#[derive(Debug, Clone)]
pub struct SidecarMetadata {
    suffix: String,
}

impl SidecarMetadata {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl Default for SidecarMetadata {
    fn default() -> Self {
        Self::new(".meta.json")
    }
}

impl MetadataFactory for SidecarMetadata {
    fn metadata(&self, item: &FileItem) -> Result<JsonObject, FileError> {
        let mut meta = BasicMetadata.metadata(item)?;
        if item.path().is_root() {
            return Ok(meta);
        }

        let sidecar = item.sibling(&format!("{}{}", item.name(), self.suffix))?;
        if !sidecar.is_file()? {
            return Ok(meta);
        }

        let mut bytes = Vec::new();
        sidecar
            .open()?
            .read_to_end(&mut bytes)
            .map_err(FileError::io(sidecar.path()))?;
        match JsonValue::from_slice(&bytes)? {
            JsonValue::Object(extra) => meta.merge(extra),
            other => {
                meta.put("sidecar", other);
            }
        }
        Ok(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileErrorKind, MemoryBackend, Storage};

    #[test]
    fn basic_fields() {
        let storage = Storage::new("t", MemoryBackend::new());
        let root = storage.root().unwrap();
        let file = root.create("docs/a.txt", "hello").unwrap();

        let meta = BasicMetadata.metadata(&file).unwrap();
        assert_eq!(meta.get_str("name"), Some("a.txt"));
        assert_eq!(meta.get_str("path"), Some("/docs/a.txt"));
        assert_eq!(meta.get_bool("folder"), Some(false));
        assert_eq!(meta.get_i64("size"), Some(5));
        assert_eq!(meta.get_str("contentType"), Some("text/plain"));
        let stamp = meta.get_str("lastModified").unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());

        let folder = BasicMetadata.metadata(&root.file("docs").unwrap()).unwrap();
        assert_eq!(folder.get_bool("folder"), Some(true));
        assert!(!folder.contains_key("size"));
    }

    #[test]
    fn missing_item_fails_fast() {
        let storage = Storage::new("t", MemoryBackend::new());
        let ghost = storage.file("ghost").unwrap();
        let err = BasicMetadata.metadata(&ghost).unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::NotFound);
    }

    #[test]
    fn sidecar_merges() {
        let storage = Storage::builder("t", MemoryBackend::new())
            .metadata_factory(SidecarMetadata::default())
            .build();
        let root = storage.root().unwrap();
        let file = root.create("report.pdf", "%PDF").unwrap();
        root.create("report.pdf.meta.json", r#"{"author":"Ada","name":"Q3 report"}"#)
            .unwrap();

        let meta = file.metadata().unwrap();
        assert_eq!(meta.get_str("author"), Some("Ada"));
        assert_eq!(meta.get_str("name"), Some("Q3 report"));
        assert_eq!(meta.get_str("contentType"), Some("application/pdf"));
    }

    #[test]
    fn malformed_sidecar_is_a_metadata_error() {
        let storage = Storage::builder("t", MemoryBackend::new())
            .metadata_factory(SidecarMetadata::default())
            .build();
        let root = storage.root().unwrap();
        let file = root.create("x.txt", "x").unwrap();
        root.create("x.txt.meta.json", "{broken").unwrap();

        assert_eq!(file.metadata().unwrap_err().kind(), FileErrorKind::Metadata);
    }
}
