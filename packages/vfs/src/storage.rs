//! Storages: named, closable roots over a backend.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::backend::{Backend, EntryMeta};
use crate::cache::ItemCache;
use crate::content_type::{ContentTypeMapper, GuessContentType};
use crate::metadata::{BasicMetadata, MetadataFactory};
use crate::{FileError, FileItem, FolderItem, StoragePath};

/// Policy applied to every item of a storage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageOptions {
    /// Largest file, in bytes, that may be written.
    pub size_limit: Option<u64>,
    /// Reject every mutation.
    pub read_only: bool,
    /// Expose dot-prefixed items.
    pub show_hidden: bool,
}

struct Inner {
    name: String,
    backend: Box<dyn Backend>,
    options: StorageOptions,
    content_types: Box<dyn ContentTypeMapper>,
    metadata: Box<dyn MetadataFactory>,
    cache: Option<Box<dyn ItemCache>>,
    open: AtomicBool,
}

/// A handle to a named storage.
///
/// Clones share the same storage, including its open/closed state.
#[derive(Clone)]
pub struct Storage {
    inner: Arc<Inner>,
}

/// Builds a [`Storage`].
///
/// # Example
///
/// ```rust
/// use webcore_vfs::{MemoryBackend, MemoryCache, Storage};
///
/// let storage = Storage::builder("scratch", MemoryBackend::new())
///     .size_limit(1024)
///     .cache(MemoryCache::new())
///     .build();
///
/// let file = storage.root().unwrap().create("hello.txt", "hi").unwrap();
/// assert_eq!(file.read_string().unwrap(), "hi");
/// ```
pub struct StorageBuilder {
    name: String,
    backend: Box<dyn Backend>,
    options: StorageOptions,
    content_types: Box<dyn ContentTypeMapper>,
    metadata: Box<dyn MetadataFactory>,
    cache: Option<Box<dyn ItemCache>>,
}

impl StorageBuilder {
    pub fn options(mut self, options: StorageOptions) -> Self {
        self.options = options;
        self
    }

    pub fn size_limit(mut self, limit: u64) -> Self {
        self.options.size_limit = Some(limit);
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.options.read_only = read_only;
        self
    }

    pub fn show_hidden(mut self, show: bool) -> Self {
        self.options.show_hidden = show;
        self
    }

    pub fn content_types(mut self, mapper: impl ContentTypeMapper + 'static) -> Self {
        self.content_types = Box::new(mapper);
        self
    }

    pub fn metadata_factory(mut self, factory: impl MetadataFactory + 'static) -> Self {
        self.metadata = Box::new(factory);
        self
    }

    pub fn cache(mut self, cache: impl ItemCache + 'static) -> Self {
        self.cache = Some(Box::new(cache));
        self
    }

    pub fn build(self) -> Storage {
        log::info!("Opened storage '{}'", self.name);
        Storage {
            inner: Arc::new(Inner {
                name: self.name,
                backend: self.backend,
                options: self.options,
                content_types: self.content_types,
                metadata: self.metadata,
                cache: self.cache,
                open: AtomicBool::new(true),
            }),
        }
    }
}

impl Storage {
    pub fn builder(name: impl Into<String>, backend: impl Backend + 'static) -> StorageBuilder {
        StorageBuilder {
            name: name.into(),
            backend: Box::new(backend),
            options: StorageOptions::default(),
            content_types: Box::new(GuessContentType),
            metadata: Box::new(BasicMetadata),
            cache: None,
        }
    }

    /// A storage with default options and collaborators.
    pub fn new(name: impl Into<String>, backend: impl Backend + 'static) -> Storage {
        Self::builder(name, backend).build()
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn options(&self) -> &StorageOptions {
        &self.inner.options
    }

    pub fn is_open(&self) -> bool {
        self.inner.open.load(Ordering::Acquire)
    }

    /// Close the storage. Every item it handed out fails from now on.
    pub fn close(&self) {
        if self.inner.open.swap(false, Ordering::AcqRel) {
            log::info!("Closed storage '{}'", self.name());
            if let Some(cache) = &self.inner.cache {
                cache.clear();
            }
        }
    }

    /// Reopen a closed storage.
    pub fn open(&self) {
        if !self.inner.open.swap(true, Ordering::AcqRel) {
            log::info!("Reopened storage '{}'", self.name());
        }
    }

    /// Fail with [`FileError::Closed`] once the storage is closed.
    pub fn validate(&self) -> Result<(), FileError> {
        if self.is_open() {
            Ok(())
        } else {
            Err(FileError::Closed {
                storage: self.inner.name.clone(),
            })
        }
    }

    /// The root folder.
    pub fn root(&self) -> Result<FolderItem, FileError> {
        self.validate()?;
        Ok(FolderItem::new(FileItem::new(self.clone(), StoragePath::root())))
    }

    /// The item at `name`, resolved from the root. It need not exist.
    pub fn file(&self, name: &str) -> Result<FileItem, FileError> {
        self.root()?.file(name)
    }

    /// The existing folder at `name`, resolved from the root.
    pub fn folder(&self, name: &str) -> Result<FolderItem, FileError> {
        self.root()?.folder(name)
    }

    pub(crate) fn backend(&self) -> &dyn Backend {
        self.inner.backend.as_ref()
    }

    pub(crate) fn content_types(&self) -> &dyn ContentTypeMapper {
        self.inner.content_types.as_ref()
    }

    pub(crate) fn metadata_factory(&self) -> &dyn MetadataFactory {
        self.inner.metadata.as_ref()
    }

    pub(crate) fn cache(&self) -> Option<&dyn ItemCache> {
        self.inner.cache.as_deref()
    }

    /// Entry information straight from the backend.
    pub(crate) fn entry(&self, path: &StoragePath) -> Result<Option<EntryMeta>, FileError> {
        self.backend().metadata(path).map_err(FileError::io(path))
    }

    pub(crate) fn hides(&self, path: &StoragePath) -> bool {
        !self.inner.options.show_hidden && path.is_hidden()
    }

    pub(crate) fn check_writable(&self) -> Result<(), FileError> {
        if self.inner.options.read_only {
            return Err(FileError::ReadOnly {
                storage: self.inner.name.clone(),
            });
        }
        Ok(())
    }

    /// Drop cached metadata affected by a change at `path`.
    pub(crate) fn invalidate(&self, path: &StoragePath) {
        if let Some(cache) = self.cache() {
            cache.invalidate(path);
        }
    }
}

impl PartialEq for Storage {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Storage {}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage")
            .field("name", &self.inner.name)
            .field("options", &self.inner.options)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;

    #[test]
    fn closing_fails_every_item() {
        let storage = Storage::new("scratch", MemoryBackend::new());
        let root = storage.root().unwrap();
        let file = root.create("a.txt", "data").unwrap();

        storage.close();
        assert!(!storage.is_open());
        assert!(matches!(file.exists(), Err(FileError::Closed { .. })));
        assert!(matches!(root.list_all(), Err(FileError::Closed { .. })));
        assert!(matches!(storage.root(), Err(FileError::Closed { .. })));

        storage.open();
        assert!(file.exists().unwrap());
    }

    #[test]
    fn clones_share_lifecycle() {
        let storage = Storage::new("scratch", MemoryBackend::new());
        let other = storage.clone();
        other.close();
        assert!(storage.validate().is_err());
        assert_eq!(storage, other);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: StorageOptions = serde_json::from_str(r#"{"read_only": true}"#).unwrap();
        assert_eq!(
            options,
            StorageOptions {
                size_limit: None,
                read_only: true,
                show_hidden: false,
            }
        );
    }
}
