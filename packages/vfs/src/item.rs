//! File items and the canonical write routine.

use std::fmt;
use std::fs;
use std::io::{self, Cursor, Read, Write};
use std::path::PathBuf;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use webcore_json::JsonObject;

use crate::backend::{ContentReader, EntryMeta};
use crate::{FileError, FolderItem, Storage, StoragePath};

const CHUNK_SIZE: usize = 8 * 1024;

/// A file or folder inside a [`Storage`].
///
/// Items are cheap handles: they hold the storage and a path, nothing else.
/// Every accessor asks the backend afresh, and every mutation returns a new
/// item describing the state after the change.
#[derive(Clone, PartialEq, Eq)]
pub struct FileItem {
    storage: Storage,
    path: StoragePath,
}

impl FileItem {
    pub(crate) fn new(storage: Storage, path: StoragePath) -> FileItem {
        FileItem { storage, path }
    }

    /// The final path segment; empty for the root.
    pub fn name(&self) -> &str {
        self.path.name()
    }

    pub fn path(&self) -> &StoragePath {
        &self.path
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn validate(&self) -> Result<(), FileError> {
        self.storage.validate()
    }

    /// The native location, for backends that have one.
    pub fn absolute_path(&self) -> Result<Option<PathBuf>, FileError> {
        self.validate()?;
        Ok(self.storage.backend().native_path(&self.path))
    }

    /// Backend entry, or `None` when missing or hidden by policy.
    fn visible_entry(&self) -> Result<Option<EntryMeta>, FileError> {
        self.validate()?;
        if self.storage.hides(&self.path) {
            return Ok(None);
        }
        self.storage.entry(&self.path)
    }

    /// Backend entry of an item that must exist and be visible.
    fn require_entry(&self) -> Result<EntryMeta, FileError> {
        self.validate()?;
        if self.storage.hides(&self.path) {
            return Err(FileError::Hidden {
                path: self.path.clone(),
            });
        }
        self.storage
            .entry(&self.path)?
            .ok_or_else(|| FileError::NotFound {
                path: self.path.clone(),
            })
    }

    pub fn exists(&self) -> Result<bool, FileError> {
        Ok(self.visible_entry()?.is_some())
    }

    pub fn is_file(&self) -> Result<bool, FileError> {
        Ok(self.visible_entry()?.is_some_and(|e| e.is_file()))
    }

    pub fn is_folder(&self) -> Result<bool, FileError> {
        Ok(self.visible_entry()?.is_some_and(|e| e.is_folder()))
    }

    /// True when the item or any of its ancestors is dot-prefixed,
    /// whether or not the storage exposes hidden items.
    pub fn is_hidden(&self) -> Result<bool, FileError> {
        self.validate()?;
        Ok(self.path.is_hidden())
    }

    pub fn is_readable(&self) -> Result<bool, FileError> {
        self.exists()
    }

    /// Whether a write to this item would be accepted. Missing items are
    /// writable unless the storage is read-only or hides them.
    pub fn is_writable(&self) -> Result<bool, FileError> {
        self.validate()?;
        if self.storage.options().read_only || self.storage.hides(&self.path) {
            return Ok(false);
        }
        Ok(self
            .storage
            .entry(&self.path)?
            .map_or(true, |e| !e.readonly))
    }

    /// Content length in bytes; zero for folders.
    pub fn size(&self) -> Result<u64, FileError> {
        let entry = self.require_entry()?;
        Ok(if entry.is_folder() { 0 } else { entry.size })
    }

    /// Modification time. Backends that keep none report an I/O error.
    pub fn last_modified(&self) -> Result<DateTime<Utc>, FileError> {
        let entry = self.require_entry()?;
        let modified = entry.modified.ok_or_else(|| FileError::Io {
            path: self.path.clone(),
            source: io::Error::new(
                io::ErrorKind::Unsupported,
                "the backend keeps no modification time",
            ),
        })?;
        Ok(modified.into())
    }

    pub fn content_type(&self) -> Result<String, FileError> {
        self.validate()?;
        self.storage.content_types().content_type(self)
    }

    /// Metadata from the storage's factory, served from its cache when one
    /// is configured.
    pub fn metadata(&self) -> Result<JsonObject, FileError> {
        self.validate()?;
        if let Some(cached) = self.storage.cache().and_then(|c| c.get(&self.path)) {
            return Ok(cached);
        }
        let metadata = self.storage.metadata_factory().metadata(self)?;
        if let Some(cache) = self.storage.cache() {
            cache.put(self.path.clone(), metadata.clone());
        }
        Ok(metadata)
    }

    pub fn size_limit(&self) -> Result<Option<u64>, FileError> {
        self.validate()?;
        Ok(self.storage.options().size_limit)
    }

    /// The containing folder; `None` for the root.
    pub fn parent(&self) -> Result<Option<FolderItem>, FileError> {
        self.validate()?;
        Ok(self
            .path
            .parent()
            .map(|parent| FolderItem::new(FileItem::new(self.storage.clone(), parent))))
    }

    /// The item at `name`, resolved against this item's folder.
    pub(crate) fn sibling(&self, name: &str) -> Result<FileItem, FileError> {
        let base = self.path.parent().unwrap_or_default();
        Ok(FileItem::new(self.storage.clone(), base.resolve(name)?))
    }

    /// Stream the contents.
    pub fn open(&self) -> Result<ContentReader, FileError> {
        let entry = self.require_entry()?;
        if entry.is_folder() {
            return Err(FileError::NotAFile {
                path: self.path.clone(),
            });
        }
        log::debug!("Reading {} from '{}'", self.path, self.storage.name());
        self.storage
            .backend()
            .open_read(&self.path)
            .map_err(FileError::io(&self.path))
    }

    pub fn read_bytes(&self) -> Result<Bytes, FileError> {
        let mut buffer = Vec::new();
        self.open()?
            .read_to_end(&mut buffer)
            .map_err(FileError::io(&self.path))?;
        Ok(Bytes::from(buffer))
    }

    pub fn read_string(&self) -> Result<String, FileError> {
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(|err| FileError::Io {
            path: self.path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, err),
        })
    }

    /// Replace the contents, creating the file and its parents if needed.
    pub fn write(&self, source: impl Into<ContentSource>) -> Result<FileItem, FileError> {
        write_stream(&self.storage, &self.path, source.into())
    }

    /// Remove the item; folders are removed with everything below them.
    pub fn delete(&self) -> Result<(), FileError> {
        self.storage.check_writable()?;
        let entry = self.require_entry()?;
        let backend = self.storage.backend();
        let removed = if self.path.is_root() {
            // The root itself stays; only its contents go.
            backend.list(&self.path).and_then(|names| {
                names.iter().try_for_each(|name| {
                    let child = self.path.child(name);
                    match backend.metadata(&child)? {
                        Some(meta) if meta.is_folder() => backend.remove_dir_all(&child),
                        Some(_) => backend.remove_file(&child),
                        None => Ok(()),
                    }
                })
            })
        } else if entry.is_folder() {
            backend.remove_dir_all(&self.path)
        } else {
            backend.remove_file(&self.path)
        };
        removed.map_err(FileError::io(&self.path))?;
        self.storage.invalidate(&self.path);
        log::debug!("Deleted {} from '{}'", self.path, self.storage.name());
        Ok(())
    }

    /// Move the item to `name`, resolved against its folder. An existing
    /// file at the destination is replaced; an existing folder is not.
    pub fn rename(&self, name: &str) -> Result<FileItem, FileError> {
        self.storage.check_writable()?;
        self.require_entry()?;
        let target = self.sibling(name)?;
        if target.path == self.path {
            return Ok(target);
        }
        if self.storage.hides(&target.path) {
            return Err(FileError::Hidden { path: target.path });
        }
        if let Some(existing) = self.storage.entry(&target.path)? {
            if existing.is_folder() {
                return Err(FileError::FolderExists { path: target.path });
            }
        }
        prepare_parent(&self.storage, &target.path)?;
        self.storage
            .backend()
            .rename(&self.path, &target.path)
            .map_err(FileError::io(&self.path))?;
        self.storage.invalidate(&self.path);
        self.storage.invalidate(&target.path);
        log::debug!("Renamed {} to {}", self.path, target.path);
        Ok(target)
    }

    /// Copy into `folder`, which may belong to another storage, keeping the
    /// name. Folders are copied with everything below them and may not be
    /// copied into themselves.
    pub fn copy_to(&self, folder: &FolderItem) -> Result<FileItem, FileError> {
        let entry = self.require_entry()?;
        if entry.is_file() {
            return folder.create(self.name(), ContentSource::Item(self.clone()));
        }
        if folder.storage() == &self.storage && folder.path().starts_with(&self.path) {
            return Err(FileError::CopyIntoSelf {
                path: self.path.clone(),
            });
        }

        // Listed before the copy exists, so the copy is never part of it.
        let children = FolderItem::new(self.clone()).list_all()?;
        let copy = folder.create_folder(self.name())?;
        for child in children {
            child.copy_to(&copy)?;
        }
        Ok(copy.into_item())
    }

    /// View an existing folder as a [`FolderItem`].
    pub fn as_folder(&self) -> Result<FolderItem, FileError> {
        if !self.require_entry()?.is_folder() {
            return Err(FileError::NotAFolder {
                path: self.path.clone(),
            });
        }
        Ok(FolderItem::new(self.clone()))
    }
}

impl fmt::Debug for FileItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileItem")
            .field("storage", &self.storage.name())
            .field("path", &self.path)
            .finish()
    }
}

impl fmt::Display for FileItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.storage.name(), self.path)
    }
}

/// Where new file contents come from.
pub enum ContentSource {
    Bytes(Bytes),
    Reader(ContentReader),
    /// A file outside any storage.
    NativeFile(PathBuf),
    /// A file of any storage.
    Item(FileItem),
}

impl ContentSource {
    pub fn native(path: impl Into<PathBuf>) -> Self {
        ContentSource::NativeFile(path.into())
    }

    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        ContentSource::Reader(Box::new(reader))
    }

    /// The length, when it is known before streaming.
    fn known_len(&self) -> Option<u64> {
        match self {
            ContentSource::Bytes(bytes) => Some(bytes.len() as u64),
            ContentSource::NativeFile(path) => fs::metadata(path).ok().map(|m| m.len()),
            ContentSource::Item(item) => item.size().ok(),
            ContentSource::Reader(_) => None,
        }
    }

    fn into_reader(self, target: &StoragePath) -> Result<ContentReader, FileError> {
        match self {
            ContentSource::Bytes(bytes) => Ok(Box::new(Cursor::new(bytes))),
            ContentSource::Reader(reader) => Ok(reader),
            ContentSource::NativeFile(path) => {
                let file = fs::File::open(&path).map_err(FileError::io(target))?;
                Ok(Box::new(file))
            }
            ContentSource::Item(item) => item.open(),
        }
    }
}

impl fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentSource::Bytes(bytes) => f.debug_tuple("Bytes").field(&bytes.len()).finish(),
            ContentSource::Reader(_) => f.write_str("Reader"),
            ContentSource::NativeFile(path) => f.debug_tuple("NativeFile").field(path).finish(),
            ContentSource::Item(item) => f.debug_tuple("Item").field(item).finish(),
        }
    }
}

impl From<Bytes> for ContentSource {
    fn from(bytes: Bytes) -> Self {
        ContentSource::Bytes(bytes)
    }
}

impl From<Vec<u8>> for ContentSource {
    fn from(bytes: Vec<u8>) -> Self {
        ContentSource::Bytes(Bytes::from(bytes))
    }
}

impl From<&'static [u8]> for ContentSource {
    fn from(bytes: &'static [u8]) -> Self {
        ContentSource::Bytes(Bytes::from_static(bytes))
    }
}

impl From<String> for ContentSource {
    fn from(text: String) -> Self {
        ContentSource::Bytes(Bytes::from(text))
    }
}

impl From<&str> for ContentSource {
    fn from(text: &str) -> Self {
        ContentSource::Bytes(Bytes::copy_from_slice(text.as_bytes()))
    }
}

impl From<FileItem> for ContentSource {
    fn from(item: FileItem) -> Self {
        ContentSource::Item(item)
    }
}

/// Make sure every ancestor of `path` is a folder, creating missing ones.
pub(crate) fn prepare_parent(storage: &Storage, path: &StoragePath) -> Result<(), FileError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    for ancestor in path.ancestors() {
        match storage.entry(&ancestor)? {
            Some(entry) if entry.is_folder() => break,
            Some(_) => return Err(FileError::NotAFolder { path: ancestor }),
            None => {}
        }
    }
    storage
        .backend()
        .create_dir_all(&parent)
        .map_err(FileError::io(&parent))
}

/// The hidden sibling a write streams into before it replaces `path`.
fn partial_path(path: &StoragePath) -> StoragePath {
    path.parent()
        .unwrap_or_default()
        .child(&format!(".{}.partial", path.name()))
}

/// Write `source` to `path`: every content-producing operation ends here.
///
/// An existing file is replaced, an existing folder is refused, and missing
/// parents are created. Contents stream into a hidden sibling that is moved
/// over `path` only once complete, so a failed write (at the storage size
/// limit, or on a read error) leaves any previous file untouched.
pub(crate) fn write_stream(
    storage: &Storage,
    path: &StoragePath,
    source: ContentSource,
) -> Result<FileItem, FileError> {
    storage.validate()?;
    storage.check_writable()?;
    if storage.hides(path) {
        return Err(FileError::Hidden { path: path.clone() });
    }
    if let ContentSource::Item(item) = &source {
        if item.storage() == storage && item.path() == path {
            return Ok(item.clone());
        }
    }
    if path.is_root() || storage.entry(path)?.is_some_and(|e| e.is_folder()) {
        return Err(FileError::FolderExists { path: path.clone() });
    }

    let limit = storage.options().size_limit;
    if let (Some(limit), Some(len)) = (limit, source.known_len()) {
        if len > limit {
            return Err(FileError::SizeLimitExceeded {
                path: path.clone(),
                limit,
            });
        }
    }

    prepare_parent(storage, path)?;
    let mut reader = source.into_reader(path)?;
    let backend = storage.backend();
    let partial = partial_path(path);
    let mut writer = backend.open_write(&partial).map_err(FileError::io(path))?;

    let copied = copy_limited(&mut reader, &mut writer, path, limit)
        .and_then(|n| writer.flush().map(|_| n).map_err(FileError::io(path)));
    drop(writer);
    let written = copied.and_then(|n| {
        backend
            .rename(&partial, path)
            .map(|_| n)
            .map_err(FileError::io(path))
    });
    storage.invalidate(path);

    match written {
        Ok(written) => {
            log::debug!("Wrote {} bytes to {} in '{}'", written, path, storage.name());
            Ok(FileItem::new(storage.clone(), path.clone()))
        }
        Err(err) => {
            match backend.remove_file(&partial) {
                Err(cleanup) if cleanup.kind() != io::ErrorKind::NotFound => {
                    log::warn!("Failed to remove partial file {}: {}", partial, cleanup);
                }
                _ => {}
            }
            Err(err)
        }
    }
}

fn copy_limited(
    reader: &mut dyn Read,
    writer: &mut dyn Write,
    path: &StoragePath,
    limit: Option<u64>,
) -> Result<u64, FileError> {
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => return Ok(total),
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(FileError::io(path)(err)),
        };
        total += n as u64;
        if let Some(limit) = limit {
            if total > limit {
                return Err(FileError::SizeLimitExceeded {
                    path: path.clone(),
                    limit,
                });
            }
        }
        writer
            .write_all(&buffer[..n])
            .map_err(FileError::io(path))?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Backend, FileErrorKind, MemoryBackend};

    fn storage() -> Storage {
        Storage::new("test", MemoryBackend::new())
    }

    #[test]
    fn accessors_on_missing_item() {
        let storage = storage();
        let ghost = storage.file("nope.txt").unwrap();
        assert_eq!(ghost.name(), "nope.txt");
        assert!(!ghost.exists().unwrap());
        assert!(!ghost.is_file().unwrap());
        assert!(ghost.is_writable().unwrap());
        assert_eq!(ghost.size().unwrap_err().kind(), FileErrorKind::NotFound);
        assert_eq!(ghost.last_modified().unwrap_err().kind(), FileErrorKind::NotFound);
        assert_eq!(ghost.delete().unwrap_err().kind(), FileErrorKind::NotFound);
    }

    #[test]
    fn write_replaces_contents() {
        let storage = storage();
        let file = storage.file("notes/today.txt").unwrap();
        file.write("first draft").unwrap();
        let file = file.write("final").unwrap();
        assert_eq!(file.read_string().unwrap(), "final");
        assert_eq!(file.size().unwrap(), 5);
        assert!(storage.file("notes").unwrap().is_folder().unwrap());
    }

    #[test]
    fn streaming_a_folder_fails() {
        let storage = storage();
        let folder = storage.root().unwrap().create_folder("docs").unwrap();
        let err = folder.open().err().unwrap();
        assert_eq!(err.kind(), FileErrorKind::NotAFile);
        assert!(err.kind().is_io());
        assert_eq!(err.to_string(), "can't stream folder '/docs'");
        assert_eq!(folder.size().unwrap(), 0);
    }

    #[test]
    fn reader_over_the_limit_is_removed() {
        let storage = Storage::builder("small", MemoryBackend::new())
            .size_limit(10)
            .build();
        let file = storage.file("big.bin").unwrap();
        let source = ContentSource::reader(Cursor::new(vec![7u8; 64]));

        let err = file.write(source).unwrap_err();
        assert!(matches!(
            err,
            FileError::SizeLimitExceeded { limit: 10, .. }
        ));
        assert!(!file.exists().unwrap());
    }

    #[test]
    fn known_length_over_the_limit_keeps_old_contents() {
        let storage = Storage::builder("small", MemoryBackend::new())
            .size_limit(4)
            .build();
        let file = storage.file("a.txt").unwrap().write("ok").unwrap();
        let err = file.write("far too long").unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::SizeLimitExceeded);
        assert_eq!(file.read_string().unwrap(), "ok");
    }

    #[test]
    fn failed_stream_keeps_old_contents() {
        let storage = Storage::builder("small", MemoryBackend::new())
            .size_limit(4)
            .build();
        let file = storage.file("a.txt").unwrap().write("ok").unwrap();

        let source = ContentSource::reader(Cursor::new(vec![b'x'; 64]));
        let err = file.write(source).unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::SizeLimitExceeded);
        assert_eq!(file.read_string().unwrap(), "ok");
        assert_eq!(
            storage.backend().list(&StoragePath::root()).unwrap(),
            vec!["a.txt"]
        );
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("connection reset"))
        }
    }

    #[test]
    fn read_error_keeps_old_contents() {
        let storage = storage();
        let file = storage.file("dir/a.txt").unwrap().write("before").unwrap();
        let err = file.write(ContentSource::reader(FailingReader)).unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::Io);
        assert_eq!(file.read_string().unwrap(), "before");
        assert!(!storage
            .backend()
            .list(&StoragePath::parse("dir").unwrap())
            .unwrap()
            .iter()
            .any(|name| name.ends_with(".partial")));
    }

    #[test]
    fn parent_file_blocks_creation() {
        let storage = storage();
        storage.file("plain").unwrap().write("x").unwrap();
        let err = storage.file("plain/child").unwrap().write("y").unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::NotAFolder);
    }

    #[test]
    fn rename_within_folder() {
        let storage = storage();
        let file = storage.file("dir/old.txt").unwrap().write("body").unwrap();
        let moved = file.rename("new.txt").unwrap();
        assert_eq!(moved.path().to_string(), "/dir/new.txt");
        assert!(!file.exists().unwrap());
        assert_eq!(moved.read_string().unwrap(), "body");

        storage.root().unwrap().create_folder("dir/sub").unwrap();
        let err = moved.rename("sub").unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::FolderExists);
    }

    #[test]
    fn copy_between_storages() {
        let from = storage();
        let to = Storage::new("other", MemoryBackend::new());
        from.file("tree/a.txt").unwrap().write("a").unwrap();
        from.file("tree/sub/b.txt").unwrap().write("b").unwrap();

        let copy = from
            .file("tree")
            .unwrap()
            .copy_to(&to.root().unwrap())
            .unwrap();
        assert_eq!(copy.storage(), &to);
        assert_eq!(to.file("tree/sub/b.txt").unwrap().read_string().unwrap(), "b");
        assert_eq!(to.file("tree/a.txt").unwrap().read_string().unwrap(), "a");
    }

    #[test]
    fn copying_a_folder_into_itself_fails() {
        let storage = storage();
        storage.file("tree/a.txt").unwrap().write("a").unwrap();
        let tree = storage.folder("tree").unwrap();
        let inner = tree.create_folder("inner").unwrap();

        for target in [&tree, &inner] {
            let err = tree.copy_to(target).unwrap_err();
            assert_eq!(err.kind(), FileErrorKind::CopyIntoSelf);
        }
        assert!(!storage.file("tree/tree").unwrap().exists().unwrap());
        assert!(!storage.file("tree/inner/tree").unwrap().exists().unwrap());

        let sibling = storage.root().unwrap().create_folder("tree-copy").unwrap();
        tree.copy_to(&sibling).unwrap();
        assert_eq!(
            storage.file("tree-copy/tree/a.txt").unwrap().read_string().unwrap(),
            "a"
        );
    }

    #[test]
    fn copying_into_itself_through_another_handle_terminates() {
        let backend = MemoryBackend::new();
        let first = Storage::new("first", backend.clone());
        let second = Storage::new("second", backend);
        first.file("tree/a.txt").unwrap().write("a").unwrap();

        first
            .file("tree")
            .unwrap()
            .copy_to(&second.folder("tree").unwrap())
            .unwrap();
        assert_eq!(
            first.file("tree/tree/a.txt").unwrap().read_string().unwrap(),
            "a"
        );
        assert!(!first.file("tree/tree/tree").unwrap().exists().unwrap());
    }

    #[test]
    fn writing_an_item_onto_itself_is_a_no_op() {
        let storage = storage();
        let file = storage.file("same.txt").unwrap().write("keep").unwrap();
        let again = file.write(file.clone()).unwrap();
        assert_eq!(again, file);
        assert_eq!(file.read_string().unwrap(), "keep");
    }

    #[test]
    fn metadata_is_cached_until_mutation() {
        let storage = Storage::builder("cached", MemoryBackend::new())
            .cache(crate::MemoryCache::new())
            .build();
        let file = storage.file("a.txt").unwrap().write("one").unwrap();
        assert_eq!(file.metadata().unwrap().get_i64("size"), Some(3));

        file.write("three").unwrap();
        assert_eq!(file.metadata().unwrap().get_i64("size"), Some(5));
    }

    /// Reports every entry without a modification time.
    struct NoClock(MemoryBackend);

    impl Backend for NoClock {
        fn metadata(&self, path: &StoragePath) -> io::Result<Option<EntryMeta>> {
            Ok(self.0.metadata(path)?.map(|meta| EntryMeta {
                modified: None,
                ..meta
            }))
        }

        fn open_read(&self, path: &StoragePath) -> io::Result<ContentReader> {
            self.0.open_read(path)
        }

        fn open_write(&self, path: &StoragePath) -> io::Result<crate::backend::ContentWriter> {
            self.0.open_write(path)
        }

        fn list(&self, path: &StoragePath) -> io::Result<Vec<String>> {
            self.0.list(path)
        }

        fn create_dir_all(&self, path: &StoragePath) -> io::Result<()> {
            self.0.create_dir_all(path)
        }

        fn remove_file(&self, path: &StoragePath) -> io::Result<()> {
            self.0.remove_file(path)
        }

        fn remove_dir_all(&self, path: &StoragePath) -> io::Result<()> {
            self.0.remove_dir_all(path)
        }

        fn rename(&self, from: &StoragePath, to: &StoragePath) -> io::Result<()> {
            self.0.rename(from, to)
        }

        fn native_path(&self, path: &StoragePath) -> Option<PathBuf> {
            self.0.native_path(path)
        }
    }

    #[test]
    fn missing_modification_time_is_an_error() {
        let storage = Storage::new("clockless", NoClock(MemoryBackend::new()));
        let file = storage.file("a.txt").unwrap().write("x").unwrap();
        let err = file.last_modified().unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::Io);

        let dated = Storage::new("dated", MemoryBackend::new());
        let file = dated.file("a.txt").unwrap().write("x").unwrap();
        assert!(file.last_modified().unwrap() <= Utc::now());
    }

    #[test]
    fn as_folder_requires_a_folder() {
        let storage = storage();
        let file = storage.file("f").unwrap().write("x").unwrap();
        assert_eq!(file.as_folder().unwrap_err().kind(), FileErrorKind::NotAFolder);
        assert!(file.parent().unwrap().unwrap().path().is_root());
        assert!(storage.root().unwrap().parent().unwrap().is_none());
    }
}
