//! Backing store adapters.
//!
//! A [`Backend`] performs raw storage operations on normalized
//! [`StoragePath`]s. It enforces no policy: hidden items, size limits,
//! read-only storages and the open/closed lifecycle are all handled by
//! [`Storage`](crate::Storage) and the items it hands out.

mod local;
mod memory;

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::SystemTime;

pub use local::LocalBackend;
pub use memory::MemoryBackend;

use crate::StoragePath;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Folder,
}

/// What a backend knows about one entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryMeta {
    pub kind: EntryKind,
    /// Content length in bytes; zero for folders.
    pub size: u64,
    pub modified: Option<SystemTime>,
    /// The medium refuses writes to this entry.
    pub readonly: bool,
}

impl EntryMeta {
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

pub type ContentReader = Box<dyn Read + Send>;
pub type ContentWriter = Box<dyn Write + Send>;

/// Raw storage operations.
pub trait Backend: Send + Sync {
    /// Entry information, or `None` when nothing exists at `path`.
    fn metadata(&self, path: &StoragePath) -> io::Result<Option<EntryMeta>>;

    /// Stream the contents of a file.
    fn open_read(&self, path: &StoragePath) -> io::Result<ContentReader>;

    /// Create or truncate a file. The parent folder must exist.
    ///
    /// Contents are durable once the writer is flushed.
    fn open_write(&self, path: &StoragePath) -> io::Result<ContentWriter>;

    /// Names of the direct children of a folder, sorted.
    fn list(&self, path: &StoragePath) -> io::Result<Vec<String>>;

    /// Every descendant of a folder in depth-first order, parents before
    /// their children.
    fn walk(&self, path: &StoragePath) -> io::Result<Vec<StoragePath>> {
        let mut found = Vec::new();
        for name in self.list(path)? {
            let child = path.child(&name);
            let is_folder = self
                .metadata(&child)?
                .is_some_and(|meta| meta.is_folder());
            found.push(child.clone());
            if is_folder {
                found.extend(self.walk(&child)?);
            }
        }
        Ok(found)
    }

    /// Create a folder and any missing ancestors.
    fn create_dir_all(&self, path: &StoragePath) -> io::Result<()>;

    fn remove_file(&self, path: &StoragePath) -> io::Result<()>;

    /// Remove a folder and everything below it.
    fn remove_dir_all(&self, path: &StoragePath) -> io::Result<()>;

    /// Move a file or folder. The destination parent must exist.
    fn rename(&self, from: &StoragePath, to: &StoragePath) -> io::Result<()>;

    /// The native location of `path`, for backends that have one.
    fn native_path(&self, path: &StoragePath) -> Option<PathBuf>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn metadata(&self, path: &StoragePath) -> io::Result<Option<EntryMeta>> {
        (**self).metadata(path)
    }

    fn open_read(&self, path: &StoragePath) -> io::Result<ContentReader> {
        (**self).open_read(path)
    }

    fn open_write(&self, path: &StoragePath) -> io::Result<ContentWriter> {
        (**self).open_write(path)
    }

    fn list(&self, path: &StoragePath) -> io::Result<Vec<String>> {
        (**self).list(path)
    }

    fn walk(&self, path: &StoragePath) -> io::Result<Vec<StoragePath>> {
        (**self).walk(path)
    }

    fn create_dir_all(&self, path: &StoragePath) -> io::Result<()> {
        (**self).create_dir_all(path)
    }

    fn remove_file(&self, path: &StoragePath) -> io::Result<()> {
        (**self).remove_file(path)
    }

    fn remove_dir_all(&self, path: &StoragePath) -> io::Result<()> {
        (**self).remove_dir_all(path)
    }

    fn rename(&self, from: &StoragePath, to: &StoragePath) -> io::Result<()> {
        (**self).rename(from, to)
    }

    fn native_path(&self, path: &StoragePath) -> Option<PathBuf> {
        (**self).native_path(path)
    }
}
