//! Folder items.

use std::ops::Deref;

use crate::item::{prepare_parent, write_stream};
use crate::{ContentSource, FileError, FileItem};

/// Which children [`FolderItem::list`] returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListFilter {
    pub files: bool,
    pub folders: bool,
    /// Descend into subfolders.
    pub recursive: bool,
}

impl ListFilter {
    pub fn all() -> Self {
        Self {
            files: true,
            folders: true,
            recursive: false,
        }
    }

    pub fn files() -> Self {
        Self {
            folders: false,
            ..Self::all()
        }
    }

    pub fn folders() -> Self {
        Self {
            files: false,
            ..Self::all()
        }
    }

    pub fn recursive(self) -> Self {
        Self {
            recursive: true,
            ..self
        }
    }
}

impl Default for ListFilter {
    fn default() -> Self {
        Self::all()
    }
}

/// A [`FileItem`] known to have been a folder when it was looked up.
///
/// Every [`FileItem`] accessor is available through `Deref`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FolderItem(FileItem);

impl FolderItem {
    pub(crate) fn new(item: FileItem) -> FolderItem {
        FolderItem(item)
    }

    pub fn into_item(self) -> FileItem {
        self.0
    }

    /// The item at `name`, resolved against this folder. Absolute names
    /// start from the storage root. The item need not exist.
    pub fn file(&self, name: &str) -> Result<FileItem, FileError> {
        self.validate()?;
        let path = self.path().resolve(name)?;
        log::debug!("Resolved '{}' in {} to {}", name, self.path(), path);
        Ok(FileItem::new(self.storage().clone(), path))
    }

    /// The existing folder at `name`.
    pub fn folder(&self, name: &str) -> Result<FolderItem, FileError> {
        self.file(name)?.as_folder()
    }

    /// Children matching `filter`, sorted by path. Hidden items are left out
    /// unless the storage exposes them.
    pub fn list(&self, filter: ListFilter) -> Result<Vec<FileItem>, FileError> {
        self.as_folder()?;
        let storage = self.storage();
        let backend = storage.backend();
        let mut paths = if filter.recursive {
            backend.walk(self.path())
        } else {
            backend
                .list(self.path())
                .map(|names| names.iter().map(|name| self.path().child(name)).collect::<Vec<_>>())
        }
        .map_err(FileError::io(self.path()))?;
        paths.sort();

        let mut items = Vec::with_capacity(paths.len());
        for path in paths {
            if storage.hides(&path) {
                continue;
            }
            let Some(entry) = storage.entry(&path)? else {
                continue;
            };
            if (entry.is_file() && filter.files) || (entry.is_folder() && filter.folders) {
                items.push(FileItem::new(storage.clone(), path));
            }
        }
        Ok(items)
    }

    /// Direct children, files and folders.
    pub fn list_all(&self) -> Result<Vec<FileItem>, FileError> {
        self.list(ListFilter::all())
    }

    /// Create or replace the file at `name` with the contents of `source`.
    pub fn create(
        &self,
        name: &str,
        source: impl Into<ContentSource>,
    ) -> Result<FileItem, FileError> {
        let target = self.file(name)?;
        write_stream(self.storage(), target.path(), source.into())
    }

    /// Create the folder at `name` and any missing parents. An existing
    /// folder is returned as is.
    pub fn create_folder(&self, name: &str) -> Result<FolderItem, FileError> {
        let target = self.file(name)?;
        let storage = self.storage();
        storage.check_writable()?;
        if storage.hides(target.path()) {
            return Err(FileError::Hidden {
                path: target.path().clone(),
            });
        }
        match storage.entry(target.path())? {
            Some(entry) if entry.is_folder() => return Ok(FolderItem(target)),
            Some(_) => {
                return Err(FileError::NotAFolder {
                    path: target.path().clone(),
                })
            }
            None => {}
        }

        prepare_parent(storage, target.path())?;
        storage
            .backend()
            .create_dir_all(target.path())
            .map_err(FileError::io(target.path()))?;
        storage.invalidate(target.path());
        log::debug!("Created folder {} in '{}'", target.path(), storage.name());
        Ok(FolderItem(target))
    }

    /// Remove this folder and everything below it. Deleting the root
    /// empties it.
    pub fn delete(&self) -> Result<(), FileError> {
        self.0.delete()
    }
}

impl Deref for FolderItem {
    type Target = FileItem;

    fn deref(&self) -> &FileItem {
        &self.0
    }
}

impl AsRef<FileItem> for FolderItem {
    fn as_ref(&self) -> &FileItem {
        &self.0
    }
}

impl From<FolderItem> for FileItem {
    fn from(folder: FolderItem) -> FileItem {
        folder.0
    }
}
