use std::path::{self, PathBuf};
use std::{fs, io};

use super::{Backend, ContentReader, ContentWriter, EntryKind, EntryMeta};
use crate::{FileError, StoragePath};

/// A backend rooted at a native directory.
///
/// Symbolic links below the root are never followed: a linked entry reads
/// as missing and any operation through it is refused.
#[derive(Debug, Clone)]
pub struct LocalBackend {
    root: path::PathBuf,
}

impl LocalBackend {
    /// Open a writable directory as a storage root.
    pub fn new(root: impl Into<PathBuf>) -> Result<LocalBackend, FileError> {
        Self::open(root.into(), false)
    }

    /// Open a directory without requiring write permission.
    pub fn read_only(root: impl Into<PathBuf>) -> Result<LocalBackend, FileError> {
        Self::open(root.into(), true)
    }

    fn open(root: PathBuf, read_only: bool) -> Result<LocalBackend, FileError> {
        let attr = fs::metadata(&root).map_err(|source| FileError::InvalidRoot {
            path: root.clone(),
            source,
        })?;

        if !attr.is_dir() {
            return Err(FileError::InvalidRoot {
                path: root,
                source: io::Error::other("Root path must be a directory."),
            });
        }

        if !read_only && attr.permissions().readonly() {
            return Err(FileError::InvalidRoot {
                path: root,
                source: io::Error::other("Root directory must be writable"),
            });
        }

        match root.canonicalize() {
            Ok(root) => {
                log::debug!("Local backend rooted at {}", root.display());
                Ok(LocalBackend { root })
            }
            Err(source) => Err(FileError::InvalidRoot { path: root, source }),
        }
    }

    pub fn root(&self) -> &path::Path {
        &self.root
    }

    /// The native path of `path`, or `None` when one of its existing
    /// segments is a symbolic link.
    fn link_free_path(&self, path: &StoragePath) -> io::Result<Option<PathBuf>> {
        let mut native = self.root.clone();
        for segment in path.segments() {
            native.push(segment);
            match fs::symlink_metadata(&native) {
                Ok(attr) if attr.file_type().is_symlink() => {
                    log::debug!("Refusing {}: {} is a link", path, native.display());
                    return Ok(None);
                }
                Ok(_) => {}
                Err(err) if err.kind() == io::ErrorKind::NotFound => break,
                Err(err) => return Err(err),
            }
        }
        let file_path = path.to_native(&self.root);
        log::debug!("Mapped {} to {}", path, file_path.display());
        Ok(Some(file_path))
    }

    fn file_path(&self, path: &StoragePath) -> io::Result<PathBuf> {
        self.link_free_path(path)?.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("{} passes through a symbolic link", path),
            )
        })
    }
}

fn entry_meta(attr: &fs::Metadata) -> EntryMeta {
    let kind = if attr.is_dir() {
        EntryKind::Folder
    } else {
        EntryKind::File
    };
    EntryMeta {
        kind,
        size: if attr.is_dir() { 0 } else { attr.len() },
        modified: attr.modified().ok(),
        readonly: attr.permissions().readonly(),
    }
}

impl Backend for LocalBackend {
    fn metadata(&self, path: &StoragePath) -> io::Result<Option<EntryMeta>> {
        let Some(file_path) = self.link_free_path(path)? else {
            return Ok(None);
        };
        match fs::metadata(file_path) {
            Ok(attr) => Ok(Some(entry_meta(&attr))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn open_read(&self, path: &StoragePath) -> io::Result<ContentReader> {
        let file = fs::File::open(self.file_path(path)?)?;
        Ok(Box::new(io::BufReader::new(file)))
    }

    fn open_write(&self, path: &StoragePath) -> io::Result<ContentWriter> {
        let file = fs::File::create(self.file_path(path)?)?;
        Ok(Box::new(io::BufWriter::new(file)))
    }

    fn list(&self, path: &StoragePath) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(self.file_path(path)?)? {
            let entry = entry?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => log::debug!("Skipping non-UTF-8 entry {:?} in {}", name, path),
            }
        }
        names.sort();
        Ok(names)
    }

    fn walk(&self, path: &StoragePath) -> io::Result<Vec<StoragePath>> {
        let mut found = Vec::new();
        for entry in walkdir::WalkDir::new(self.file_path(path)?)
            .min_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(io::Error::from)?;
            match StoragePath::from_native(&self.root, entry.path()) {
                Some(child) => found.push(child),
                None => log::debug!("Skipping unmappable entry {}", entry.path().display()),
            }
        }
        Ok(found)
    }

    fn create_dir_all(&self, path: &StoragePath) -> io::Result<()> {
        fs::create_dir_all(self.file_path(path)?)
    }

    fn remove_file(&self, path: &StoragePath) -> io::Result<()> {
        fs::remove_file(self.file_path(path)?)
    }

    fn remove_dir_all(&self, path: &StoragePath) -> io::Result<()> {
        fs::remove_dir_all(self.file_path(path)?)
    }

    fn rename(&self, from: &StoragePath, to: &StoragePath) -> io::Result<()> {
        fs::rename(self.file_path(from)?, self.file_path(to)?)
    }

    fn native_path(&self, path: &StoragePath) -> Option<PathBuf> {
        Some(path.to_native(&self.root))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};

    fn p(s: &str) -> StoragePath {
        StoragePath::parse(s).unwrap()
    }

    #[test]
    fn root_must_be_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, b"x").unwrap();

        assert!(matches!(
            LocalBackend::new(&file),
            Err(FileError::InvalidRoot { .. })
        ));
        assert!(matches!(
            LocalBackend::new(dir.path().join("missing")),
            Err(FileError::InvalidRoot { .. })
        ));
        assert!(LocalBackend::new(dir.path()).is_ok());
    }

    #[test]
    fn write_read_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new(dir.path()).unwrap();

        backend.create_dir_all(&p("a/b")).unwrap();
        {
            let mut out = backend.open_write(&p("a/b/note.txt")).unwrap();
            out.write_all(b"hello").unwrap();
            out.flush().unwrap();
        }

        let mut text = String::new();
        backend
            .open_read(&p("a/b/note.txt"))
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "hello");

        let meta = backend.metadata(&p("a/b/note.txt")).unwrap().unwrap();
        assert!(meta.is_file());
        assert_eq!(meta.size, 5);
        assert!(backend.metadata(&p("a/b")).unwrap().unwrap().is_folder());
        assert!(backend.metadata(&p("nope")).unwrap().is_none());

        assert_eq!(backend.list(&p("a")).unwrap(), vec!["b"]);
        let walked: Vec<String> = backend
            .walk(&StoragePath::root())
            .unwrap()
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(walked, vec!["/a", "/a/b", "/a/b/note.txt"]);
    }

    #[test]
    fn rename_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new(dir.path()).unwrap();
        backend.create_dir_all(&p("x/y")).unwrap();
        backend.rename(&p("x"), &p("z")).unwrap();
        assert!(backend.metadata(&p("z/y")).unwrap().is_some());
        backend.remove_dir_all(&p("z")).unwrap();
        assert!(backend.list(&StoragePath::root()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn symbolic_links_are_not_followed() {
        use std::os::unix::fs::symlink;

        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "outside").unwrap();
        let dir = tempfile::tempdir().unwrap();
        symlink(outside.path(), dir.path().join("link")).unwrap();
        symlink(outside.path().join("secret.txt"), dir.path().join("file-link")).unwrap();
        let backend = LocalBackend::new(dir.path()).unwrap();

        for name in ["link", "link/secret.txt", "file-link"] {
            assert!(backend.metadata(&p(name)).unwrap().is_none(), "{}", name);
        }
        let denied = io::ErrorKind::PermissionDenied;
        assert_eq!(backend.open_read(&p("link/secret.txt")).err().unwrap().kind(), denied);
        assert_eq!(backend.open_read(&p("file-link")).err().unwrap().kind(), denied);
        assert_eq!(backend.open_write(&p("link/new.txt")).err().unwrap().kind(), denied);
        assert_eq!(backend.list(&p("link")).unwrap_err().kind(), denied);
        assert_eq!(backend.create_dir_all(&p("link/sub")).unwrap_err().kind(), denied);
        assert_eq!(backend.remove_file(&p("link/secret.txt")).unwrap_err().kind(), denied);
        assert!(!outside.path().join("new.txt").exists());
        assert!(!outside.path().join("sub").exists());
        assert!(outside.path().join("secret.txt").exists());

        // The links themselves still show up by name.
        assert_eq!(backend.list(&StoragePath::root()).unwrap(), vec!["file-link", "link"]);
    }

    #[test]
    fn native_paths_stay_below_root() {
        let dir = tempfile::tempdir().unwrap();
        let backend = LocalBackend::new(dir.path()).unwrap();
        let native = backend.native_path(&p("a/../b")).unwrap();
        assert_eq!(native, backend.root().join("b"));
    }
}
