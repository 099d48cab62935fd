use std::collections::BTreeMap;
use std::io::{self, Cursor, Write};
use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use super::{Backend, ContentReader, ContentWriter, EntryKind, EntryMeta};
use crate::StoragePath;

#[derive(Clone, Debug)]
enum Node {
    File { data: Arc<Vec<u8>>, modified: SystemTime },
    Folder { modified: SystemTime },
}

impl Node {
    fn meta(&self) -> EntryMeta {
        match self {
            Node::File { data, modified } => EntryMeta {
                kind: EntryKind::File,
                size: data.len() as u64,
                modified: Some(*modified),
                readonly: false,
            },
            Node::Folder { modified } => EntryMeta {
                kind: EntryKind::Folder,
                size: 0,
                modified: Some(*modified),
                readonly: false,
            },
        }
    }
}

type Nodes = BTreeMap<StoragePath, Node>;

/// A backend that keeps everything in memory.
///
/// Clones share the same tree.
#[derive(Clone, Debug)]
pub struct MemoryBackend {
    nodes: Arc<RwLock<Nodes>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let mut nodes = Nodes::new();
        nodes.insert(
            StoragePath::root(),
            Node::Folder {
                modified: SystemTime::now(),
            },
        );
        Self {
            nodes: Arc::new(RwLock::new(nodes)),
        }
    }

    fn read_nodes(&self) -> io::Result<RwLockReadGuard<'_, Nodes>> {
        self.nodes
            .read()
            .map_err(|_| io::Error::other("memory backend lock poisoned"))
    }

    fn write_nodes(&self) -> io::Result<RwLockWriteGuard<'_, Nodes>> {
        self.nodes
            .write()
            .map_err(|_| io::Error::other("memory backend lock poisoned"))
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found(path: &StoragePath) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{} does not exist", path))
}

fn require_folder(nodes: &Nodes, path: &StoragePath) -> io::Result<()> {
    match nodes.get(path) {
        Some(Node::Folder { .. }) => Ok(()),
        Some(Node::File { .. }) => Err(io::Error::other(format!("{} is not a folder", path))),
        None => Err(not_found(path)),
    }
}

fn require_parent(nodes: &Nodes, path: &StoragePath) -> io::Result<()> {
    match path.parent() {
        Some(parent) => require_folder(nodes, &parent),
        None => Err(io::Error::other("the root cannot be replaced")),
    }
}

/// Buffers written bytes and commits them to the tree on flush and drop.
/// Nothing is committed when no bytes were written since the last commit.
struct MemoryWriter {
    nodes: Arc<RwLock<Nodes>>,
    path: StoragePath,
    buffer: Vec<u8>,
    dirty: bool,
}

impl MemoryWriter {
    fn commit(&mut self) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        let mut nodes = self
            .nodes
            .write()
            .map_err(|_| io::Error::other("memory backend lock poisoned"))?;
        nodes.insert(
            self.path.clone(),
            Node::File {
                data: Arc::new(self.buffer.clone()),
                modified: SystemTime::now(),
            },
        );
        self.dirty = false;
        Ok(())
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        self.dirty = true;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.commit()
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        if let Err(err) = self.commit() {
            log::warn!("Failed to commit {}: {}", self.path, err);
        }
    }
}

/// Shares the file's bytes without copying them.
struct SharedBytes(Arc<Vec<u8>>);

impl AsRef<[u8]> for SharedBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Backend for MemoryBackend {
    fn metadata(&self, path: &StoragePath) -> io::Result<Option<EntryMeta>> {
        Ok(self.read_nodes()?.get(path).map(Node::meta))
    }

    fn open_read(&self, path: &StoragePath) -> io::Result<ContentReader> {
        match self.read_nodes()?.get(path) {
            Some(Node::File { data, .. }) => Ok(Box::new(Cursor::new(SharedBytes(data.clone())))),
            Some(Node::Folder { .. }) => Err(io::Error::other(format!("{} is a folder", path))),
            None => Err(not_found(path)),
        }
    }

    fn open_write(&self, path: &StoragePath) -> io::Result<ContentWriter> {
        let mut nodes = self.write_nodes()?;
        require_parent(&nodes, path)?;
        if let Some(Node::Folder { .. }) = nodes.get(path) {
            return Err(io::Error::other(format!("{} is a folder", path)));
        }
        // Truncate now so concurrent readers see the file from the start.
        nodes.insert(
            path.clone(),
            Node::File {
                data: Arc::new(Vec::new()),
                modified: SystemTime::now(),
            },
        );
        Ok(Box::new(MemoryWriter {
            nodes: self.nodes.clone(),
            path: path.clone(),
            buffer: Vec::new(),
            dirty: false,
        }))
    }

    fn list(&self, path: &StoragePath) -> io::Result<Vec<String>> {
        let nodes = self.read_nodes()?;
        require_folder(&nodes, path)?;
        let depth = path.depth() + 1;
        Ok(nodes
            .range(path.clone()..)
            .take_while(|(p, _)| p.starts_with(path))
            .filter(|(p, _)| p.depth() == depth)
            .map(|(p, _)| p.name().to_string())
            .collect())
    }

    fn create_dir_all(&self, path: &StoragePath) -> io::Result<()> {
        let mut nodes = self.write_nodes()?;
        let mut chain: Vec<StoragePath> = path.ancestors().collect();
        chain.reverse();
        chain.push(path.clone());
        for folder in chain {
            match nodes.get(&folder) {
                Some(Node::Folder { .. }) => {}
                Some(Node::File { .. }) => {
                    return Err(io::Error::other(format!("{} is not a folder", folder)))
                }
                None => {
                    nodes.insert(
                        folder,
                        Node::Folder {
                            modified: SystemTime::now(),
                        },
                    );
                }
            }
        }
        Ok(())
    }

    fn remove_file(&self, path: &StoragePath) -> io::Result<()> {
        let mut nodes = self.write_nodes()?;
        match nodes.get(path) {
            Some(Node::File { .. }) => {
                nodes.remove(path);
                Ok(())
            }
            Some(Node::Folder { .. }) => Err(io::Error::other(format!("{} is a folder", path))),
            None => Err(not_found(path)),
        }
    }

    fn remove_dir_all(&self, path: &StoragePath) -> io::Result<()> {
        let mut nodes = self.write_nodes()?;
        require_folder(&nodes, path)?;
        if path.is_root() {
            nodes.retain(|p, _| p.is_root());
        } else {
            nodes.retain(|p, _| !p.starts_with(path));
        }
        Ok(())
    }

    fn rename(&self, from: &StoragePath, to: &StoragePath) -> io::Result<()> {
        let mut nodes = self.write_nodes()?;
        if !nodes.contains_key(from) {
            return Err(not_found(from));
        }
        if from.is_root() || to.starts_with(from) {
            return Err(io::Error::other(format!("cannot move {} into {}", from, to)));
        }
        require_parent(&nodes, to)?;

        let moved: Vec<StoragePath> = nodes
            .keys()
            .filter(|p| p.starts_with(from))
            .cloned()
            .collect();
        nodes.retain(|p, _| !p.starts_with(to));
        for old in moved {
            if let (Some(node), Some(new)) = (nodes.remove(&old), old.rebase(from, to)) {
                nodes.insert(new, node);
            }
        }
        Ok(())
    }

    fn native_path(&self, _path: &StoragePath) -> Option<PathBuf> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn p(s: &str) -> StoragePath {
        StoragePath::parse(s).unwrap()
    }

    fn write(backend: &MemoryBackend, path: &str, data: &[u8]) {
        let mut out = backend.open_write(&p(path)).unwrap();
        out.write_all(data).unwrap();
        out.flush().unwrap();
    }

    fn read(backend: &MemoryBackend, path: &str) -> String {
        let mut text = String::new();
        backend
            .open_read(&p(path))
            .unwrap()
            .read_to_string(&mut text)
            .unwrap();
        text
    }

    #[test]
    fn root_exists() {
        let backend = MemoryBackend::new();
        assert!(backend
            .metadata(&StoragePath::root())
            .unwrap()
            .unwrap()
            .is_folder());
    }

    #[test]
    fn write_requires_parent() {
        let backend = MemoryBackend::new();
        let err = backend.open_write(&p("a/b.txt")).err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);

        backend.create_dir_all(&p("a")).unwrap();
        write(&backend, "a/b.txt", b"data");
        assert_eq!(read(&backend, "a/b.txt"), "data");
        assert_eq!(backend.metadata(&p("a/b.txt")).unwrap().unwrap().size, 4);
    }

    #[test]
    fn writer_commits_on_drop() {
        let backend = MemoryBackend::new();
        {
            let mut out = backend.open_write(&p("x")).unwrap();
            out.write_all(b"abc").unwrap();
        }
        assert_eq!(read(&backend, "x"), "abc");
    }

    #[test]
    fn list_only_direct_children() {
        let backend = MemoryBackend::new();
        backend.create_dir_all(&p("a/b/c")).unwrap();
        write(&backend, "a/one", b"1");
        write(&backend, "ab", b"2");

        assert_eq!(backend.list(&p("a")).unwrap(), vec!["b", "one"]);
        assert_eq!(backend.list(&StoragePath::root()).unwrap(), vec!["a", "ab"]);

        let walked: Vec<String> = backend
            .walk(&p("a"))
            .unwrap()
            .iter()
            .map(|p| p.to_string())
            .collect();
        assert_eq!(walked, vec!["/a/b", "/a/b/c", "/a/one"]);
    }

    #[test]
    fn rename_moves_subtree() {
        let backend = MemoryBackend::new();
        backend.create_dir_all(&p("src/inner")).unwrap();
        write(&backend, "src/inner/f", b"f");
        backend.rename(&p("src"), &p("dst")).unwrap();

        assert!(backend.metadata(&p("src")).unwrap().is_none());
        assert_eq!(read(&backend, "dst/inner/f"), "f");
        assert!(backend.rename(&p("dst"), &p("dst/inside")).is_err());
    }

    #[test]
    fn remove_dir_all_keeps_siblings() {
        let backend = MemoryBackend::new();
        backend.create_dir_all(&p("a/b")).unwrap();
        write(&backend, "ab", b"keep");
        backend.remove_dir_all(&p("a")).unwrap();
        assert_eq!(backend.list(&StoragePath::root()).unwrap(), vec!["ab"]);
        assert!(backend.remove_file(&p("a")).is_err());
    }

    #[test]
    fn clones_share_state() {
        let backend = MemoryBackend::new();
        let other = backend.clone();
        write(&backend, "shared", b"yes");
        assert_eq!(read(&other, "shared"), "yes");
    }
}
