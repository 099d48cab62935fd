//! Normalized paths inside a storage.
//!
//! A [`StoragePath`] is a list of segments below the storage root. Names are
//! resolved by segment: `.` is dropped, `..` removes the previous segment and
//! may never climb above the root. Mapping onto a native directory appends
//! segments as path components and mapping back strips the root by component
//! count, so `/data/store2/x` never resolves inside a storage rooted at
//! `/data/store`.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::FileError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoragePath {
    segments: Vec<String>,
}

impl StoragePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a name relative to the storage root.
    ///
    /// Both `/` and `\` separate segments; leading separators are optional.
    pub fn parse(name: &str) -> Result<Self, FileError> {
        Self::root().resolve(name)
    }

    /// Resolve `name` against this path.
    ///
    /// Absolute names (leading separator) start from the root; anything else
    /// starts from `self`.
    pub fn resolve(&self, name: &str) -> Result<Self, FileError> {
        let mut segments = if name.starts_with(['/', '\\']) {
            Vec::new()
        } else {
            self.segments.clone()
        };

        for segment in name.split(['/', '\\']) {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(FileError::Escape {
                            path: name.to_string(),
                        });
                    }
                }
                other => segments.push(other.to_string()),
            }
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The final segment; empty for the root.
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }

    /// The extension of the final segment, if any.
    pub fn extension(&self) -> Option<&str> {
        let name = self.name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(i) => Some(&name[i + 1..]),
        }
    }

    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.segments.split_last()?;
        Some(Self {
            segments: parent.to_vec(),
        })
    }

    /// Every proper ancestor, nearest first, ending with the root.
    pub fn ancestors(&self) -> impl Iterator<Item = StoragePath> + '_ {
        (0..self.segments.len()).rev().map(|len| Self {
            segments: self.segments[..len].to_vec(),
        })
    }

    /// Append a single already-validated segment.
    pub(crate) fn child(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Self { segments }
    }

    /// True when `prefix` is this path or one of its ancestors.
    pub fn starts_with(&self, prefix: &StoragePath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Move this path from under `from` to under `to`.
    pub fn rebase(&self, from: &StoragePath, to: &StoragePath) -> Option<Self> {
        let rest = self.segments.strip_prefix(from.segments.as_slice())?;
        let mut segments = to.segments.clone();
        segments.extend_from_slice(rest);
        Some(Self { segments })
    }

    /// Hidden when any segment is dot-prefixed.
    pub fn is_hidden(&self) -> bool {
        self.segments.iter().any(|s| s.starts_with('.'))
    }

    /// The native location of this path below `root`.
    pub fn to_native(&self, root: &Path) -> PathBuf {
        let mut native = root.to_path_buf();
        native.extend(&self.segments);
        native
    }

    /// The storage path of `native`, when it lies below `root`.
    pub fn from_native(root: &Path, native: &Path) -> Option<Self> {
        let root_len = root.components().count();
        let mut components = native.components();
        if !components
            .by_ref()
            .take(root_len)
            .eq(root.components())
        {
            return None;
        }

        let mut segments = Vec::new();
        for component in components {
            match component {
                Component::Normal(s) => segments.push(s.to_str()?.to_string()),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(Self { segments })
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}
