//! Virtual file storages.
//!
//! A [`Storage`] is a named, closable root over a [`Backend`]: a native
//! directory ([`LocalBackend`]) or an in-memory tree ([`MemoryBackend`]).
//! Items are looked up by name and recreated on every lookup; they never
//! cache backend state themselves.
//!
//! ```rust
//! use webcore_vfs::{ListFilter, MemoryBackend, Storage};
//!
//! let storage = Storage::new("docs", MemoryBackend::new());
//! let root = storage.root().unwrap();
//!
//! root.create("guides/intro.html", "<h1>Intro</h1>").unwrap();
//! let guides = root.folder("guides").unwrap();
//! let files = guides.list(ListFilter::files()).unwrap();
//!
//! assert_eq!(files[0].path().to_string(), "/guides/intro.html");
//! assert_eq!(files[0].content_type().unwrap(), "text/html");
//! ```

pub mod backend;
mod cache;
pub mod config;
mod content_type;
mod error;
mod folder;
mod guard;
mod item;
mod metadata;
mod path;
mod registry;
mod storage;

pub use backend::{Backend, EntryKind, EntryMeta, LocalBackend, MemoryBackend};
pub use cache::{ItemCache, MemoryCache};
pub use config::{BackendConfig, RegistryConfig, StorageEntry};
pub use content_type::{ContentTypeMapper, FixedContentType, GuessContentType, FOLDER_CONTENT_TYPE};
pub use error::{FileError, FileErrorKind, RegistryError, StorageError};
pub use folder::{FolderItem, ListFilter};
pub use guard::{Guarded, IntoStorageResult};
pub use item::{ContentSource, FileItem};
pub use metadata::{BasicMetadata, MetadataFactory, SidecarMetadata};
pub use path::StoragePath;
pub use registry::{BackendFactory, DefaultBackendFactory, StorageRegistry};
pub use storage::{Storage, StorageBuilder, StorageOptions};
