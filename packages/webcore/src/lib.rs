//! webcore: the building blocks of a server-side application core.
//!
//! - [`json`]: an insertion-ordered JSON document model with path queries,
//!   mutations and structural validation.
//! - [`binder`]: conversion between documents and external formats.
//! - [`vfs`]: named storages of files and folders over pluggable backends.
//!
//! ```rust
//! use webcore::prelude::*;
//!
//! let storage = Storage::new("config", MemoryBackend::new());
//! let root = storage.root().unwrap();
//! root.create("app.json", r#"{"db":{"port":5432}}"#).unwrap();
//!
//! let text = root.file("app.json").unwrap().read_string().unwrap();
//! let doc = JsonValue::parse(&text).unwrap();
//! assert_eq!(jpath!("$.db.port").read_i32(&doc), Some(5432));
//! ```

pub use webcore_binder as binder;
pub use webcore_json as json;
pub use webcore_vfs as vfs;

pub use webcore_json::jpath;

/// The types most applications touch.
pub mod prelude {
    pub use webcore_binder::{Binder, Format, JsonBinder, MultiBinder, PropertiesBinder};
    pub use webcore_json::jpath;
    pub use webcore_json::validate::{check, Validator};
    pub use webcore_json::{JsonArray, JsonError, JsonObject, JsonPath, JsonValue};
    pub use webcore_vfs::{
        ContentSource, FileError, FileItem, FolderItem, Guarded, IntoStorageResult, ListFilter,
        LocalBackend, MemoryBackend, Storage, StorageError, StorageRegistry,
    };
}
