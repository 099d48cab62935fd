//! Metadata caches.

use std::collections::HashMap;
use std::sync::RwLock;

use webcore_json::JsonObject;

use crate::StoragePath;

/// A cache of item metadata, keyed by path.
pub trait ItemCache: Send + Sync {
    fn get(&self, path: &StoragePath) -> Option<JsonObject>;

    fn put(&self, path: StoragePath, metadata: JsonObject);

    /// Forget `path`, everything below it and its ancestors.
    fn invalidate(&self, path: &StoragePath);

    fn clear(&self);
}

/// An in-process [`ItemCache`].
///
/// A poisoned lock behaves like an empty cache.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<StoragePath, JsonObject>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ItemCache for MemoryCache {
    fn get(&self, path: &StoragePath) -> Option<JsonObject> {
        self.entries.read().ok()?.get(path).cloned()
    }

    fn put(&self, path: StoragePath, metadata: JsonObject) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(path, metadata);
        }
    }

    fn invalidate(&self, path: &StoragePath) {
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|cached, _| !cached.starts_with(path) && !path.starts_with(cached));
            log::debug!("Invalidated cached metadata around {}", path);
        }
    }

    fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}
