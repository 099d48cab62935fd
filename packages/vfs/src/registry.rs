//! An explicit, named set of storages built at startup.

use std::collections::BTreeMap;

use crate::backend::Backend;
use crate::config::{BackendConfig, RegistryConfig, StorageEntry};
use crate::{FileError, LocalBackend, MemoryBackend, MemoryCache, RegistryError, Storage};

/// Creates backends from configuration.
pub trait BackendFactory: Send + Sync {
    fn create(&self, entry: &StorageEntry) -> Result<Box<dyn Backend>, FileError>;
}

/// Builds [`MemoryBackend`]s and [`LocalBackend`]s. A read-only local storage
/// does not require a writable root.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBackendFactory;

impl BackendFactory for DefaultBackendFactory {
    fn create(&self, entry: &StorageEntry) -> Result<Box<dyn Backend>, FileError> {
        match &entry.backend {
            BackendConfig::Memory => Ok(Box::new(MemoryBackend::new())),
            BackendConfig::Local { path } if entry.options.read_only => {
                Ok(Box::new(LocalBackend::read_only(path)?))
            }
            BackendConfig::Local { path } => Ok(Box::new(LocalBackend::new(path)?)),
        }
    }
}

/// Storages by name.
///
/// # Example
///
/// ```rust
/// use webcore_vfs::{MemoryBackend, Storage, StorageRegistry};
///
/// let mut registry = StorageRegistry::new();
/// registry.register(Storage::new("scratch", MemoryBackend::new())).unwrap();
/// assert!(registry.register(Storage::new("scratch", MemoryBackend::new())).is_err());
///
/// let scratch = registry.get("scratch").unwrap();
/// assert_eq!(scratch.name(), "scratch");
/// ```
#[derive(Debug, Default)]
pub struct StorageRegistry {
    storages: BTreeMap<String, Storage>,
}

impl StorageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every storage of `config` with the default backends.
    pub fn from_config(config: &RegistryConfig) -> Result<StorageRegistry, RegistryError> {
        Self::from_config_with(config, &DefaultBackendFactory)
    }

    pub fn from_config_with(
        config: &RegistryConfig,
        factory: &dyn BackendFactory,
    ) -> Result<StorageRegistry, RegistryError> {
        let mut registry = StorageRegistry::new();
        for entry in &config.storages {
            if registry.contains(&entry.name) {
                return Err(RegistryError::Duplicate {
                    name: entry.name.clone(),
                });
            }
            let backend = factory
                .create(entry)
                .map_err(|source| RegistryError::Backend {
                    name: entry.name.clone(),
                    source,
                })?;
            let mut builder = Storage::builder(entry.name.clone(), backend)
                .options(entry.options.clone());
            if entry.cache {
                builder = builder.cache(MemoryCache::new());
            }
            registry.register(builder.build())?;
        }
        Ok(registry)
    }

    /// Add a storage. Names are unique.
    pub fn register(&mut self, storage: Storage) -> Result<(), RegistryError> {
        if self.storages.contains_key(storage.name()) {
            return Err(RegistryError::Duplicate {
                name: storage.name().to_string(),
            });
        }
        log::info!("Registered storage '{}'", storage.name());
        self.storages.insert(storage.name().to_string(), storage);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Storage, RegistryError> {
        self.storages
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::Unknown {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.storages.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.storages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.storages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storages.is_empty()
    }

    /// Remove and close a storage.
    pub fn unregister(&mut self, name: &str) -> Result<Storage, RegistryError> {
        let storage = self
            .storages
            .remove(name)
            .ok_or_else(|| RegistryError::Unknown {
                name: name.to_string(),
            })?;
        storage.close();
        log::info!("Unregistered storage '{}'", name);
        Ok(storage)
    }

    pub fn close_all(&self) {
        for storage in self.storages.values() {
            storage.close();
        }
    }
}
