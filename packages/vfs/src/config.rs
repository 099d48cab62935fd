//! Registry configuration.
//!
//! Storages are declared as JSON objects like:
//! ```json
//! {"name": "scratch", "backend": {"type": "memory"}}
//! {"name": "uploads", "backend": {"type": "local", "path": "/srv/up"}, "size_limit": 1048576, "cache": true}
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{RegistryError, StorageOptions};

/// Where a storage keeps its items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    /// In-memory tree, lost when the storage is dropped
    Memory,
    /// Native directory
    Local { path: PathBuf },
}

/// One storage of a registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageEntry {
    pub name: String,
    pub backend: BackendConfig,
    #[serde(flatten)]
    pub options: StorageOptions,
    /// Cache item metadata in memory.
    #[serde(default)]
    pub cache: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegistryConfig {
    #[serde(default)]
    pub storages: Vec<StorageEntry>,
}

impl RegistryConfig {
    pub fn from_json_str(text: &str) -> Result<RegistryConfig, RegistryError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<RegistryConfig, RegistryError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded registry configuration from {}", path.display());
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_both_backends() {
        let text = json!({
            "storages": [
                {
                    "name": "uploads",
                    "backend": {"type": "local", "path": "/srv/up"},
                    "size_limit": 1048576,
                    "cache": true
                },
                {"name": "scratch", "backend": {"type": "memory"}, "read_only": true}
            ]
        })
        .to_string();

        let config = RegistryConfig::from_json_str(&text).unwrap();
        assert_eq!(
            config.storages[0],
            StorageEntry {
                name: "uploads".to_string(),
                backend: BackendConfig::Local {
                    path: PathBuf::from("/srv/up"),
                },
                options: StorageOptions {
                    size_limit: Some(1048576),
                    ..StorageOptions::default()
                },
                cache: true,
            }
        );
        assert_eq!(config.storages[1].backend, BackendConfig::Memory);
        assert!(config.storages[1].options.read_only);
        assert!(!config.storages[1].cache);
    }

    #[test]
    fn rejects_unknown_backend() {
        let err = RegistryConfig::from_json_str(
            r#"{"storages": [{"name": "x", "backend": {"type": "ftp"}}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::Config(_)));
    }

    #[test]
    fn from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storages.json");
        fs::write(&path, r#"{"storages": []}"#).unwrap();
        assert!(RegistryConfig::from_file(&path).unwrap().storages.is_empty());

        let missing = RegistryConfig::from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(missing, RegistryError::Io { .. }));
    }
}
