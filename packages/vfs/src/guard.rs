//! One adapter that turns item failures into [`StorageError`]s.
//!
//! Code at an API boundary usually wants a single failure type. Rather than
//! wrapping every item method, [`Guarded`] forwards any call through
//! [`Guarded::call`], and [`IntoStorageResult`] does the same for a result
//! already in hand.
//!
//! ```rust
//! use webcore_vfs::{FileErrorKind, Guarded, MemoryBackend, Storage};
//!
//! let storage = Storage::new("docs", MemoryBackend::new());
//! let file = Guarded::new(storage.file("missing.txt").unwrap());
//!
//! let err = file.call(|f| f.read_string()).unwrap_err();
//! assert_eq!(err.kind(), FileErrorKind::NotFound);
//! ```

use std::ops::Deref;

use crate::{FileError, StorageError};

/// Wraps an item so every call through it fails with [`StorageError`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Guarded<T> {
    inner: T,
}

impl<T> Guarded<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Forward `op` to the wrapped value.
    pub fn call<R, F>(&self, op: F) -> Result<R, StorageError>
    where
        F: FnOnce(&T) -> Result<R, FileError>,
    {
        op(&self.inner).into_storage_result()
    }

    /// Forward `op` and wrap what it returns, for calls that produce another
    /// item.
    pub fn map<U, F>(&self, op: F) -> Result<Guarded<U>, StorageError>
    where
        F: FnOnce(&T) -> Result<U, FileError>,
    {
        self.call(op).map(Guarded::new)
    }
}

impl<T> Deref for Guarded<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> From<T> for Guarded<T> {
    fn from(inner: T) -> Self {
        Self::new(inner)
    }
}

/// Converts item results to the wrapper boundary's error type.
pub trait IntoStorageResult<R> {
    fn into_storage_result(self) -> Result<R, StorageError>;
}

impl<R> IntoStorageResult<R> for Result<R, FileError> {
    fn into_storage_result(self) -> Result<R, StorageError> {
        self.map_err(|err| {
            log::debug!("Storage operation failed: {}", err);
            StorageError::from(err)
        })
    }
}
