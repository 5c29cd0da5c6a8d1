//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::RwLock;

use crate::storage::{PAGE_EXTENSION, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

/// Mock storage for testing.
///
/// Stores page bodies in memory, listed in title order. Use the builder
/// methods to seed pages and to make reads or writes of particular titles
/// fail.
///
/// # Example
///
/// ```ignore
/// use fw_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_page("Home", "Welcome")
///     .with_failing_write("Locked");
///
/// assert!(storage.write("Locked", b"x").is_err());
/// ```
#[derive(Debug, Default)]
pub struct MockStorage {
    pages: RwLock<BTreeMap<String, Vec<u8>>>,
    failing_reads: RwLock<HashSet<String>>,
    failing_writes: RwLock<HashSet<String>>,
    writes: RwLock<Vec<String>>,
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a page body.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(self, title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.pages.write().unwrap().insert(title.into(), body.into());
        self
    }

    /// Make every read of `title` fail with `PermissionDenied`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_read(self, title: impl Into<String>) -> Self {
        self.failing_reads.write().unwrap().insert(title.into());
        self
    }

    /// Make every write of `title` fail with `PermissionDenied`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failing_write(self, title: impl Into<String>) -> Self {
        self.failing_writes.write().unwrap().insert(title.into());
        self
    }

    /// Current body of a page, if stored.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn body(&self, title: &str) -> Option<Vec<u8>> {
        self.pages.read().unwrap().get(title).cloned()
    }

    /// Titles of every write attempt, in call order, including failed ones.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn writes(&self) -> Vec<String> {
        self.writes.read().unwrap().clone()
    }

    fn page_path(title: &str) -> PathBuf {
        PathBuf::from(format!("{title}.{PAGE_EXTENSION}"))
    }

    fn injected(title: &str) -> StorageError {
        StorageError::new(StorageErrorKind::PermissionDenied)
            .with_path(Self::page_path(title))
            .with_backend(BACKEND)
    }
}

impl Storage for MockStorage {
    fn read(&self, title: &str) -> Result<Vec<u8>, StorageError> {
        if self.failing_reads.read().unwrap().contains(title) {
            return Err(Self::injected(title));
        }
        self.pages
            .read()
            .unwrap()
            .get(title)
            .cloned()
            .ok_or_else(|| StorageError::not_found(Self::page_path(title)).with_backend(BACKEND))
    }

    fn write(&self, title: &str, body: &[u8]) -> Result<PathBuf, StorageError> {
        self.writes.write().unwrap().push(title.to_owned());
        if self.failing_writes.read().unwrap().contains(title) {
            return Err(Self::injected(title));
        }
        self.pages
            .write()
            .unwrap()
            .insert(title.to_owned(), body.to_vec());
        Ok(Self::page_path(title))
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.pages.read().unwrap().keys().cloned().collect())
    }

    fn location(&self, title: &str) -> Option<PathBuf> {
        Some(Self::page_path(title))
    }

    fn exists(&self, title: &str) -> bool {
        self.pages.read().unwrap().contains_key(title)
    }
}
