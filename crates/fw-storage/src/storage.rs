//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for abstracting page persistence,
//! along with [`StorageError`] for unified error handling across backends.
//!
//! # Title Convention
//!
//! All `title` parameters are bare page titles, not file paths:
//! - `"Home"` maps to `<data_dir>/Home.txt` in [`FsStorage`](crate::FsStorage)
//! - `"Dumpling"` maps to `<data_dir>/Dumpling.txt`
//!
//! Callers are expected to validate titles before they reach storage. Backends
//! still reject titles that would escape the storage root.

use std::path::{Path, PathBuf};

/// File extension of stored pages (without the dot).
pub const PAGE_EXTENSION: &str = "txt";

/// Semantic error categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Page does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Resource already exists.
    AlreadyExists,
    /// Title cannot be mapped to a storage location.
    InvalidPath,
    /// No space left on the backing device.
    StorageFull,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    kind: StorageErrorKind,
    path: Option<PathBuf>,
    backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Semantic error category.
    #[must_use]
    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    /// Path the failed operation touched, if known.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Backend identifier (e.g., "Fs", "Mock").
    #[must_use]
    pub fn backend(&self) -> Option<&'static str> {
        self.backend
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied | std::io::ErrorKind::ReadOnlyFilesystem => {
                StorageErrorKind::PermissionDenied
            }
            std::io::ErrorKind::AlreadyExists => StorageErrorKind::AlreadyExists,
            std::io::ErrorKind::StorageFull => StorageErrorKind::StorageFull,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::AlreadyExists => "Already exists",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::StorageFull => "Storage full",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Storage abstraction for page bodies keyed by title.
///
/// Bodies are opaque bytes: backends never inspect, normalize or re-encode
/// them.
pub trait Storage: Send + Sync {
    /// Read the stored body of a page.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the page doesn't exist or can't be read.
    fn read(&self, title: &str) -> Result<Vec<u8>, StorageError>;

    /// Write a page body, creating the page or replacing its previous body.
    ///
    /// Returns the location the body was written to.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the body can't be persisted (permission
    /// denied, missing directory, disk full).
    fn write(&self, title: &str, body: &[u8]) -> Result<PathBuf, StorageError>;

    /// List the titles of all stored pages in listing order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend can't be enumerated.
    fn list(&self) -> Result<Vec<String>, StorageError>;

    /// Location a page with this title is stored at.
    ///
    /// Returns `None` when the title can't be mapped to a location.
    fn location(&self, title: &str) -> Option<PathBuf>;

    /// Check if a page exists.
    ///
    /// Returns `false` on errors (treats errors as "doesn't exist").
    fn exists(&self, title: &str) -> bool;
}
