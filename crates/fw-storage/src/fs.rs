//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for keeping one page per `.txt` file in a single
//! data directory.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::storage::{PAGE_EXTENSION, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Permission bits for page files: owner read/write only.
#[cfg(unix)]
const PAGE_MODE: u32 = 0o600;

/// Filesystem storage implementation.
///
/// Each page is stored as `<data_dir>/<title>.txt` containing the raw body
/// bytes. Listing is flat: subdirectories, hidden files and files with other
/// extensions are ignored.
///
/// Writes go to a hidden temporary file in the data directory that is then
/// renamed over the page file, so a concurrent reader sees either the old or
/// the new body.
///
/// # Example
///
/// ```ignore
/// use std::path::PathBuf;
/// use fw_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("data"));
/// let titles = storage.list()?;
/// ```
#[derive(Clone, Debug)]
pub struct FsStorage {
    /// Directory holding the page files.
    data_dir: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `data_dir`.
    ///
    /// The directory is not created; writes into a missing directory fail.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Directory holding the page files.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Validate that a title maps to a single file inside the data directory.
    ///
    /// Rejects empty titles, `.`/`..` and anything containing a path separator,
    /// so a title can never escape the data directory.
    fn validate_title(title: &str) -> Result<(), StorageError> {
        let invalid = title.is_empty()
            || title == "."
            || title == ".."
            || title.contains(['/', '\\', '\0']);

        if invalid {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(title)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    /// Full path of the file backing `title`.
    fn page_path(&self, title: &str) -> PathBuf {
        self.data_dir.join(format!("{title}.{PAGE_EXTENSION}"))
    }

    /// Write `body` to a hidden temporary file in the data directory.
    ///
    /// The file is owner-only on Unix and is renamed over the page file by the
    /// caller, so readers never observe a partially written page.
    fn write_temp(&self, body: &[u8]) -> std::io::Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix(".fw-")
            .suffix(".tmp")
            .tempfile_in(&self.data_dir)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.as_file()
                .set_permissions(fs::Permissions::from_mode(PAGE_MODE))?;
        }

        file.write_all(body)?;
        file.flush()?;
        Ok(file)
    }

    /// Extract the page title from a directory entry name.
    ///
    /// Returns `None` for hidden files and files without the page extension.
    fn title_from_file_name(name: &str) -> Option<&str> {
        if name.starts_with('.') {
            return None;
        }
        name.strip_suffix(PAGE_EXTENSION)
            .and_then(|stem| stem.strip_suffix('.'))
            .filter(|stem| !stem.is_empty())
    }
}

impl Storage for FsStorage {
    fn read(&self, title: &str) -> Result<Vec<u8>, StorageError> {
        Self::validate_title(title)?;
        let full_path = self.page_path(title);
        fs::read(&full_path)
            .map_err(|e| StorageError::io(e, Some(full_path.clone())).with_backend(BACKEND))
    }

    fn write(&self, title: &str, body: &[u8]) -> Result<PathBuf, StorageError> {
        Self::validate_title(title)?;
        let full_path = self.page_path(title);

        let file = self
            .write_temp(body)
            .map_err(|e| StorageError::io(e, Some(full_path.clone())).with_backend(BACKEND))?;
        file.persist(&full_path).map_err(|e| {
            StorageError::io(e.error, Some(full_path.clone())).with_backend(BACKEND)
        })?;

        tracing::debug!(path = %full_path.display(), bytes = body.len(), "Wrote page");
        Ok(full_path)
    }

    fn list(&self) -> Result<Vec<String>, StorageError> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(
                    StorageError::io(e, Some(self.data_dir.clone())).with_backend(BACKEND)
                );
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                StorageError::io(e, Some(self.data_dir.clone())).with_backend(BACKEND)
            })?;

            // Follows symlinks, so linked page files are listed too.
            if !entry.path().is_file() {
                continue;
            }

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                tracing::debug!(name = ?file_name, "Skipping non UTF-8 file name");
                continue;
            };
            names.push(name.to_owned());
        }

        // Listing order is file name order, independent of the OS.
        names.sort();

        Ok(names
            .iter()
            .filter_map(|name| Self::title_from_file_name(name))
            .map(str::to_owned)
            .collect())
    }

    fn location(&self, title: &str) -> Option<PathBuf> {
        Self::validate_title(title).ok()?;
        Some(self.page_path(title))
    }

    fn exists(&self, title: &str) -> bool {
        Self::validate_title(title).is_ok() && self.page_path(title).is_file()
    }
}
