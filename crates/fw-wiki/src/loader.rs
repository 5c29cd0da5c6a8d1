//! Loading a [`PageCollection`] from storage.

use fw_storage::{Storage, StorageError};

use crate::collection::PageCollection;
use crate::page::Page;
use crate::title::{Title, TitleError};

/// What to do when a single page fails to load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadPolicy {
    /// Log a warning, drop the page and keep loading.
    #[default]
    BestEffort,
    /// Abort on the first failure.
    FailFast,
}

impl LoadPolicy {
    /// Policy for a `fail_fast` flag.
    #[must_use]
    pub fn from_fail_fast(fail_fast: bool) -> Self {
        if fail_fast {
            Self::FailFast
        } else {
            Self::BestEffort
        }
    }
}

/// Error returned when loading pages fails.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Stored page name is not a valid title.
    #[error("invalid page name {name:?}: {source}")]
    InvalidTitle {
        /// Name as listed by storage.
        name: String,
        /// Validation failure.
        #[source]
        source: TitleError,
    },
    /// Listing or reading storage failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Load every stored page, in storage listing order.
///
/// # Errors
///
/// Returns [`LoadError::Storage`] if storage can't be listed. Per-page
/// failures are returned only under [`LoadPolicy::FailFast`].
pub fn load_all(storage: &dyn Storage, policy: LoadPolicy) -> Result<PageCollection, LoadError> {
    let names = storage.list()?;
    let mut pages = PageCollection::new();

    for name in names {
        match load_one(storage, &name) {
            Ok(page) => pages.push(page),
            Err(err) => match policy {
                LoadPolicy::FailFast => return Err(err),
                LoadPolicy::BestEffort => {
                    tracing::warn!(name = %name, error = %err, "Skipping page that failed to load");
                }
            },
        }
    }

    tracing::info!(pages = pages.len(), "Loaded pages");
    Ok(pages)
}

fn load_one(storage: &dyn Storage, name: &str) -> Result<Page, LoadError> {
    let title = Title::parse(name).map_err(|source| LoadError::InvalidTitle {
        name: name.to_owned(),
        source,
    })?;
    Ok(Page::load(storage, title)?)
}
