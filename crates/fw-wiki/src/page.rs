//! Wiki pages.
//!
//! A [`Page`] is one article: a [`Title`], the raw body bytes and the
//! location it was last read from or written to.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use fw_storage::{Storage, StorageError};

use crate::link::link_keyword;
use crate::title::Title;

/// Operations link propagation needs from a page.
///
/// [`Page`] is the production implementation; tests substitute pages whose
/// saves fail on demand.
pub trait Linkable {
    /// Page title.
    fn title(&self) -> &Title;

    /// Hyperlink every standalone occurrence of `keyword` in the body.
    fn add_link(&mut self, keyword: &str);

    /// Persist the page body.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the body can't be written.
    fn save(&mut self, storage: &dyn Storage) -> Result<(), StorageError>;
}

/// In-memory representation of one article.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    title: Title,
    location: Option<PathBuf>,
    body: Vec<u8>,
}

impl Page {
    /// Create a page that has not touched storage yet.
    #[must_use]
    pub fn new(title: Title, body: impl Into<Vec<u8>>) -> Self {
        Self {
            title,
            location: None,
            body: body.into(),
        }
    }

    /// Create an empty page, used by the editor for pages that don't exist yet.
    #[must_use]
    pub fn empty(title: Title) -> Self {
        Self::new(title, Vec::new())
    }

    /// Load a page by title.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the page doesn't exist or can't be read.
    pub fn load(storage: &dyn Storage, title: Title) -> Result<Self, StorageError> {
        let body = storage.read(title.as_str())?;
        let location = storage.location(title.as_str());
        Ok(Self {
            title,
            location,
            body,
        })
    }

    /// Page title.
    #[must_use]
    pub fn title(&self) -> &Title {
        &self.title
    }

    /// Location the page was loaded from or saved to.
    #[must_use]
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Replace the body.
    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    /// Write the body verbatim to storage, creating or replacing the page.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the body can't be written.
    pub fn save(&mut self, storage: &dyn Storage) -> Result<(), StorageError> {
        let location = storage.write(self.title.as_str(), &self.body)?;
        self.location = Some(location);
        Ok(())
    }

    /// Hyperlink every standalone occurrence of `keyword` in the body.
    pub fn add_link(&mut self, keyword: &str) {
        let linked = match link_keyword(&self.body, keyword) {
            Cow::Owned(body) => Some(body),
            Cow::Borrowed(_) => None,
        };
        if let Some(body) = linked {
            self.body = body;
        }
    }
}

impl Linkable for Page {
    fn title(&self) -> &Title {
        &self.title
    }

    fn add_link(&mut self, keyword: &str) {
        Page::add_link(self, keyword);
    }

    fn save(&mut self, storage: &dyn Storage) -> Result<(), StorageError> {
        Page::save(self, storage)
    }
}
