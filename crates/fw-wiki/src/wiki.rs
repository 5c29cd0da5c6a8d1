//! Shared wiki state.
//!
//! [`Wiki`] owns the storage backend and the process-wide [`PageCollection`]
//! used for link propagation. It is shared by every request handler.
//!
//! # Thread Safety
//!
//! The collection sits behind a `Mutex` held for the whole save sequence:
//! writing the saved page, propagating its title and re-inserting it. Saves
//! are therefore serialized and propagation writes never interleave. Reads
//! (`view`, `edit`) go straight to storage and take no lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fw_storage::{Storage, StorageError};

use crate::collection::{LinkPropagationError, PageCollection};
use crate::loader::{LoadError, LoadPolicy, load_all};
use crate::page::Page;
use crate::title::Title;

/// Result of a successful save.
#[derive(Debug)]
pub struct SaveOutcome {
    /// The saved page.
    pub page: Page,
    /// Pages that failed to persist while linking the saved title.
    pub link_errors: Vec<LinkPropagationError>,
}

/// Storage plus the shared page collection.
pub struct Wiki {
    storage: Arc<dyn Storage>,
    pages: Mutex<PageCollection>,
}

impl Wiki {
    /// Create a wiki from an already loaded collection.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, pages: PageCollection) -> Self {
        Self {
            storage,
            pages: Mutex::new(pages),
        }
    }

    /// Load every stored page and build the wiki.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] if storage can't be listed, or if a page fails to
    /// load under [`LoadPolicy::FailFast`].
    pub fn load(storage: Arc<dyn Storage>, policy: LoadPolicy) -> Result<Self, LoadError> {
        let pages = load_all(storage.as_ref(), policy)?;
        Ok(Self::new(storage, pages))
    }

    /// Storage backend.
    #[must_use]
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Load a page for display.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the page doesn't exist or can't be read.
    pub fn view(&self, title: &Title) -> Result<Page, StorageError> {
        Page::load(self.storage(), title.clone())
    }

    /// Load a page for editing, falling back to an empty page.
    #[must_use]
    pub fn edit(&self, title: &Title) -> Page {
        self.view(title).unwrap_or_else(|err| {
            tracing::debug!(title = %title, error = %err, "Editing new page");
            Page::empty(title.clone())
        })
    }

    /// Save a page and hyperlink its title across every other known page.
    ///
    /// The saved page replaces any same-titled entry of the collection (at the
    /// same position), or is appended. Link failures are logged and returned
    /// in the outcome; they never fail the save.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the page itself can't be written. The
    /// collection is left untouched in that case.
    pub fn save(&self, title: Title, body: impl Into<Vec<u8>>) -> Result<SaveOutcome, StorageError> {
        let mut page = Page::new(title, body);
        let mut pages = self.lock_pages();

        page.save(self.storage())?;

        let previous = pages.take(page.title());
        let link_errors = pages.propagate_link(page.title().as_str(), self.storage());
        for err in &link_errors {
            tracing::error!(title = %err.title, keyword = %err.keyword, error = %err.source, "Failed to save linked page");
        }

        match previous {
            Some((index, _)) => pages.insert(index, page.clone()),
            None => pages.push(page.clone()),
        }

        tracing::info!(title = %page.title(), linked_failures = link_errors.len(), "Saved page");
        Ok(SaveOutcome { page, link_errors })
    }

    /// Hyperlink `keyword` across every known page.
    ///
    /// Unlike [`Wiki::save`], the page named `keyword` (if any) is included.
    pub fn propagate(&self, keyword: &Title) -> Vec<LinkPropagationError> {
        let mut pages = self.lock_pages();
        pages.propagate_link(keyword.as_str(), self.storage())
    }

    /// Titles of every known page, in collection order.
    #[must_use]
    pub fn titles(&self) -> Vec<Title> {
        self.lock_pages().titles()
    }

    /// Snapshot of a page as held by the collection.
    #[must_use]
    pub fn cached(&self, title: &Title) -> Option<Page> {
        self.lock_pages().get(title).cloned()
    }

    /// Lock the collection, recovering from a poisoned lock.
    ///
    /// A panic mid-propagation leaves every page individually consistent, so
    /// the data is still usable.
    fn lock_pages(&self) -> MutexGuard<'_, PageCollection> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    static_assertions::assert_impl_all!(super::Wiki: Send, Sync);

    use fw_storage::{FsStorage, MockStorage, StorageErrorKind};
    use pretty_assertions::assert_eq;

    use super::*;

    fn title(raw: &str) -> Title {
        Title::parse(raw).unwrap()
    }

    fn mock_wiki(storage: MockStorage) -> (Arc<MockStorage>, Wiki) {
        let storage = Arc::new(storage);
        let wiki = Wiki::load(
            Arc::clone(&storage) as Arc<dyn Storage>,
            LoadPolicy::FailFast,
        )
        .unwrap();
        (storage, wiki)
    }

    #[test]
    fn test_save_links_title_in_other_pages() {
        let (storage, wiki) = mock_wiki(
            MockStorage::new()
                .with_page("A", "x dumpling y")
                .with_page("B", "no match"),
        );

        let outcome = wiki.save(title("dumpling"), "Steamed.").unwrap();

        assert!(outcome.link_errors.is_empty());
        assert_eq!(storage.body("dumpling").unwrap(), b"Steamed.");
        assert_eq!(
            storage.body("A").unwrap(),
            br#"x <a href="/view/dumpling">dumpling</a> y"#
        );
        assert_eq!(storage.body("B").unwrap(), b"no match");
    }

    #[test]
    fn test_save_adds_new_page_to_collection() {
        let (_storage, wiki) = mock_wiki(MockStorage::new().with_page("A", "a"));

        wiki.save(title("B"), "b").unwrap();

        assert_eq!(wiki.titles(), vec![title("A"), title("B")]);
    }

    #[test]
    fn test_new_page_receives_later_links() {
        let (storage, wiki) = mock_wiki(MockStorage::new());

        wiki.save(title("Soup"), "goes with Bread").unwrap();
        wiki.save(title("Bread"), "crusty").unwrap();

        assert_eq!(
            storage.body("Soup").unwrap(),
            br#"goes with <a href="/view/Bread">Bread</a>"#
        );
    }

    #[test]
    fn test_resave_does_not_restore_stale_body() {
        let (storage, wiki) = mock_wiki(MockStorage::new().with_page("A", "old"));

        wiki.save(title("A"), "new A").unwrap();

        assert_eq!(storage.body("A").unwrap(), b"new A");
        assert_eq!(wiki.titles(), vec![title("A")]);
        assert_eq!(wiki.cached(&title("A")).unwrap().body(), b"new A");
    }

    #[test]
    fn test_resave_keeps_collection_position() {
        let (_storage, wiki) = mock_wiki(
            MockStorage::new()
                .with_page("A", "a")
                .with_page("B", "b")
                .with_page("C", "c"),
        );

        wiki.save(title("B"), "new b").unwrap();

        assert_eq!(wiki.titles(), vec![title("A"), title("B"), title("C")]);
    }

    #[test]
    fn test_save_does_not_link_page_to_itself() {
        let (storage, wiki) = mock_wiki(MockStorage::new());

        wiki.save(title("Home"), "Home sweet Home").unwrap();

        assert_eq!(storage.body("Home").unwrap(), b"Home sweet Home");
    }

    #[test]
    fn test_save_failure_leaves_collection_untouched() {
        let (storage, wiki) = mock_wiki(
            MockStorage::new()
                .with_page("A", "Locked here")
                .with_failing_write("Locked"),
        );

        let err = wiki.save(title("Locked"), "body").unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::PermissionDenied);
        assert_eq!(wiki.titles(), vec![title("A")]);
        assert_eq!(storage.body("A").unwrap(), b"Locked here");
    }

    #[test]
    fn test_link_failures_do_not_fail_save() {
        let (_storage, wiki) = mock_wiki(
            MockStorage::new()
                .with_page("A", "Pie")
                .with_page("B", "Pie")
                .with_failing_write("A"),
        );

        let outcome = wiki.save(title("Pie"), "Apple").unwrap();

        assert_eq!(outcome.link_errors.len(), 1);
        assert_eq!(outcome.link_errors[0].title, "A");
    }

    #[test]
    fn test_view_and_edit() {
        let (_storage, wiki) = mock_wiki(MockStorage::new().with_page("Home", "Welcome"));

        assert_eq!(wiki.view(&title("Home")).unwrap().body(), b"Welcome");
        assert!(wiki.view(&title("Away")).is_err());

        let fresh = wiki.edit(&title("Away"));
        assert_eq!(fresh.title(), &title("Away"));
        assert!(fresh.body().is_empty());
    }

    #[test]
    fn test_propagate_includes_every_page() {
        let (storage, wiki) = mock_wiki(
            MockStorage::new()
                .with_page("Tea", "Tea time")
                .with_page("Cake", "with Tea"),
        );

        let errors = wiki.propagate(&title("Tea"));

        assert!(errors.is_empty());
        assert_eq!(
            storage.body("Cake").unwrap(),
            br#"with <a href="/view/Tea">Tea</a>"#
        );
        assert_eq!(
            storage.body("Tea").unwrap(),
            br#"<a href="/view/Tea">Tea</a> time"#
        );
    }

    fn anchor(title: &str) -> String {
        format!(r#"<a href="/view/{title}">{title}</a>"#)
    }

    #[test]
    fn test_concurrent_saves_are_serialized() {
        const TITLES: [&str; 6] = ["Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta"];
        let (storage, wiki) = mock_wiki(
            MockStorage::new().with_page("Index", TITLES.join(" and ")),
        );

        std::thread::scope(|scope| {
            for name in TITLES {
                let wiki = &wiki;
                scope.spawn(move || {
                    let others: Vec<_> = TITLES.iter().filter(|t| **t != name).copied().collect();
                    wiki.save(title(name), format!("see {}", others.join(" and ")))
                        .unwrap();
                });
            }
        });

        let index = String::from_utf8(storage.body("Index").unwrap()).unwrap();
        for name in TITLES {
            assert_eq!(index.matches(&anchor(name)).count(), 1, "{name} in Index");
        }

        // Saves happen in some total order: of two pages, exactly the one saved
        // first ends up linking the other.
        for (i, a) in TITLES.iter().enumerate() {
            for b in &TITLES[i + 1..] {
                let body_a = String::from_utf8(storage.body(a).unwrap()).unwrap();
                let body_b = String::from_utf8(storage.body(b).unwrap()).unwrap();
                let a_links_b = body_a.matches(&anchor(b)).count();
                let b_links_a = body_b.matches(&anchor(a)).count();
                assert_eq!(a_links_b + b_links_a, 1, "{a} and {b}");
            }
        }

        let mut titles = wiki.titles();
        titles.sort();
        let mut expected: Vec<_> = TITLES.iter().chain(&["Index"]).map(|t| title(t)).collect();
        expected.sort();
        assert_eq!(titles, expected);
    }

    #[test]
    fn test_save_on_filesystem() {
        let temp_dir = tempfile::tempdir().unwrap();
        std::fs::write(temp_dir.path().join("A.txt"), "x dumpling y").unwrap();
        let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(temp_dir.path().to_path_buf()));
        let wiki = Wiki::load(storage, LoadPolicy::FailFast).unwrap();

        wiki.save(title("dumpling"), "Steamed.").unwrap();

        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("A.txt")).unwrap(),
            r#"x <a href="/view/dumpling">dumpling</a> y"#
        );
        assert_eq!(
            std::fs::read_to_string(temp_dir.path().join("dumpling.txt")).unwrap(),
            "Steamed."
        );
    }
}
