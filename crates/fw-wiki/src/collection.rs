//! Ordered page collection and link propagation.

use fw_storage::{Storage, StorageError};

use crate::page::{Linkable, Page};
use crate::title::Title;

/// A page that failed to persist during link propagation.
#[derive(Debug, thiserror::Error)]
#[error("failed to save page {title} while linking {keyword}: {source}")]
pub struct LinkPropagationError {
    /// Title of the page that failed to save.
    pub title: Title,
    /// Keyword being propagated.
    pub keyword: String,
    /// Underlying storage failure.
    #[source]
    pub source: StorageError,
}

/// Ordered collection of pages.
///
/// Order is the storage listing order at load time. Titles are expected to be
/// unique but this is not enforced; lookups return the first match.
#[derive(Debug)]
pub struct PageCollection<P = Page> {
    pages: Vec<P>,
}

impl<P> Default for PageCollection<P> {
    fn default() -> Self {
        Self { pages: Vec::new() }
    }
}

impl<P: Linkable> PageCollection<P> {
    /// Create an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if the collection has no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Iterate pages in collection order.
    pub fn iter(&self) -> std::slice::Iter<'_, P> {
        self.pages.iter()
    }

    /// Titles in collection order.
    #[must_use]
    pub fn titles(&self) -> Vec<Title> {
        self.pages.iter().map(|p| p.title().clone()).collect()
    }

    /// First page with the given title.
    #[must_use]
    pub fn get(&self, title: &Title) -> Option<&P> {
        self.pages.iter().find(|p| p.title() == title)
    }

    /// Append a page at the end.
    pub fn push(&mut self, page: P) {
        self.pages.push(page);
    }

    /// Replace the first page with the same title in place, or append.
    pub fn upsert(&mut self, page: P) {
        match self.position(page.title()) {
            Some(index) => self.pages[index] = page,
            None => self.pages.push(page),
        }
    }

    /// Remove the first page with the given title.
    ///
    /// Returns the page with its former index.
    pub fn take(&mut self, title: &Title) -> Option<(usize, P)> {
        let index = self.position(title)?;
        Some((index, self.pages.remove(index)))
    }

    /// Insert a page at `index`, clamped to the collection length.
    pub fn insert(&mut self, index: usize, page: P) {
        let index = index.min(self.pages.len());
        self.pages.insert(index, page);
    }

    /// Hyperlink `keyword` in every page and save each one.
    ///
    /// Every page is visited in order, whether or not it contains the keyword.
    /// A failed save is collected and the loop moves on to the next page.
    /// Returns one error per failed save; empty on full success.
    pub fn propagate_link(
        &mut self,
        keyword: &str,
        storage: &dyn Storage,
    ) -> Vec<LinkPropagationError> {
        let mut errors = Vec::new();

        for page in &mut self.pages {
            page.add_link(keyword);
            if let Err(source) = page.save(storage) {
                errors.push(LinkPropagationError {
                    title: page.title().clone(),
                    keyword: keyword.to_owned(),
                    source,
                });
            }
        }

        tracing::debug!(
            keyword,
            pages = self.pages.len(),
            failed = errors.len(),
            "Propagated link"
        );

        errors
    }

    fn position(&self, title: &Title) -> Option<usize> {
        self.pages.iter().position(|p| p.title() == title)
    }
}

impl<'a, P> IntoIterator for &'a PageCollection<P> {
    type Item = &'a P;
    type IntoIter = std::slice::Iter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

impl<P: Linkable> FromIterator<P> for PageCollection<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use fw_storage::{MockStorage, StorageErrorKind};
    use pretty_assertions::assert_eq;

    use super::*;

    fn title(raw: &str) -> Title {
        Title::parse(raw).unwrap()
    }

    /// Page double recording calls and failing saves on demand.
    struct MockPage {
        title: Title,
        fail_save: bool,
        calls: Rc<RefCell<Vec<String>>>,
    }

    impl MockPage {
        fn new(raw: &str, fail_save: bool, calls: &Rc<RefCell<Vec<String>>>) -> Self {
            Self {
                title: title(raw),
                fail_save,
                calls: Rc::clone(calls),
            }
        }
    }

    impl Linkable for MockPage {
        fn title(&self) -> &Title {
            &self.title
        }

        fn add_link(&mut self, keyword: &str) {
            self.calls
                .borrow_mut()
                .push(format!("{}:add_link:{keyword}", self.title));
        }

        fn save(&mut self, _storage: &dyn Storage) -> Result<(), StorageError> {
            self.calls.borrow_mut().push(format!("{}:save", self.title));
            if self.fail_save {
                return Err(StorageError::not_found(format!("{}.txt", self.title)));
            }
            Ok(())
        }
    }

    #[test]
    fn test_propagate_visits_every_page_despite_failures() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut pages: PageCollection<MockPage> = [
            MockPage::new("First", false, &calls),
            MockPage::new("Second", true, &calls),
            MockPage::new("Third", false, &calls),
        ]
        .into_iter()
        .collect();

        let errors = pages.propagate_link("dumpling", &MockStorage::new());

        assert_eq!(
            *calls.borrow(),
            vec![
                "First:add_link:dumpling",
                "First:save",
                "Second:add_link:dumpling",
                "Second:save",
                "Third:add_link:dumpling",
                "Third:save",
            ]
        );
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].title, "Second");
        assert_eq!(errors[0].keyword, "dumpling");
        assert_eq!(errors[0].source.kind(), StorageErrorKind::NotFound);
    }

    #[test]
    fn test_propagate_error_count_matches_failed_saves() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut pages: PageCollection<MockPage> = (0..5)
            .map(|i| MockPage::new(&format!("Page{i}"), i % 2 == 0, &calls))
            .collect();

        let errors = pages.propagate_link("x", &MockStorage::new());

        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_propagate_rewrites_and_saves_pages() {
        let storage = MockStorage::new();
        let mut pages: PageCollection = [
            Page::new(title("A"), "x dumpling y"),
            Page::new(title("B"), "no match"),
        ]
        .into_iter()
        .collect();

        let errors = pages.propagate_link("dumpling", &storage);

        assert!(errors.is_empty());
        assert_eq!(
            storage.body("A").unwrap(),
            br#"x <a href="/view/dumpling">dumpling</a> y"#
        );
        assert_eq!(storage.body("B").unwrap(), b"no match");
        assert_eq!(storage.writes(), vec!["A", "B"]);
    }

    #[test]
    fn test_propagate_collects_storage_failures() {
        let storage = MockStorage::new().with_failing_write("A");
        let mut pages: PageCollection = [
            Page::new(title("A"), "dumpling"),
            Page::new(title("B"), "dumpling"),
        ]
        .into_iter()
        .collect();

        let errors = pages.propagate_link("dumpling", &storage);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].title, "A");
        assert!(errors[0].to_string().contains("failed to save page A"));
        // In-memory body is rewritten even when the save fails.
        assert_eq!(
            pages.get(&title("A")).unwrap().body(),
            br#"<a href="/view/dumpling">dumpling</a>"#
        );
        assert!(storage.body("B").is_some());
    }

    #[test]
    fn test_propagate_on_empty_collection() {
        let mut pages: PageCollection = PageCollection::new();

        assert!(pages.propagate_link("x", &MockStorage::new()).is_empty());
    }

    #[test]
    fn test_get_returns_first_duplicate() {
        let pages: PageCollection = [
            Page::new(title("Dup"), "first"),
            Page::new(title("Dup"), "second"),
        ]
        .into_iter()
        .collect();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages.get(&title("Dup")).unwrap().body(), b"first");
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut pages: PageCollection = [
            Page::new(title("A"), "a"),
            Page::new(title("B"), "b"),
        ]
        .into_iter()
        .collect();

        pages.upsert(Page::new(title("A"), "new a"));
        pages.upsert(Page::new(title("C"), "c"));

        assert_eq!(pages.titles(), vec![title("A"), title("B"), title("C")]);
        assert_eq!(pages.get(&title("A")).unwrap().body(), b"new a");
    }

    #[test]
    fn test_take_and_insert_keep_position() {
        let mut pages: PageCollection = [
            Page::new(title("A"), "a"),
            Page::new(title("B"), "b"),
            Page::new(title("C"), "c"),
        ]
        .into_iter()
        .collect();

        let (index, page) = pages.take(&title("B")).unwrap();
        assert_eq!(index, 1);
        assert_eq!(pages.titles(), vec![title("A"), title("C")]);

        pages.insert(index, page);
        assert_eq!(pages.titles(), vec![title("A"), title("B"), title("C")]);
        assert!(pages.take(&title("Z")).is_none());
    }
}
