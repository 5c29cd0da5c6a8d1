//! Page titles.
//!
//! A [`Title`] is the unique identifier of a page. It doubles as the file
//! stem on disk and as the last URL segment, so it is restricted to ASCII
//! letters and digits.

use std::fmt;
use std::str::FromStr;

/// Error returned when a string is not a valid page title.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TitleError {
    /// Title is empty.
    #[error("title cannot be empty")]
    Empty,
    /// Title contains a character outside `[A-Za-z0-9]`.
    #[error("title contains invalid character {ch:?} at byte {index}")]
    InvalidChar {
        /// Offending character.
        ch: char,
        /// Byte offset of the character.
        index: usize,
    },
}

/// Validated page title.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Title(String);

impl Title {
    /// Parse and validate a title.
    ///
    /// # Errors
    ///
    /// Returns [`TitleError`] if `raw` is empty or contains anything but ASCII
    /// letters and digits.
    pub fn parse(raw: impl Into<String>) -> Result<Self, TitleError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(TitleError::Empty);
        }
        if let Some((index, ch)) = raw.char_indices().find(|(_, c)| !c.is_ascii_alphanumeric()) {
            return Err(TitleError::InvalidChar { ch, index });
        }
        Ok(Self(raw))
    }

    /// Title as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL path of the page view (`/view/<title>`).
    #[must_use]
    pub fn view_path(&self) -> String {
        format!("/view/{}", self.0)
    }

    /// URL path of the page editor (`/edit/<title>`).
    #[must_use]
    pub fn edit_path(&self) -> String {
        format!("/edit/{}", self.0)
    }
}

impl FromStr for Title {
    type Err = TitleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for Title {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Title {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let title = Title::parse("Dumpling42").unwrap();

        assert_eq!(title.as_str(), "Dumpling42");
        assert_eq!(title.to_string(), "Dumpling42");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(Title::parse(""), Err(TitleError::Empty));
    }

    #[test]
    fn test_parse_rejects_separators_and_punctuation() {
        for raw in ["a/b", "../x", "a b", "a.b", "a-b", "a_b", "caf\u{e9}"] {
            assert!(Title::parse(raw).is_err(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn test_parse_reports_offending_char() {
        let err = Title::parse("ab/c").unwrap_err();

        assert_eq!(err, TitleError::InvalidChar { ch: '/', index: 2 });
    }

    #[test]
    fn test_from_str() {
        let title: Title = "Home".parse().unwrap();

        assert_eq!(title, "Home");
    }

    #[test]
    fn test_paths() {
        let title = Title::parse("Home").unwrap();

        assert_eq!(title.view_path(), "/view/Home");
        assert_eq!(title.edit_path(), "/edit/Home");
    }
}
