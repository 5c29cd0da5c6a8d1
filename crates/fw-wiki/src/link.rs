//! Keyword hyperlinking.
//!
//! Rewrites standalone occurrences of a keyword in a page body into
//! `<a href="/view/<keyword>"><keyword></a>` anchors.
//!
//! # Boundary Rule
//!
//! An occurrence is standalone when
//! - the byte before it is absent or not one of `[A-Za-z0-9_<>/]`,
//! - the byte after it is absent or not one of `[A-Za-z0-9_<>]`, and
//! - it is not inside a tag: the nearest `<` or `>` before it, if any, is `>`.
//!
//! Boundary bytes are never consumed. The keyword occurrences inside an
//! inserted anchor sit inside the tag or right after `>`, so linking twice with
//! the same keyword leaves the body unchanged. Existing markup is never
//! rewritten.

use std::borrow::Cow;

use regex::bytes::Regex;

/// Compiled keyword linker.
#[derive(Debug, Clone)]
pub struct KeywordLinker {
    pattern: Regex,
    anchor: Vec<u8>,
}

impl KeywordLinker {
    /// Build a linker for `keyword`.
    ///
    /// Returns `None` for an empty keyword, which would match everywhere.
    #[must_use]
    pub fn new(keyword: &str) -> Option<Self> {
        if keyword.is_empty() {
            return None;
        }
        // An escaped literal always compiles.
        let pattern = Regex::new(&regex::escape(keyword)).ok()?;
        let anchor = format!(r#"<a href="/view/{keyword}">{keyword}</a>"#).into_bytes();
        Some(Self { pattern, anchor })
    }

    /// Rewrite every standalone occurrence of the keyword in `body`.
    ///
    /// Returns `Cow::Borrowed` when nothing matched.
    #[must_use]
    pub fn apply<'a>(&self, body: &'a [u8]) -> Cow<'a, [u8]> {
        let mut out: Option<Vec<u8>> = None;
        let mut last = 0;

        for m in self.pattern.find_iter(body) {
            if !is_standalone(body, m.start(), m.end()) {
                continue;
            }
            let buf = out.get_or_insert_with(|| Vec::with_capacity(body.len() + self.anchor.len()));
            buf.extend_from_slice(&body[last..m.start()]);
            buf.extend_from_slice(&self.anchor);
            last = m.end();
        }

        match out {
            Some(mut buf) => {
                buf.extend_from_slice(&body[last..]);
                Cow::Owned(buf)
            }
            None => Cow::Borrowed(body),
        }
    }
}

/// Check the bytes around `body[start..end]` against the boundary rule.
fn is_standalone(body: &[u8], start: usize, end: usize) -> bool {
    let before_ok = start
        .checked_sub(1)
        .and_then(|i| body.get(i))
        .is_none_or(|&b| !is_word_byte(b) && !matches!(b, b'<' | b'>' | b'/'));
    let after_ok = body
        .get(end)
        .is_none_or(|&b| !is_word_byte(b) && b != b'<' && b != b'>');
    before_ok && after_ok && !inside_tag(&body[..start])
}

/// Whether the text following `before` is inside an unclosed `<...` tag.
fn inside_tag(before: &[u8]) -> bool {
    before
        .iter()
        .rposition(|&b| b == b'<' || b == b'>')
        .is_some_and(|i| before[i] == b'<')
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Rewrite every standalone occurrence of `keyword` in `body`.
///
/// Convenience wrapper around [`KeywordLinker`] for one-off calls.
#[must_use]
pub fn link_keyword<'a>(body: &'a [u8], keyword: &str) -> Cow<'a, [u8]> {
    match KeywordLinker::new(keyword) {
        Some(linker) => linker.apply(body),
        None => Cow::Borrowed(body),
    }
}
