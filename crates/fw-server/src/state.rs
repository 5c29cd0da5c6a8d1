//! Application state.
//!
//! Shared state for all request handlers.

use std::sync::Arc;

use fw_wiki::Wiki;

use crate::templates::Templates;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Storage plus the shared page collection.
    pub(crate) wiki: Arc<Wiki>,
    /// Compiled HTML templates.
    pub(crate) templates: Templates,
}

impl AppState {
    /// Create state around a loaded wiki.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded templates fail to parse.
    pub(crate) fn new(wiki: Arc<Wiki>) -> Result<Self, minijinja::Error> {
        Ok(Self {
            wiki,
            templates: Templates::new()?,
        })
    }
}
