//! Pages, cross-link propagation and shared wiki state for flatwiki.
//!
//! This crate provides:
//! - [`Page`]: one article with save and link-rewrite operations
//! - [`PageCollection`]: ordered pages with best-effort link propagation
//! - [`load_all`]: materialize a collection from a [`Storage`](fw_storage::Storage)
//! - [`Wiki`]: the shared state request handlers operate on
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::PathBuf;
//! use std::sync::Arc;
//! use fw_storage::FsStorage;
//! use fw_wiki::{LoadPolicy, Title, Wiki};
//!
//! let storage = Arc::new(FsStorage::new(PathBuf::from("data")));
//! let wiki = Wiki::load(storage, LoadPolicy::BestEffort)?;
//!
//! let outcome = wiki.save(Title::parse("Dumpling")?, "Steamed, with soup.")?;
//! for err in &outcome.link_errors {
//!     eprintln!("{err}");
//! }
//! # Ok(())
//! # }
//! ```

mod collection;
mod link;
mod loader;
mod page;
mod title;
mod wiki;

pub use collection::{LinkPropagationError, PageCollection};
pub use link::{KeywordLinker, link_keyword};
pub use loader::{LoadError, LoadPolicy, load_all};
pub use page::{Linkable, Page};
pub use title::{Title, TitleError};
pub use wiki::{SaveOutcome, Wiki};
