//! Flat-file page storage for flatwiki.
//!
//! This crate provides a [`Storage`] trait for abstracting where page bodies
//! live. Every page is one blob keyed by its title; the production backend
//! keeps each blob in `<data_dir>/<title>.txt`.
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `read()`, `write()`, `list()` and `exists()` methods
//! - [`FsStorage`] implementation for a directory of `.txt` files
//! - [`MockStorage`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use fw_storage::{FsStorage, Storage};
//!
//! let storage = FsStorage::new(PathBuf::from("data"));
//! storage.write("Home", b"Welcome")?;
//! for title in storage.list()? {
//!     println!("{title}");
//! }
//! ```

mod fs;
#[cfg(feature = "mock")]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(feature = "mock")]
pub use mock::MockStorage;
pub use storage::{PAGE_EXTENSION, Storage, StorageError, StorageErrorKind};
