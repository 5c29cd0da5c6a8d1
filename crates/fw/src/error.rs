//! CLI error types.

use fw_config::ConfigError;
use fw_wiki::{LoadError, TitleError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("Invalid title: {0}")]
    Title(#[from] TitleError),

    #[error("{0}")]
    Server(String),

    #[error("{failed} page(s) failed to save while linking {title}")]
    Link { title: String, failed: usize },
}
