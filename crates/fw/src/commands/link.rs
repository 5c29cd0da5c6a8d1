//! `fw link` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use fw_config::{CliSettings, Config};
use fw_storage::{FsStorage, Storage};
use fw_wiki::{LinkPropagationError, LoadPolicy, Title, Wiki};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the link command.
#[derive(Args)]
pub(crate) struct LinkArgs {
    /// Title to hyperlink wherever it appears.
    title: String,

    /// Path to configuration file (default: auto-discover flatwiki.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the page files (overrides config).
    #[arg(short, long, env = "FLATWIKI_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Abort if any stored page fails to load.
    #[arg(long)]
    fail_fast: bool,
}

impl LinkArgs {
    /// Execute the link command.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or any page fails to save.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let title = Title::parse(&self.title)?;

        let cli_settings = CliSettings {
            data_dir: self.data_dir,
            fail_fast: self.fail_fast.then_some(true),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let errors = link_title(&config, &title)?;
        for err in &errors {
            output.warning(&err.to_string());
        }

        if !errors.is_empty() {
            return Err(CliError::Link {
                title: title.to_string(),
                failed: errors.len(),
            });
        }

        output.success(&format!("Linked {title}"));
        Ok(())
    }
}

/// Load the stored pages and link `title` across all of them.
fn link_title(config: &Config, title: &Title) -> Result<Vec<LinkPropagationError>, CliError> {
    let storage: Arc<dyn Storage> =
        Arc::new(FsStorage::new(config.storage_resolved.data_dir.clone()));
    let policy = LoadPolicy::from_fail_fast(config.storage_resolved.fail_fast);
    let wiki = Wiki::load(storage, policy)?;
    Ok(wiki.propagate(title))
}
