//! `fw serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use fw_config::{CliSettings, Config};
use fw_server::{run_server, server_config_from_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover flatwiki.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the page files (overrides config).
    #[arg(short, long, env = "FLATWIKI_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Refuse to start if any stored page fails to load.
    #[arg(long)]
    fail_fast: bool,

    /// Enable verbose output (request and save logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            data_dir: self.data_dir,
            fail_fast: self.fail_fast.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        std::fs::create_dir_all(&config.storage_resolved.data_dir)?;

        output.info(&format!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        ));
        output.info(&format!(
            "Data directory: {}",
            config.storage_resolved.data_dir.display()
        ));

        run_server(server_config_from_config(&config))
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
