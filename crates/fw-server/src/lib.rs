//! HTTP server for flatwiki.
//!
//! Serves the wiki over HTML forms using axum:
//! - `GET /view/{title}` renders a page, or redirects to its editor
//! - `GET /edit/{title}` shows the edit form
//! - `POST /save/{title}` saves the page and links its title everywhere
//! - `GET /` lists known pages
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::PathBuf;
//! use fw_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         host: "127.0.0.1".to_string(),
//!         port: 8080,
//!         data_dir: PathBuf::from("data"),
//!         fail_fast: false,
//!     };
//!
//!     run_server(config).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (fw-server)
//!                        │
//!                        ├─► view/edit ──► Storage::read
//!                        │
//!                        └─► save ──► Wiki::save (fw-wiki)
//!                                        │
//!                                        ├─► write saved page
//!                                        └─► link title into every other page
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;
mod templates;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use fw_storage::{FsStorage, Storage};
use fw_wiki::{LoadPolicy, Wiki};
use state::AppState;

pub use error::ServerError;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Directory holding the page files.
    pub data_dir: PathBuf,
    /// Abort startup when a stored page fails to load.
    pub fail_fast: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            data_dir: PathBuf::from("data"),
            fail_fast: false,
        }
    }
}

/// Run the server.
///
/// Loads every stored page, then serves until Ctrl-C.
///
/// # Errors
///
/// Returns an error if pages fail to load or the server fails to start.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let storage: Arc<dyn Storage> = Arc::new(FsStorage::new(config.data_dir.clone()));
    let policy = LoadPolicy::from_fail_fast(config.fail_fast);
    let wiki = Arc::new(Wiki::load(storage, policy)?);

    let state = Arc::new(AppState::new(wiki)?);
    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, data_dir = %config.data_dir.display(), "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from flatwiki config.
#[must_use]
pub fn server_config_from_config(config: &fw_config::Config) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        data_dir: config.storage_resolved.data_dir.clone(),
        fail_fast: config.storage_resolved.fail_fast,
    }
}
