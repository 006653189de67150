//! # packhub Server
//!
//! Reference host for the packhub manifest integration, built on `Axum`.
//! Serves bundle directories as static routes and exposes resolved bundles as JSON
//! and as ready-to-embed HTML tags.
//!
//! ## Example
//! ```no_run
//! use packhub_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(6543)
//!         .build()?
//!         .run()
//!         .await
//! }
//! ```

mod error;
mod handlers;
pub mod mount;
mod router;
mod state;

pub use crate::error::ApiError;
pub use crate::state::{AppState, AppStateInner};

use crate::mount::MountTable;
use anyhow::{Context, Result};
use axum::Router;
use axum_server::Handle;
use packhub::domain::config::AppConfig;
use packhub::kernel::settings::{FlatSettings, SettingsSource};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
pub struct ServerBuilder {
    cfg: AppConfig,
    settings: Box<dyn SettingsSource>,
}

impl std::fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBuilder").field("cfg", &self.cfg).finish_non_exhaustive()
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self { cfg: AppConfig::default(), settings: Box::new(FlatSettings::new()) }
    }
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: AppConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Source of the `webpack.*` settings.
    pub fn settings(mut self, settings: impl SettingsSource + 'static) -> Self {
        self.settings = Box::new(settings);
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Consumes the builder and initializes the server.
    ///
    /// # Process
    /// 1. Resolves every webpack configuration into the registry
    /// 2. Registers a static mount per configuration with `static_view` enabled
    /// 3. Constructs application state
    ///
    /// # Errors
    /// Returns an error if:
    /// * A `webpack.*` setting is invalid or an ignore rule does not compile
    /// * A bundle directory belongs to an unregistered package
    pub fn build(self) -> Result<Server> {
        let registry = packhub::init(self.settings.as_ref(), &self.cfg.assets)
            .context("Failed to resolve webpack configurations")?;
        let roots = packhub::package_roots(&self.cfg.assets);
        let mounts = MountTable::from_registry(&registry, &roots, &self.cfg.server.base_url)
            .context("Failed to register static views")?;

        info!(configs = registry.len(), mounts = mounts.iter().count(), "Initializing server");

        Ok(Server { state: AppState::new(self.cfg, registry, mounts) })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: AppState,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// The complete application router (also used by tests).
    #[must_use]
    pub fn router(&self) -> Router {
        router::init(self.state.clone())
    }

    /// Starts the server and runs until the shutdown signal is received.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the configured address.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);
        let app = self.router();

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(std::time::Duration::from_secs(30)));
        });

        info!("Starting HTTP server on http://{address}");

        axum_server::bind(address)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("HTTP server failed")?;

        info!("Server shutdown complete");
        Ok(())
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }
}

/// Listens for shutdown signals (Ctrl+C, SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => {
            res.context("Ctrl+C signal received")?;
        },
        res = terminate => {
            res.context("SIGTERM signal received")?;
        },
    }

    Ok(())
}
