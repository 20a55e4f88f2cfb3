//! HTTP server.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use panelkit_core::Site;

use crate::error::ApiError;
use crate::router::build_router;

/// Server bind configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Serves a site's compiled routes.
pub struct PanelServer {
    config: ServerConfig,
    site: Arc<Site>,
}

impl PanelServer {
    pub fn new(config: ServerConfig, site: Arc<Site>) -> Self {
        Self { config, site }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Serve until the process is stopped.
    pub async fn run(&self) -> Result<(), ApiError> {
        self.run_until(std::future::pending()).await
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<(), ApiError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = build_router(self.site.clone())?;

        let addr: SocketAddr = self
            .addr()
            .parse()
            .map_err(|_| ApiError::InvalidAddress(self.addr()))?;
        let listener = TcpListener::bind(addr).await?;

        info!("Panel server listening on {}", listener.local_addr()?);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Panel server stopped");
        Ok(())
    }
}
