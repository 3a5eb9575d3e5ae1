//! Web server module.

mod handlers;

pub use handlers::*;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::registry::Target;
use crate::store::ResultStore;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: ResultStore,
    pub targets: Arc<RwLock<Vec<Target>>>,
    pub requests_path: PathBuf,
}

/// The status web server.
pub struct Server {
    site: SiteConfig,
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(site: SiteConfig, state: AppState) -> Self {
        Self { site, state }
    }

    /// Build the router with all routes.
    fn routes(&self) -> Router {
        Router::new()
            .route("/status", get(handlers::handle_status))
            .route("/reload", get(handlers::handle_reload))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the server on the configured address.
    ///
    /// Runs until the process is terminated.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let router = self.routes();

        let listener =
            tokio::net::TcpListener::bind((self.site.host.as_str(), self.site.port)).await?;
        tracing::info!("Web server listening on {}:{}", self.site.host, self.site.port);

        axum::serve(listener, router).await?;

        Ok(())
    }
}
