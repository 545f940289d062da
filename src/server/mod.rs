//! HTTP front end for the portfolio document
//!
//! Routes:
//! - `GET /api/portfolio` - current document through the freshness cache
//! - `POST /api/portfolio` - persist a new document
//! - `GET /health` - liveness plus the identity of the cached snapshot
//! - `/static/*` and `/` - optional static assets

mod error;
mod routes;

pub use error::ErrorBody;
pub use routes::{HealthResponse, SnapshotInfo};

use crate::cache::FreshnessCache;
use crate::config::{Config, ConfigManager};
use crate::error::{FolioError, FolioResult};
use crate::portfolio::Portfolio;
use crate::store::FsDocumentStore;
use axum::{routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Cache type served by the binary
pub type PortfolioCache = FreshnessCache<FsDocumentStore, Portfolio>;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<PortfolioCache>,
    pub started: Instant,
}

impl AppState {
    pub fn new(cache: PortfolioCache) -> Self {
        Self {
            cache: Arc::new(cache),
            started: Instant::now(),
        }
    }
}

/// Build the application router
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let mut app = Router::new()
        .route(
            "/api/portfolio",
            get(routes::get_portfolio).post(routes::save_portfolio),
        )
        .route("/health", get(routes::health))
        .with_state(state);

    if let Some(dir) = static_dir {
        app = app
            .nest_service("/static", ServeDir::new(dir))
            .route_service("/", ServeFile::new(dir.join("index.html")));
    }

    app.layer(TraceLayer::new_for_http())
}

/// Run the server until Ctrl-C
pub async fn serve(config: &Config) -> FolioResult<()> {
    ConfigManager::ensure_data_dir(&config.store).await?;

    let store = FsDocumentStore::new(&config.store);
    let state = AppState::new(FreshnessCache::new(store));
    let app = router(state, config.server.static_dir.as_deref());

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .map_err(|e| FolioError::Bind {
            addr: config.server.bind.clone(),
            source: e,
        })?;
    let addr = listener
        .local_addr()
        .map_err(|e| FolioError::io("reading listener address", e))?;

    info!(
        %addr,
        data_dir = %config.store.data_dir.display(),
        "Serving portfolio"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| FolioError::Server(e.to_string()))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
