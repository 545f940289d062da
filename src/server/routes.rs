//! Request handlers

use crate::error::{FolioError, FolioResult};
use crate::portfolio::Portfolio;
use crate::server::AppState;
use axum::{body::Bytes, extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, warn};

/// GET /api/portfolio
pub async fn get_portfolio(State(state): State<AppState>) -> FolioResult<Json<Arc<Portfolio>>> {
    let portfolio = state.cache.get().await.map_err(|e| {
        warn!("Error loading portfolio: {}", e);
        e
    })?;
    Ok(Json(portfolio))
}

/// POST /api/portfolio
pub async fn save_portfolio(
    State(state): State<AppState>,
    body: Bytes,
) -> FolioResult<Json<Value>> {
    let portfolio: Portfolio = serde_json::from_slice(&body)
        .map_err(|e| FolioError::InvalidInput(format!("Invalid JSON: {}", e)))?;

    state.cache.put(portfolio).await.map_err(|e| {
        error!("Error saving portfolio: {}", e);
        e
    })?;

    Ok(Json(json!({ "status": "saved" })))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotInfo>,
}

#[derive(Debug, Serialize)]
pub struct SnapshotInfo {
    pub file: String,
    pub modified: DateTime<Utc>,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.cache.identity().await.map(|id| SnapshotInfo {
        file: id.file.name().to_string(),
        modified: DateTime::<Utc>::from(id.modified),
    });

    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started.elapsed().as_secs(),
        snapshot,
    })
}
