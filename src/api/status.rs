/// Liveness and record-count endpoints
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::server::AppState;
use crate::error::Result;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub db: bool,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsResponse {
    pub users: u64,
}

/// GET /status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        db: state.store.is_alive().await,
    })
}

/// GET /stats
pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>> {
    let users = state.store.count().await?;
    Ok(Json(StatsResponse { users }))
}
