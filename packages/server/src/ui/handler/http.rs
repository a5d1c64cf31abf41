//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{
    infrastructure::dto::http::{HealthDto, HubStatsDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<HealthDto> {
    Json(HealthDto::ok())
}

/// Current hub membership, as last published by the coordinator
pub async fn hub_stats(State(state): State<Arc<AppState>>) -> Json<HubStatsDto> {
    let snapshot = state.hub.stats();
    Json(HubStatsDto::new(&snapshot, state.started_at))
}
