//! Liveness endpoint
//!
//! Reports the service identity and whether the fact store is reachable.
//! Kept public so load balancers can probe without a token.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub service: &'static str,
    pub status: &'static str,
    pub version: &'static str,
    pub database: &'static str,
}

/// Report service health, pinging the database
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "reachable",
        Err(_) => "unreachable",
    };

    Json(HealthResponse {
        service: "stockbook",
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        database,
    })
}
