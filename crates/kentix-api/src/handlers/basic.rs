//! Health check handlers.

use axum::extract::State;
use axum::response::Json;
use serde_json::json;

use super::common::{ok, HandlerResult};
use crate::server::ServerState;

/// Liveness probe.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "kentix",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Health including store reachability and uptime.
pub async fn health_status_handler(State(state): State<ServerState>) -> HandlerResult<serde_json::Value> {
    let uptime = chrono::Utc::now().timestamp() - state.started_at;
    let (store_status, configurations) = match state.store.list_configurations() {
        Ok(configs) => ("ok", configs.len()),
        Err(e) => {
            tracing::warn!(error = %e, "Store unreachable during health check");
            ("error", 0)
        }
    };

    let status = if store_status == "ok" { "healthy" } else { "degraded" };
    ok(json!({
        "status": status,
        "uptime_secs": uptime,
        "store": store_status,
        "configurations": configurations,
    }))
}
