//! Router configuration.

use axum::routing::get;
use axum::Router;

use super::types::{ServerState, MAX_REQUEST_BODY_SIZE};
use crate::handlers::{basic, configs};

/// Build the API router over the given state.
pub fn create_router_with_state(state: ServerState) -> Router {
    Router::new()
        .route("/api/health", get(basic::health_handler))
        .route("/api/health/status", get(basic::health_status_handler))
        .route(
            "/v1/configs",
            get(configs::list_configs_handler).post(configs::create_config_handler),
        )
        .route(
            "/v1/configs/:id",
            get(configs::get_config_handler).put(configs::update_config_handler),
        )
        .route("/v1/configs/:id/sensors", get(configs::list_sensors_handler))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(tower_http::limit::RequestBodyLimitLayer::new(
            MAX_REQUEST_BODY_SIZE,
        ))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        .with_state(state)
}
