//! Configuration CRUD handlers.
//!
//! Configurations are created and updated here but never deleted. The
//! `active` flag belongs to the lifecycle manager: create leaves it unset
//! and update carries over the stored value.

use axum::extract::{Path, State};
use axum::response::Json;
use kentix_core::{AssetMapping, Configuration};

use super::common::{extract_path, ok, HandlerResult};
use crate::models::ErrorResponse;
use crate::server::ServerState;
use crate::validator::Validate;

/// List all configurations.
///
/// GET /v1/configs
pub async fn list_configs_handler(
    State(state): State<ServerState>,
) -> HandlerResult<Vec<Configuration>> {
    let configs = state.store.list_configurations().map_err(|e| {
        tracing::error!(error = %e, "Failed to list configurations");
        ErrorResponse::from(e)
    })?;
    ok(configs)
}

/// Get one configuration.
///
/// GET /v1/configs/:id
pub async fn get_config_handler(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> HandlerResult<Configuration> {
    let id = extract_path::<i64>(&id)?;
    let config = state
        .store
        .get_configuration(id)?
        .ok_or_else(|| ErrorResponse::not_found(format!("Configuration {}", id)))?;
    ok(config)
}

/// Create a configuration. The store assigns the identifier.
///
/// POST /v1/configs
pub async fn create_config_handler(
    State(state): State<ServerState>,
    Json(mut config): Json<Configuration>,
) -> HandlerResult<Configuration> {
    config.validate()?;
    config.id = None;
    config.active = None;

    let stored = state.store.insert_configuration(config).map_err(|e| {
        tracing::error!(error = %e, "Failed to create configuration");
        ErrorResponse::from(e)
    })?;
    tracing::info!(
        config_id = ?stored.id,
        address = %stored.address,
        "Configuration created"
    );
    ok(stored)
}

/// Replace a configuration. The path identifier wins over any body identifier.
///
/// PUT /v1/configs/:id
pub async fn update_config_handler(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(mut config): Json<Configuration>,
) -> HandlerResult<Configuration> {
    let id = extract_path::<i64>(&id)?;
    config.validate()?;

    config.id = Some(id);
    if !state.store.update_configuration(&config)? {
        return Err(ErrorResponse::not_found(format!("Configuration {}", id)));
    }

    // Reply with the row as stored, including the scheduler's active flag.
    let stored = state
        .store
        .get_configuration(id)?
        .ok_or_else(|| ErrorResponse::not_found(format!("Configuration {}", id)))?;
    tracing::info!(config_id = id, enable = ?stored.enable, "Configuration updated");
    ok(stored)
}

/// List the device→asset mappings owned by a configuration.
///
/// GET /v1/configs/:id/sensors
pub async fn list_sensors_handler(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> HandlerResult<Vec<AssetMapping>> {
    let id = extract_path::<i64>(&id)?;
    if state.store.get_configuration(id)?.is_none() {
        return Err(ErrorResponse::not_found(format!("Configuration {}", id)));
    }
    ok(state.store.list_asset_mappings(id)?)
}
