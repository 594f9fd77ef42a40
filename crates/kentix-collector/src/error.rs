//! Engine error types.

use kentix_core::StoreError;
use kentix_devices::DeviceError;
use thiserror::Error;

use crate::platform::PlatformError;

/// Errors surfaced by the scheduler and collection cycles.
///
/// Only `ConfigLoad` aborts a tick. Everything else is scoped to one
/// configuration or one envelope and is logged where handled. Asset
/// resolution failures stay [`ResolveError`](crate::ResolveError)s.
#[derive(Debug, Error)]
pub enum CollectorError {
    #[error("Loading configurations failed: {0}")]
    ConfigLoad(#[source] StoreError),

    #[error("Updating active state of configuration {config_id} failed: {source}")]
    LifecycleWrite {
        config_id: i64,
        #[source]
        source: StoreError,
    },

    #[error("Deactivating all configurations failed: {0}")]
    DeactivateAll(#[source] StoreError),

    #[error("Fetching from gateway of configuration {config_id} failed: {source}")]
    DeviceFetch {
        config_id: i64,
        #[source]
        source: DeviceError,
    },

    #[error("Forwarding telemetry for asset {asset_id} failed: {source}")]
    TelemetryForward {
        asset_id: i32,
        #[source]
        source: PlatformError,
    },
}
