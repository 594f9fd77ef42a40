//! Device to platform asset resolution.
//!
//! A device is identified by (configuration, project, serial). The first
//! resolution of a triple creates the asset on the platform and stores the
//! mapping; every later resolution is answered from the store without a
//! platform call.

use std::fmt;
use std::sync::Arc;

use kentix_core::{AssetMapping, AssetSpec, ConfigStore, StoreError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::platform::{AssetPlatform, PlatformError};

/// Identity of a device within one configuration and project.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceKey {
    pub configuration_id: i64,
    pub project_id: String,
    pub serial: String,
}

impl DeviceKey {
    pub fn new(configuration_id: i64, project_id: &str, serial: &str) -> Self {
        Self {
            configuration_id,
            project_id: project_id.to_string(),
            serial: serial.to_string(),
        }
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "configuration {}, project {}, serial '{}'",
            self.configuration_id, self.project_id, self.serial
        )
    }
}

/// Asset resolution errors.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Looking up asset for {key} failed: {source}")]
    Lookup {
        key: DeviceKey,
        #[source]
        source: StoreError,
    },

    #[error("Creating asset for {key} failed: {source}")]
    Create {
        key: DeviceKey,
        #[source]
        source: PlatformError,
    },

    #[error("Platform returned no asset id for {key}")]
    EmptyIdentifier { key: DeviceKey },

    #[error("Persisting asset {asset_id} for {key} failed: {source}")]
    Persist {
        key: DeviceKey,
        asset_id: i32,
        #[source]
        source: StoreError,
    },
}

impl ResolveError {
    pub fn key(&self) -> &DeviceKey {
        match self {
            Self::Lookup { key, .. }
            | Self::Create { key, .. }
            | Self::EmptyIdentifier { key }
            | Self::Persist { key, .. } => key,
        }
    }
}

/// How a device appears on the platform when its asset is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetDisplay {
    pub name: String,
    pub description: String,
    pub asset_type: String,
    /// Locational parent, for devices nested under a gateway.
    pub parent_id: Option<i32>,
}

/// Resolves devices to asset identifiers, creating assets on first sight.
#[derive(Clone)]
pub struct AssetResolver {
    store: Arc<dyn ConfigStore>,
    platform: Arc<dyn AssetPlatform>,
}

impl AssetResolver {
    pub fn new(store: Arc<dyn ConfigStore>, platform: Arc<dyn AssetPlatform>) -> Self {
        Self { store, platform }
    }

    /// Return the asset of a device, creating it if no mapping exists.
    ///
    /// The mapping is persisted before the identifier is returned. If a
    /// concurrent writer stored a mapping first, its identifier wins.
    pub async fn resolve_or_create(
        &self,
        configuration_id: i64,
        project_id: &str,
        serial: &str,
        display: &AssetDisplay,
    ) -> Result<i32, ResolveError> {
        let key = DeviceKey::new(configuration_id, project_id, serial);

        let existing = self
            .store
            .find_asset_mapping(configuration_id, project_id, serial)
            .map_err(|source| ResolveError::Lookup {
                key: key.clone(),
                source,
            })?;
        if let Some(mapping) = existing {
            debug!(
                config_id = configuration_id,
                project_id,
                serial,
                asset_id = mapping.asset_id,
                "Asset already known"
            );
            return Ok(mapping.asset_id);
        }

        let spec = AssetSpec {
            project_id: project_id.to_string(),
            global_asset_identifier: global_asset_identifier(&display.asset_type, serial),
            name: display.name.clone(),
            asset_type: display.asset_type.clone(),
            description: display.description.clone(),
            parent_id: display.parent_id,
        };

        let created = self
            .platform
            .upsert_asset(&spec)
            .await
            .map_err(|source| ResolveError::Create {
                key: key.clone(),
                source,
            })?;
        let Some(asset_id) = created else {
            return Err(ResolveError::EmptyIdentifier { key });
        };

        let stored = self
            .store
            .insert_asset_mapping(AssetMapping::new(
                configuration_id,
                project_id,
                serial,
                asset_id,
            ))
            .map_err(|source| ResolveError::Persist {
                key: key.clone(),
                asset_id,
                source,
            })?;

        if stored.asset_id != asset_id {
            warn!(
                config_id = configuration_id,
                project_id,
                serial,
                created = asset_id,
                kept = stored.asset_id,
                "Asset mapping was stored concurrently, keeping the first one"
            );
        } else {
            let asset_type = &display.asset_type;
            info!(
                config_id = configuration_id,
                project_id,
                serial,
                asset_id,
                asset_type = %asset_type,
                "Created asset"
            );
        }

        Ok(stored.asset_id)
    }
}

/// Platform-wide identifier of a device asset: `"<type tag>_<serial>"`.
pub fn global_asset_identifier(asset_type: &str, serial: &str) -> String {
    format!("{}_{}", asset_type, serial)
}
