//! HTTP client for the gateway REST API.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use kentix_core::{Configuration, DeviceTypeTable};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{DeviceError, DeviceResult};
use crate::models::{DeviceInfo, DoorLock, DoorLockPage, InfoResponse, SensorResponse, SensorSnapshot};

/// Endpoint paths relative to a gateway's base address.
pub mod endpoints {
    pub const INFO: &str = "api/info";
    pub const DOOR_LOCKS: &str = "api/devices/doorlocks";
    pub const MULTI_SENSOR_VALUES: &str = "api/devices/multisensor/values";
}

/// Fetches readings from a gateway described by a configuration.
///
/// Implementations are stateless; errors are returned to the caller and
/// never retried here.
#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// Identity of the gateway, with its category inferred from the type code.
    async fn fetch_device_info(&self, config: &Configuration) -> DeviceResult<DeviceInfo>;

    /// All door locks of an access point, following pagination links.
    async fn fetch_access_point_readings(&self, config: &Configuration)
        -> DeviceResult<Vec<DoorLock>>;

    /// Current sensor values of a multi-sensor.
    async fn fetch_multi_sensor_readings(
        &self,
        config: &Configuration,
    ) -> DeviceResult<SensorSnapshot>;
}

/// [`DeviceClient`] over reqwest.
#[derive(Clone)]
pub struct HttpDeviceClient {
    client: Client,
    device_types: Arc<DeviceTypeTable>,
}

impl HttpDeviceClient {
    /// Create a client with the default device type table.
    pub fn new() -> Self {
        Self::with_device_types(DeviceTypeTable::default())
    }

    /// Create a client that classifies gateways with the given table.
    pub fn with_device_types(device_types: DeviceTypeTable) -> Self {
        Self {
            client: Client::new(),
            device_types: Arc::new(device_types),
        }
    }

    /// Use a preconfigured reqwest client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn device_types(&self) -> &DeviceTypeTable {
        &self.device_types
    }

    /// Join an endpoint path onto the configuration's address.
    ///
    /// The address is treated as a directory, so a base of
    /// `http://gw/kentix` yields `http://gw/kentix/api/info`.
    pub fn endpoint_url(config: &Configuration, path: &str) -> DeviceResult<Url> {
        let address = config.address.trim();
        let base = if address.ends_with('/') {
            address.to_string()
        } else {
            format!("{}/", address)
        };

        let invalid = |reason: String| DeviceError::InvalidAddress {
            address: config.address.clone(),
            reason,
        };
        let base = Url::parse(&base).map_err(|e| invalid(e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", base.scheme())));
        }
        base.join(path).map_err(|e| invalid(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        config: &Configuration,
        url: &Url,
    ) -> DeviceResult<T> {
        debug!(config_id = ?config.id, url = %url, "Fetching from gateway");

        let response = self
            .client
            .get(url.clone())
            .header(AUTHORIZATION, format!("Basic {}", config.api_key))
            .timeout(config.request_timeout())
            .send()
            .await
            .map_err(|source| DeviceError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeviceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| DeviceError::Request {
                url: url.to_string(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|source| DeviceError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

impl Default for HttpDeviceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeviceClient for HttpDeviceClient {
    async fn fetch_device_info(&self, config: &Configuration) -> DeviceResult<DeviceInfo> {
        let url = Self::endpoint_url(config, endpoints::INFO)?;
        let response: InfoResponse = self.get_json(config, &url).await?;

        let code = response.data.type_code;
        let category = self.device_types.classify(code).ok_or_else(|| {
            DeviceError::UnrecognizedDeviceType {
                code,
                url: url.to_string(),
            }
        })?;

        Ok(response.data.into_device_info(category))
    }

    async fn fetch_access_point_readings(
        &self,
        config: &Configuration,
    ) -> DeviceResult<Vec<DoorLock>> {
        let mut url = Self::endpoint_url(config, endpoints::DOOR_LOCKS)?;
        let mut visited = HashSet::new();
        let mut locks = Vec::new();

        loop {
            visited.insert(url.clone());
            let page: DoorLockPage = self.get_json(config, &url).await?;
            locks.extend(page.data);

            let Some(next) = page.links.next.filter(|n| !n.trim().is_empty()) else {
                break;
            };
            let next_url = url.join(next.trim()).map_err(|e| DeviceError::InvalidAddress {
                address: next.clone(),
                reason: e.to_string(),
            })?;
            if visited.contains(&next_url) {
                warn!(url = %next_url, "Door lock pagination loops back, stopping");
                break;
            }
            url = next_url;
        }

        Ok(locks)
    }

    async fn fetch_multi_sensor_readings(
        &self,
        config: &Configuration,
    ) -> DeviceResult<SensorSnapshot> {
        let url = Self::endpoint_url(config, endpoints::MULTI_SENSOR_VALUES)?;
        let response: SensorResponse = self.get_json(config, &url).await?;
        Ok(response.data)
    }
}
