//! Telemetry envelopes built from gateway readings.

use std::sync::Arc;

use kentix_core::{DataEnvelope, DataSubtype};
use kentix_devices::{DeviceInfo, DoorLock, SensorSnapshot};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::CollectorError;
use crate::platform::AssetPlatform;

/// Payload type of an envelope.
pub type Payload = Map<String, Value>;

/// Stamps readings and hands them to the platform.
#[derive(Clone)]
pub struct TelemetryForwarder {
    platform: Arc<dyn AssetPlatform>,
}

impl TelemetryForwarder {
    pub fn new(platform: Arc<dyn AssetPlatform>) -> Self {
        Self { platform }
    }

    /// Forward one payload for an asset, stamped with the current time.
    pub async fn forward(
        &self,
        subtype: DataSubtype,
        asset_id: i32,
        payload: Payload,
    ) -> Result<(), CollectorError> {
        let envelope = DataEnvelope::now(subtype, asset_id, payload);
        debug!(asset_id, subtype = ?subtype, fields = envelope.data.len(), "Forwarding telemetry");
        self.platform
            .upsert_data(&envelope)
            .await
            .map_err(|source| CollectorError::TelemetryForward { asset_id, source })
    }
}

/// Network identity of a gateway.
pub fn device_info_payload(info: &DeviceInfo) -> Payload {
    let mut payload = Map::new();
    payload.insert("ip_address".to_string(), json!(info.ip_address));
    payload.insert("mac_address".to_string(), json!(info.mac_address));
    payload.insert("firmware_version".to_string(), json!(info.firmware_version));
    payload
}

/// State of one door lock.
pub fn door_lock_payload(lock: &DoorLock) -> Payload {
    let mut payload = Map::new();
    payload.insert("serial_number".to_string(), json!(lock.serial));
    payload.insert("name".to_string(), json!(lock.name));
    payload.insert("door_contact".to_string(), json!(lock.door_contact));
    payload
}

/// Every channel of a multi-sensor, keyed by channel name.
pub fn sensor_payload(snapshot: &SensorSnapshot) -> Payload {
    snapshot
        .channels()
        .into_iter()
        .map(|(name, channel)| (name.to_string(), json!(channel.value)))
        .collect()
}
