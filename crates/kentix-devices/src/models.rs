//! Gateway readings and the response envelopes they arrive in.

use kentix_core::DeviceCategory;
use serde::{Deserialize, Deserializer, Serialize};

/// Identity of a gateway, from `api/info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub name: String,
    pub ip_address: String,
    pub mac_address: String,
    /// Numeric model code as reported by the gateway.
    pub type_code: i64,
    pub serial: String,
    pub firmware_version: String,
    /// Category inferred from `type_code`.
    pub category: DeviceCategory,
}

impl DeviceInfo {
    /// Display name of the gateway's asset: `"<name> (<ip>)"`.
    pub fn asset_name(&self) -> String {
        format!("{} ({})", self.name, self.ip_address)
    }

    /// Description of the gateway's asset: `"<name> (<serial>)"`.
    pub fn asset_description(&self) -> String {
        format!("{} ({})", self.name, self.serial)
    }
}

/// A door lock attached to an access point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorLock {
    #[serde(default, deserialize_with = "null_default")]
    pub id: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub serial: String,
    #[serde(default, deserialize_with = "null_default")]
    pub active: bool,
    /// Door contact state as reported by the lock.
    #[serde(default, deserialize_with = "null_default")]
    pub door_contact: i64,
}

impl DoorLock {
    pub fn asset_description(&self) -> String {
        format!("{} ({})", self.name, self.serial)
    }
}

/// One channel of a multi-sensor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorValue {
    #[serde(default, deserialize_with = "lenient_string")]
    pub value: String,
    #[serde(default, deserialize_with = "null_default")]
    pub has_alarm: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorState {
    #[serde(default, deserialize_with = "null_default")]
    pub has_alarm: bool,
}

/// Current values of a multi-sensor, from `api/devices/multisensor/values`.
///
/// Channels missing from the response or sent as `null` read as empty values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorSnapshot {
    #[serde(deserialize_with = "null_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub state: SensorState,
    #[serde(deserialize_with = "null_default")]
    pub temperature: SensorValue,
    #[serde(deserialize_with = "null_default")]
    pub humidity: SensorValue,
    #[serde(rename = "dewpoint", deserialize_with = "null_default")]
    pub dew_point: SensorValue,
    #[serde(deserialize_with = "null_default")]
    pub air_pressure: SensorValue,
    #[serde(deserialize_with = "null_default")]
    pub air_quality: SensorValue,
    #[serde(deserialize_with = "null_default")]
    pub co2: SensorValue,
    #[serde(deserialize_with = "null_default")]
    pub co: SensorValue,
    #[serde(deserialize_with = "null_default")]
    pub heat: SensorValue,
    /// Thermal imaging.
    #[serde(deserialize_with = "null_default")]
    pub ti: SensorValue,
    #[serde(deserialize_with = "null_default")]
    pub motion: SensorValue,
    #[serde(deserialize_with = "null_default")]
    pub vibration: SensorValue,
    #[serde(deserialize_with = "null_default")]
    pub people_count: SensorValue,
}

impl SensorSnapshot {
    /// Channel name and value pairs, in a stable order.
    pub fn channels(&self) -> [(&'static str, &SensorValue); 12] {
        [
            ("temperature", &self.temperature),
            ("humidity", &self.humidity),
            ("dew_point", &self.dew_point),
            ("air_pressure", &self.air_pressure),
            ("air_quality", &self.air_quality),
            ("co2", &self.co2),
            ("co", &self.co),
            ("heat", &self.heat),
            ("ti", &self.ti),
            ("motion", &self.motion),
            ("vibration", &self.vibration),
            ("people_count", &self.people_count),
        ]
    }
}

// Gateways send `null` for unset fields.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Gateways report some channel values as numbers.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Debug, Deserialize)]
pub(crate) struct InfoResponse {
    pub data: RawDeviceInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawDeviceInfo {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub ip_address: String,
    #[serde(default, deserialize_with = "null_default")]
    pub mac_address: String,
    #[serde(rename = "type")]
    pub type_code: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub serial: String,
    #[serde(default, deserialize_with = "null_default")]
    pub version: RawVersion,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawVersion {
    #[serde(default, deserialize_with = "null_default")]
    pub firmware: String,
}

impl RawDeviceInfo {
    pub(crate) fn into_device_info(self, category: DeviceCategory) -> DeviceInfo {
        DeviceInfo {
            name: self.name,
            ip_address: self.ip_address,
            mac_address: self.mac_address,
            type_code: self.type_code,
            serial: self.serial,
            firmware_version: self.version.firmware,
            category,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DoorLockPage {
    #[serde(default, deserialize_with = "null_default")]
    pub data: Vec<DoorLock>,
    #[serde(default, deserialize_with = "null_default")]
    pub links: PageLinks,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageLinks {
    #[serde(default, deserialize_with = "null_default")]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SensorResponse {
    pub data: SensorSnapshot,
}
