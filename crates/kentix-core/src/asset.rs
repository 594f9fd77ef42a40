//! Downstream assets: device mappings, creation requests and telemetry envelopes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Association of a physical device with a downstream asset.
///
/// Keyed by (configuration, project, serial). Never re-assigned once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMapping {
    #[serde(rename = "configurationID")]
    pub configuration_id: i64,
    #[serde(rename = "projectID")]
    pub project_id: String,
    #[serde(rename = "serialNumber")]
    pub serial_number: String,
    #[serde(rename = "assetID")]
    pub asset_id: i32,
}

impl AssetMapping {
    pub fn new(
        configuration_id: i64,
        project_id: impl Into<String>,
        serial_number: impl Into<String>,
        asset_id: i32,
    ) -> Self {
        Self {
            configuration_id,
            project_id: project_id.into(),
            serial_number: serial_number.into(),
            asset_id,
        }
    }
}

/// Request to create (or fetch) an asset on the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSpec {
    pub project_id: String,
    pub global_asset_identifier: String,
    pub name: String,
    pub asset_type: String,
    pub description: String,
    #[serde(
        rename = "parentLocationalAssetId",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<i32>,
}

/// Kind of data carried by an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSubtype {
    Info,
    Input,
    Output,
    Status,
}

/// Telemetry for one asset at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataEnvelope {
    pub subtype: DataSubtype,
    pub asset_id: i32,
    pub timestamp: DateTime<Utc>,
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl DataEnvelope {
    /// Build an envelope stamped with the current time.
    pub fn now(
        subtype: DataSubtype,
        asset_id: i32,
        data: serde_json::Map<String, serde_json::Value>,
    ) -> Self {
        Self {
            subtype,
            asset_id,
            timestamp: Utc::now(),
            data,
        }
    }
}
