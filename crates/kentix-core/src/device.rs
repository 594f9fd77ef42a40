//! Device categories and the type-code table used to infer them.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Asset type tag of access-point gateways.
pub const ACCESS_POINT_ASSET_TYPE: &str = "Kentix Accessmanager";
/// Asset type tag of alarm managers.
pub const ALARM_MANAGER_ASSET_TYPE: &str = "Kentix AlarmManager";
/// Asset type tag of multi-sensor units.
pub const MULTI_SENSOR_ASSET_TYPE: &str = "Kentix MultiSensor";
/// Asset type tag of door locks attached to an access point.
pub const DOORLOCK_ASSET_TYPE: &str = "Kentix Doorlock";

/// Coarse category of a gateway, inferred from its numeric type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceCategory {
    AccessPoint,
    AlarmManager,
    MultiSensor,
}

impl DeviceCategory {
    /// Asset type tag used when creating the gateway's asset.
    pub fn asset_type(&self) -> &'static str {
        match self {
            Self::AccessPoint => ACCESS_POINT_ASSET_TYPE,
            Self::AlarmManager => ALARM_MANAGER_ASSET_TYPE,
            Self::MultiSensor => MULTI_SENSOR_ASSET_TYPE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessPoint => "access-point",
            Self::AlarmManager => "alarm-manager",
            Self::MultiSensor => "multi-sensor",
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceCategory {
    type Err = DeviceTypeTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "access-point" => Ok(Self::AccessPoint),
            "alarm-manager" => Ok(Self::AlarmManager),
            "multi-sensor" => Ok(Self::MultiSensor),
            other => Err(DeviceTypeTableError::UnknownCategory(other.to_string())),
        }
    }
}

/// Errors parsing a device type table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceTypeTableError {
    #[error("Malformed device type entry: {0}")]
    MalformedEntry(String),

    #[error("Invalid device type code: {0}")]
    InvalidCode(String),

    #[error("Unknown device category: {0}")]
    UnknownCategory(String),
}

/// Mapping from gateway type codes to categories.
///
/// Kept as data so new gateway models can be added without touching the
/// client. The default table covers the codes observed in the field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceTypeTable {
    codes: BTreeMap<i64, DeviceCategory>,
}

impl DeviceTypeTable {
    /// Create an empty table.
    pub fn empty() -> Self {
        Self {
            codes: BTreeMap::new(),
        }
    }

    /// Add or replace a code.
    pub fn with(mut self, code: i64, category: DeviceCategory) -> Self {
        self.codes.insert(code, category);
        self
    }

    pub fn insert(&mut self, code: i64, category: DeviceCategory) -> Option<DeviceCategory> {
        self.codes.insert(code, category)
    }

    /// Category of a type code, if known.
    pub fn classify(&self, code: i64) -> Option<DeviceCategory> {
        self.codes.get(&code).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for DeviceTypeTable {
    fn default() -> Self {
        Self::empty()
            .with(1, DeviceCategory::AccessPoint)
            .with(8, DeviceCategory::AlarmManager)
            .with(110, DeviceCategory::MultiSensor)
    }
}

/// Parses `code=category` pairs separated by commas, e.g.
/// `1=access-point,8=alarm-manager,110=multi-sensor`.
impl FromStr for DeviceTypeTable {
    type Err = DeviceTypeTableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut table = Self::empty();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (code, category) = entry
                .split_once('=')
                .ok_or_else(|| DeviceTypeTableError::MalformedEntry(entry.to_string()))?;
            let code: i64 = code
                .trim()
                .parse()
                .map_err(|_| DeviceTypeTableError::InvalidCode(code.trim().to_string()))?;
            table.insert(code, category.parse()?);
        }
        Ok(table)
    }
}
