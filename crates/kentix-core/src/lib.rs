//! Core types for the Kentix connector.
//!
//! This crate defines the domain model shared by every other crate:
//! connection profiles, device categories, asset mappings, telemetry
//! envelopes and the persistent store abstraction.

pub mod asset;
pub mod config;
pub mod configuration;
pub mod device;
pub mod store;

pub use asset::{AssetMapping, AssetSpec, DataEnvelope, DataSubtype};
pub use configuration::{ConfigState, Configuration};
pub use device::{DeviceCategory, DeviceTypeTable, DeviceTypeTableError};
pub use store::{ConfigStore, StoreError, StoreResult};

/// Re-exports commonly used types.
pub mod prelude {
    pub use crate::asset::{AssetMapping, AssetSpec, DataEnvelope, DataSubtype};
    pub use crate::config::{defaults, endpoints, env_vars};
    pub use crate::configuration::{ConfigState, Configuration};
    pub use crate::device::{DeviceCategory, DeviceTypeTable};
    pub use crate::store::{ConfigStore, StoreError, StoreResult};
}
